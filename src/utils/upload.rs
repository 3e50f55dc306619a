use std::collections::HashMap;
use std::path::Path;

use axum::body::Bytes;
use axum::extract::Multipart;
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/images";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Pdf,
}

impl UploadKind {
    fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Image => &["png", "jpg", "jpeg", "gif", "webp"],
            UploadKind::Pdf => &["pdf"],
        }
    }

    /// Lower-cased extension of `file_name` if this kind accepts it.
    pub fn accept(&self, file_name: &str) -> Result<String, AppError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        if self.allowed_extensions().contains(&extension.as_str()) {
            Ok(extension)
        } else {
            Err(AppError::validation(format!(
                "Invalid file type. Allowed: {}",
                self.allowed_extensions().join(", ")
            )))
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Text fields and files read from one multipart body.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Reads every part; parts carrying a file name are kept as files and
    /// each one is limited to `max_file_bytes`.
    pub async fn read(mut multipart: Multipart, max_file_bytes: usize) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();
        while let Some(mut field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let mut data = Vec::new();
                    while let Some(chunk) = field.chunk().await? {
                        if data.len() + chunk.len() > max_file_bytes {
                            return Err(AppError::PayloadTooLarge(format!(
                                "File too large. Maximum size is {} bytes",
                                max_file_bytes
                            )));
                        }
                        data.extend_from_slice(&chunk);
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            data: Bytes::from(data),
                        },
                    );
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name).filter(|f| !f.data.is_empty())
    }
}

/// Writes the file under `dir` as `<sha256>.<ext>` and returns its public
/// URL. Identical content maps to the same file.
pub async fn store_file(dir: &Path, file: &UploadedFile, kind: UploadKind) -> Result<String, AppError> {
    let extension = kind.accept(&file.file_name)?;
    let digest = Sha256::digest(&file.data);
    let stored_name = format!("{:x}.{}", digest, extension);
    let target = dir.join(&stored_name);

    if !tokio::fs::try_exists(&target).await? {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&target, &file.data).await?;
        tracing::debug!("Stored upload {} ({} bytes)", stored_name, file.data.len());
    }

    Ok(format!("{}/{}", PUBLIC_PREFIX, stored_name))
}
