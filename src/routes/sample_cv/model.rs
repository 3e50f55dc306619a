use serde::Deserialize;

use crate::{
    error::AppError,
    models::NewSampleCv,
    routes::account::require_name,
    utils::upload::{MultipartForm, UploadKind, UploadedFile},
};

#[derive(Debug, Deserialize)]
pub struct SampleCvQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Parts of the admin upload form, checked before anything is stored.
pub(super) struct SampleCvUpload {
    pub title: String,
    pub description: String,
    pub file: UploadedFile,
    pub image: Option<UploadedFile>,
}

impl SampleCvUpload {
    pub(super) fn from_form(mut form: MultipartForm) -> Result<Self, AppError> {
        let title = form.text("title").unwrap_or_default().to_string();
        require_name(&title, "title")?;
        let description = form.text("description").unwrap_or_default().to_string();
        let file = form
            .take_file("file")
            .ok_or_else(|| AppError::validation("Missing file field"))?;
        UploadKind::Pdf.accept(&file.file_name)?;
        let image = form.take_file("image");
        if let Some(image) = &image {
            UploadKind::Image.accept(&image.file_name)?;
        }
        Ok(Self {
            title,
            description,
            file,
            image,
        })
    }

    pub(super) fn into_new(self, file: String, image: Option<String>) -> NewSampleCv {
        NewSampleCv {
            title: self.title,
            description: self.description,
            file,
            image,
        }
    }
}
