use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub password_hash_cost: u32,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10),
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "jobboard".into()),
            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "jobboard-web".into()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".into()),
            server_port: parse_or("SERVER_PORT", 5000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".into()),
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./uploads".into())
                .into(),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
            default_page_size: parse_or("DEFAULT_PAGE_SIZE", 7),
            max_page_size: parse_or("MAX_PAGE_SIZE", 50),
            password_hash_cost: parse_or("PASSWORD_HASH_COST", bcrypt::DEFAULT_COST),
            admin_email: env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
        })
    }

    /// Settings for tests and local runs against the in-memory store.
    pub fn for_memory(jwt_secret: &str, upload_dir: PathBuf) -> Self {
        Config {
            database_url: "memory://".into(),
            db_max_connections: 1,
            jwt_secret: jwt_secret.into(),
            jwt_issuer: "jobboard".into(),
            jwt_audience: "jobboard-web".into(),
            server_host: "127.0.0.1".into(),
            server_port: 0,
            api_base_uri: "/api".into(),
            upload_dir,
            max_upload_bytes: 1024 * 1024,
            default_page_size: 7,
            max_page_size: 50,
            password_hash_cost: 4,
            admin_email: None,
            admin_password: None,
        }
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory://")
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}, using default", key);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_config_uses_memory_store() {
        let config = Config::for_memory("secret", PathBuf::from("/tmp"));
        assert!(config.uses_memory_store());
        assert_eq!(config.default_page_size, 7);
    }

    #[test]
    fn parse_or_falls_back_when_missing() {
        let value: u32 = parse_or("JOBBOARD_TEST_SURELY_UNSET_VARIABLE", 42);
        assert_eq!(value, 42);
    }
}
