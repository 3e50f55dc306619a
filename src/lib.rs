use std::sync::Arc;

use config::Config;
use database::Database;
use models::PageRequest;

pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub config: Config,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, config: Config) -> Self {
        Self { db, config }
    }

    pub fn page(&self, page: Option<u32>, page_size: Option<u32>) -> PageRequest {
        PageRequest::new(
            page,
            page_size,
            self.config.default_page_size,
            self.config.max_page_size,
        )
    }
}
