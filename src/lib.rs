//! Bookshelf Server
//!
//! An in-memory book record manager exposed as a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Repository,
    pub services: Arc<Services>,
}

impl AppState {
    /// Build the state around an empty book collection
    pub fn new(config: AppConfig) -> Self {
        let repository = Repository::new();
        let services = Services::new(repository.clone(), &config.books);
        Self {
            repository,
            services: Arc::new(services),
        }
    }
}
