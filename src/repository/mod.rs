//! Repository layer holding the in-memory collection

pub mod books;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::Book;

/// Main repository struct owning the book collection
#[derive(Clone, Default)]
pub struct Repository {
    books: Arc<RwLock<Vec<Book>>>,
}

impl Repository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}
