//! Bookshelf service: validation and record stamping

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, BookPayload, BookQuery, BookSummary},
    repository::Repository,
};

use super::{clock::Clock, ids::IdGenerator};

const CREATE_MISSING_NAME: &str = "Gagal menambahkan buku. Mohon isi nama buku";
const CREATE_NEGATIVE_PAGES: &str =
    "tidak bisa memperbarui buku. readPage dan pageCount tidak boleh negatif";
const CREATE_READ_PAGE_TOO_LARGE: &str =
    "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount";
const GET_NOT_FOUND: &str = "Buku tidak ditemukan";
const UPDATE_NOT_FOUND: &str = "Gagal memperbarui buku. Id tidak ditemukan";
const UPDATE_MISSING_NAME: &str = "Gagal memperbarui buku. Mohon isi nama buku";
const UPDATE_READ_PAGE_TOO_LARGE: &str =
    "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount";
const DELETE_NOT_FOUND: &str = "Buku gagal dihapus. Id tidak ditemukan";

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl BooksService {
    pub fn new(repository: Repository, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            ids,
            clock,
        }
    }

    /// Validate and store a new book, returning its ID
    pub async fn create(&self, payload: BookPayload) -> AppResult<String> {
        if !payload.has_name() {
            return Err(AppError::Validation(CREATE_MISSING_NAME.to_string()));
        }
        if payload.has_negative_pages() {
            return Err(AppError::Validation(CREATE_NEGATIVE_PAGES.to_string()));
        }
        if payload.read_page_exceeds_count() {
            return Err(AppError::Validation(CREATE_READ_PAGE_TOO_LARGE.to_string()));
        }

        tracing::info!("Book payload accepted: {:?}", payload);

        let id = self.ids.generate();
        let book = Book::new(id.clone(), payload, self.clock.now());
        self.repository.books_insert(book).await;

        tracing::debug!("Book {} added", id);
        Ok(id)
    }

    /// List book summaries matching the query filters
    pub async fn list(&self, query: &BookQuery) -> Vec<BookSummary> {
        let filter = BookFilter::from(query);
        self.repository.books_list(&filter).await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books_get_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound(GET_NOT_FOUND.to_string()))
    }

    /// Replace the mutable fields of an existing book.
    /// Negative page values are accepted here, only `readPage <= pageCount` is checked.
    pub async fn update(&self, id: &str, payload: BookPayload) -> AppResult<()> {
        let now = self.clock.now();
        let outcome = self
            .repository
            .books_update(id, |book| {
                if !payload.has_name() {
                    return Err(AppError::Validation(UPDATE_MISSING_NAME.to_string()));
                }
                if payload.read_page_exceeds_count() {
                    return Err(AppError::Validation(UPDATE_READ_PAGE_TOO_LARGE.to_string()));
                }
                book.apply(payload, now);
                Ok(())
            })
            .await;

        match outcome {
            Some(result) => {
                if result.is_ok() {
                    tracing::debug!("Book {} updated", id);
                }
                result
            }
            None => Err(AppError::NotFound(UPDATE_NOT_FOUND.to_string())),
        }
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        match self.repository.books_delete(id).await {
            Some(_) => {
                tracing::debug!("Book {} deleted", id);
                Ok(())
            }
            None => Err(AppError::NotFound(DELETE_NOT_FOUND.to_string())),
        }
    }
}
