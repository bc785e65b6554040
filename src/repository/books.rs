//! Book domain methods on Repository

use super::Repository;
use crate::models::{Book, BookFilter, BookSummary};

impl Repository {
    /// List books matching the filter, in insertion order
    pub async fn books_list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        let books = self.books.read().await;
        books
            .iter()
            .filter(|book| filter.matches(book))
            .map(BookSummary::from)
            .collect()
    }

    /// Get book by ID
    pub async fn books_get_by_id(&self, id: &str) -> Option<Book> {
        let books = self.books.read().await;
        books.iter().find(|book| book.id == id).cloned()
    }

    /// Append a book at the end of the collection
    pub async fn books_insert(&self, book: Book) {
        self.books.write().await.push(book);
    }

    /// Run `f` on the book with the given ID while holding the write lock.
    /// Returns `None` when no such book exists.
    pub async fn books_update<F, T>(&self, id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut Book) -> T,
    {
        let mut books = self.books.write().await;
        books.iter_mut().find(|book| book.id == id).map(f)
    }

    /// Remove a book, preserving the order of the others
    pub async fn books_delete(&self, id: &str) -> Option<Book> {
        let mut books = self.books.write().await;
        let index = books.iter().position(|book| book.id == id)?;
        Some(books.remove(index))
    }

    pub async fn books_count(&self) -> usize {
        self.books.read().await.len()
    }
}
