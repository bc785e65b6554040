//! Data models for Bookshelf

pub mod book;

pub use book::{Book, BookFilter, BookPayload, BookQuery, BookSummary};
