//! Book record model and request/query types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// Serialize a timestamp as `YYYY-MM-DDTHH:MM:SS.sssZ`
fn serialize_timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(value))
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Full book record
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    /// Stored exactly as received
    pub year: Option<Value>,
    pub author: Option<Value>,
    pub summary: Option<Value>,
    pub publisher: Option<Value>,
    pub page_count: i64,
    pub read_page: i64,
    /// True when every page has been read
    pub finished: bool,
    pub reading: bool,
    #[serde(serialize_with = "serialize_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub inserted_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from a validated payload
    pub fn new(id: String, payload: BookPayload, now: DateTime<Utc>) -> Self {
        let finished = payload.is_finished();
        Self {
            id,
            name: payload.name.unwrap_or_default(),
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            page_count: payload.page_count,
            read_page: payload.read_page,
            finished,
            reading: payload.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field, keeping `id` and `inserted_at`
    pub fn apply(&mut self, payload: BookPayload, now: DateTime<Utc>) {
        self.finished = payload.is_finished();
        self.name = payload.name.unwrap_or_default();
        self.year = payload.year;
        self.author = payload.author;
        self.summary = payload.summary;
        self.publisher = payload.publisher;
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.reading = payload.reading;
        self.updated_at = now;
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<Value>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Create / update book request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    /// Required, must not be empty
    pub name: Option<String>,
    /// Any JSON value, not validated
    pub year: Option<Value>,
    pub author: Option<Value>,
    pub summary: Option<Value>,
    pub publisher: Option<Value>,
    #[serde(default)]
    pub page_count: i64,
    #[serde(default)]
    pub read_page: i64,
    #[serde(default)]
    pub reading: bool,
}

impl BookPayload {
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }

    pub fn has_negative_pages(&self) -> bool {
        self.read_page < 0 || self.page_count < 0
    }

    pub fn read_page_exceeds_count(&self) -> bool {
        self.read_page > self.page_count
    }

    pub fn is_finished(&self) -> bool {
        self.read_page == self.page_count
    }
}

/// Raw list query parameters. Keys may repeat.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// A single `1` for books being read, anything else for the rest
    #[serde(default)]
    pub reading: Vec<String>,
    /// A single `1` for finished books, anything else for the rest
    #[serde(default)]
    pub finished: Vec<String>,
    /// Case-insensitive substring of the book name, last value wins
    #[serde(default)]
    pub name: Vec<String>,
}

/// Parsed list filters, combined with logical AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub reading: Option<bool>,
    pub finished: Option<bool>,
    /// Already lowercased
    pub name: Option<String>,
}

fn flag(values: &[String]) -> Option<bool> {
    match values {
        [] => None,
        [value] => Some(value == "1"),
        _ => Some(false),
    }
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        Self {
            reading: flag(&query.reading),
            finished: flag(&query.finished),
            name: query
                .name
                .last()
                .filter(|name| !name.is_empty())
                .map(|name| name.to_lowercase()),
        }
    }
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        if self.reading.is_some_and(|reading| book.reading != reading) {
            return false;
        }
        if self.finished.is_some_and(|finished| book.finished != finished) {
            return false;
        }
        match &self.name {
            Some(needle) => book.name.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }
}
