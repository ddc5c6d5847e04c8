//! # DataStore Module
//!
//! Persistence for video summaries produced by the ingestion pipeline.
//!
//! The store is append-only from the pipeline's point of view: every successful
//! run inserts one new row and nothing is ever updated or deleted here. Reading
//! rows back (browsing, search, pagination) belongs to a separate front end.

mod datastore;
mod domain;

pub use datastore::postgres::PgDataStore;
pub use datastore::DataStore;
pub use domain::{thumbnail_url, NewSummary, SummaryRecord, THUMBNAIL_BASE_URL};
