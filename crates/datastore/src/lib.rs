//! Generic table-store client for Attar.
//!
//! # Architecture
//!
//! Every Attar service talks to the hosted relational store through the
//! [`TableStore`] trait: per-table select with filters, insert (single or
//! batch), update-by-filter and delete-by-filter, plus ordering and
//! limiting. Nothing above this crate depends on the store's wire format,
//! so any backend exposing the same contract is a drop-in replacement.
//!
//! Two implementations ship here:
//!
//! - [`RestStore`] - the production client for the hosted store's REST
//!   query API (`reqwest` over HTTPS, filters rendered as query-string
//!   operators)
//! - [`MemoryStore`] - an in-memory table store for tests, seeding demos
//!   and local development; it also enforces registered composite unique
//!   keys the way the hosted schema does
//!
//! # Example
//!
//! ```rust,ignore
//! use attar_datastore::{Filter, Query, RestStore, StoreConfig, TableStore};
//!
//! let store = RestStore::new(&StoreConfig::from_env()?);
//! let discounted: Vec<Perfume> = store
//!     .select(
//!         "perfumes",
//!         Query::new().filter(Filter::not_null("discount_price")),
//!     )
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod config;
mod filter;
mod memory;
mod rest;

pub use config::{ConfigError, StoreConfig};
pub use filter::{Filter, Query};
pub use memory::{FailOp, MemoryStore};
pub use rest::RestStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when talking to a table store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No row matched a lookup that requires one.
    #[error("not found: {0}")]
    NotFound(String),

    /// A write violated a unique key.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store rejected the credentials.
    #[error("unauthorized")]
    Unauthorized,
}

/// The generic per-table contract every Attar service consumes.
///
/// Rows travel as the caller's serde types; the store itself is schemaless
/// from this crate's point of view. All methods are request/response with
/// no retry - recovery is the caller's decision.
pub trait TableStore: Send + Sync {
    /// Fetch the rows of `table` matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the request fails or a row does not
    /// deserialize into `T`.
    fn select<T>(
        &self,
        table: &str,
        query: Query,
    ) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send
    where
        T: DeserializeOwned + Send;

    /// Insert `rows` into `table`, returning the stored representations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when a row violates a unique key,
    /// or another [`StoreError`] for transport/decoding failures.
    fn insert<R, T>(
        &self,
        table: &str,
        rows: &[R],
    ) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send
    where
        R: Serialize + Sync,
        T: DeserializeOwned + Send;

    /// Apply `patch` to every row of `table` matching `filters`, returning
    /// the updated rows. Absent patch fields are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the request fails.
    fn update<P, T>(
        &self,
        table: &str,
        patch: &P,
        filters: &[Filter],
    ) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send
    where
        P: Serialize + Sync,
        T: DeserializeOwned + Send;

    /// Delete every row of `table` matching `filters`, returning how many
    /// rows were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the request fails.
    fn delete(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}
