//! REST client for the hosted table store.
//!
//! Filters, ordering and limits are rendered into the store's query-string
//! operator syntax; rows travel as JSON arrays. Mutating requests ask for
//! `return=representation` so callers always get the stored rows back.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::StoreConfig;
use crate::filter::{Filter, Query};
use crate::{StoreError, TableStore};

/// Client for the hosted table store's REST query API.
///
/// Cheaply cloneable; all clones share one HTTP connection pool.
#[derive(Clone)]
pub struct RestStore {
    inner: Arc<RestStoreInner>,
}

struct RestStoreInner {
    client: reqwest::Client,
    root: String,
    service_key: String,
}

impl RestStore {
    /// Create a new store client.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            inner: Arc::new(RestStoreInner {
                client: reqwest::Client::new(),
                root: format!("{}/{}", config.url, config.schema_path),
                service_key: config.service_key.expose_secret().to_string(),
            }),
        }
    }

    fn headers(&self, returning: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.inner.service_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) =
            HeaderValue::from_str(&format!("Bearer {}", self.inner.service_key))
        {
            headers.insert("Authorization", bearer);
        }
        if returning {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }
        headers
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.inner.root)
    }

    /// Read a response body as a JSON array of rows, mapping non-success
    /// statuses to typed errors.
    async fn read_rows<T: DeserializeOwned>(
        table: &str,
        response: reqwest::Response,
    ) -> Result<Vec<T>, StoreError> {
        let status = response.status();

        // Body as text first for better error diagnostics
        let body = response.text().await?;

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(StoreError::Unauthorized);
            }
            StatusCode::CONFLICT => {
                return Err(StoreError::Conflict(truncate(&body)));
            }
            s if !s.is_success() => {
                tracing::error!(
                    table = %table,
                    status = %s,
                    body = %truncate(&body),
                    "store returned non-success status"
                );
                return Err(StoreError::Status {
                    status: s.as_u16(),
                    body: truncate(&body),
                });
            }
            _ => {}
        }

        match serde_json::from_str(&body) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                tracing::error!(
                    table = %table,
                    error = %e,
                    body = %truncate(&body),
                    "failed to parse store response"
                );
                Err(StoreError::Parse(e))
            }
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

impl TableStore for RestStore {
    async fn select<T>(&self, table: &str, query: Query) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        let response = self
            .inner
            .client
            .get(self.table_url(table))
            .headers(self.headers(false))
            .query(&query.to_query_pairs())
            .send()
            .await?;

        Self::read_rows(table, response).await
    }

    async fn insert<R, T>(&self, table: &str, rows: &[R]) -> Result<Vec<T>, StoreError>
    where
        R: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let response = self
            .inner
            .client
            .post(self.table_url(table))
            .headers(self.headers(true))
            .json(rows)
            .send()
            .await?;

        Self::read_rows(table, response).await
    }

    async fn update<P, T>(
        &self,
        table: &str,
        patch: &P,
        filters: &[Filter],
    ) -> Result<Vec<T>, StoreError>
    where
        P: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let pairs: Vec<(String, String)> = filters.iter().map(Filter::to_query_pair).collect();

        let response = self
            .inner
            .client
            .patch(self.table_url(table))
            .headers(self.headers(true))
            .query(&pairs)
            .json(patch)
            .send()
            .await?;

        Self::read_rows(table, response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        let pairs: Vec<(String, String)> = filters.iter().map(Filter::to_query_pair).collect();

        let response = self
            .inner
            .client
            .delete(self.table_url(table))
            .headers(self.headers(true))
            .query(&pairs)
            .send()
            .await?;

        let removed: Vec<serde_json::Value> = Self::read_rows(table, response).await?;
        Ok(removed.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> StoreConfig {
        StoreConfig {
            url: "https://project.example.co".to_string(),
            schema_path: "rest/v1".to_string(),
            service_key: SecretString::from("key"),
        }
    }

    #[test]
    fn test_table_url() {
        let store = RestStore::new(&config());
        assert_eq!(
            store.table_url("perfumes"),
            "https://project.example.co/rest/v1/perfumes"
        );
    }

    #[test]
    fn test_mutating_requests_ask_for_representation() {
        let store = RestStore::new(&config());
        assert!(store.headers(true).contains_key("Prefer"));
        assert!(!store.headers(false).contains_key("Prefer"));
    }
}
