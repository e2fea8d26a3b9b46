//! In-memory table store.
//!
//! A drop-in [`TableStore`] used by tests, demo seeding and local
//! development. Rows are stored as raw JSON objects so the same serde types
//! flow through both backends. Composite unique keys registered with
//! [`MemoryStore::with_unique`] are enforced on insert, mirroring the
//! hosted schema's constraints, and single-shot failures can be injected to
//! exercise error paths.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::filter::{Direction, Filter, Query};
use crate::{StoreError, TableStore};

/// Operation class for injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailOp {
    Insert,
    Update,
    Delete,
}

/// In-memory [`TableStore`] implementation.
///
/// Cheaply cloneable; all clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    uniques: Mutex<HashMap<String, Vec<Vec<String>>>>,
    failures: Mutex<HashSet<(FailOp, String)>>,
}

impl MemoryStore {
    /// Create an empty store with no tables and no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a composite unique key on `table`.
    ///
    /// Inserts that would duplicate the key values of an existing row fail
    /// with [`StoreError::Conflict`], like the hosted schema's constraints.
    #[must_use]
    pub fn with_unique(self, table: &str, columns: &[&str]) -> Self {
        lock(&self.inner.uniques)
            .entry(table.to_string())
            .or_default()
            .push(columns.iter().map(ToString::to_string).collect());
        self
    }

    /// Make the next `op` on `table` fail with a synthetic store error.
    pub fn fail_next(&self, op: FailOp, table: &str) {
        lock(&self.inner.failures).insert((op, table.to_string()));
    }

    /// Raw rows of a table, for test assertions.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Value> {
        lock(&self.inner.tables)
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of rows currently in a table.
    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        lock(&self.inner.tables).get(table).map_or(0, Vec::len)
    }

    fn take_failure(&self, op: FailOp, table: &str) -> Result<(), StoreError> {
        if lock(&self.inner.failures).remove(&(op, table.to_string())) {
            return Err(StoreError::Status {
                status: 503,
                body: format!("injected {op:?} failure on {table}"),
            });
        }
        Ok(())
    }

    fn check_uniques(
        &self,
        table: &str,
        existing: &[Value],
        candidate: &Value,
    ) -> Result<(), StoreError> {
        let uniques = lock(&self.inner.uniques);
        let Some(keys) = uniques.get(table) else {
            return Ok(());
        };

        for columns in keys {
            let candidate_key: Vec<String> = columns
                .iter()
                .map(|c| candidate.get(c).map_or_else(|| "null".to_string(), stringify))
                .collect();

            let duplicate = existing.iter().any(|row| {
                columns
                    .iter()
                    .zip(&candidate_key)
                    .all(|(c, expected)| row.get(c).is_some_and(|v| stringify(v) == *expected))
            });

            if duplicate {
                return Err(StoreError::Conflict(format!(
                    "duplicate key on {table} ({})",
                    columns.join(",")
                )));
            }
        }

        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric comparison when both sides parse as numbers, lexicographic
/// otherwise.
fn compare(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(column, value) => row
            .get(column)
            .is_some_and(|v| !v.is_null() && stringify(v) == *value),
        Filter::In(column, values) => row
            .get(column)
            .is_some_and(|v| !v.is_null() && values.contains(&stringify(v))),
        Filter::Gte(column, value) => row
            .get(column)
            .is_some_and(|v| !v.is_null() && compare(&stringify(v), value) != Ordering::Less),
        Filter::NotNull(column) => row.get(column).is_some_and(|v| !v.is_null()),
        Filter::AnyIlike(columns, term) => {
            let needle = term.to_lowercase();
            columns.iter().any(|c| {
                row.get(c)
                    .is_some_and(|v| stringify(v).to_lowercase().contains(&needle))
            })
        }
    }
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| matches(row, f))
}

impl TableStore for MemoryStore {
    async fn select<T>(&self, table: &str, query: Query) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        let mut rows: Vec<Value> = lock(&self.inner.tables)
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let left = a.get(&order.column).map_or_else(String::new, stringify);
                let right = b.get(&order.column).map_or_else(String::new, stringify);
                match order.direction {
                    Direction::Asc => compare(&left, &right),
                    Direction::Desc => compare(&right, &left),
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::Parse))
            .collect()
    }

    async fn insert<R, T>(&self, table: &str, rows: &[R]) -> Result<Vec<T>, StoreError>
    where
        R: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        self.take_failure(FailOp::Insert, table)?;

        let mut tables = lock(&self.inner.tables);
        let stored = tables.entry(table.to_string()).or_default();

        // Validate the whole batch before committing any of it
        let mut pending: Vec<Value> = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::to_value(row)?;
            self.check_uniques(table, stored, &value)?;
            self.check_uniques(table, &pending, &value)?;
            pending.push(value);
        }

        stored.extend(pending.iter().cloned());

        pending
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::Parse))
            .collect()
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
        self.take_failure(FailOp::Update, table)?;

        let patch_value = serde_json::to_value(patch)?;
        let patch_fields = patch_value.as_object().cloned().unwrap_or_default();

        let mut tables = lock(&self.inner.tables);
        let Some(stored) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in stored.iter_mut() {
            if !matches_all(row, filters) {
                continue;
            }
            if let Some(fields) = row.as_object_mut() {
                for (key, value) in &patch_fields {
                    fields.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }

        updated
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::Parse))
            .collect()
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        self.take_failure(FailOp::Delete, table)?;

        let mut tables = lock(&self.inner.tables);
        let Some(stored) = tables.get_mut(table) else {
            return Ok(0);
        };

        let before = stored.len();
        stored.retain(|row| !matches_all(row, filters));
        Ok((before - stored.len()) as u64)
    }
}
