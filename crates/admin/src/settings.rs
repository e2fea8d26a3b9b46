//! Store-wide string settings.

use attar_core::{Setting, tables};
use attar_datastore::{Filter, Query, TableStore};

use crate::error::AdminError;

/// Read one setting.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn get_setting<S: TableStore>(
    store: &S,
    key: &str,
) -> Result<Option<String>, AdminError> {
    let rows: Vec<Setting> = store
        .select(
            tables::SETTINGS,
            Query::new().filter(Filter::eq("key", key)).limit(1),
        )
        .await?;
    Ok(rows.into_iter().next().map(|s| s.value))
}

/// Write one setting, creating the row if it does not exist yet.
///
/// Settings have a single writer (the admin panel), so update-then-insert
/// is race-free enough here.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn put_setting<S: TableStore>(
    store: &S,
    key: &str,
    value: &str,
) -> Result<(), AdminError> {
    let setting = Setting {
        key: key.to_string(),
        value: value.to_string(),
    };

    let updated: Vec<Setting> = store
        .update(tables::SETTINGS, &setting, &[Filter::eq("key", key)])
        .await?;

    if updated.is_empty() {
        let _: Vec<Setting> = store
            .insert(tables::SETTINGS, &std::slice::from_ref(&setting))
            .await?;
    }
    Ok(())
}
