//! Admin notification feed and the badge counter poller.
//!
//! The poller is the only periodic activity in the whole system: every 30
//! seconds it re-reads the unread count and publishes it on a watch
//! channel for the badge to render. It is not coordinated with any other
//! in-flight work, and a failed poll keeps the last published value.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::instrument;

use attar_core::{AdminNotification, NotificationId, tables};
use attar_datastore::{Filter, Query, TableStore};

use crate::error::AdminError;

/// How often the badge counter refreshes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct ReadPatch {
    read: bool,
}

/// All notifications, newest first.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn list<S: TableStore>(store: &S) -> Result<Vec<AdminNotification>, AdminError> {
    let notifications: Vec<AdminNotification> = store
        .select(
            tables::ADMIN_NOTIFICATIONS,
            Query::new().order_desc("created_at"),
        )
        .await?;
    Ok(notifications)
}

/// Number of unread notifications. The contract has no server-side count,
/// so the unread rows are fetched and counted here.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn unread_count<S: TableStore>(store: &S) -> Result<u64, AdminError> {
    let unread: Vec<AdminNotification> = store
        .select(
            tables::ADMIN_NOTIFICATIONS,
            Query::new().filter(Filter::eq("read", false)),
        )
        .await?;
    Ok(unread.len() as u64)
}

/// Mark one notification read.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown notification, or a
/// store error.
pub async fn mark_read<S: TableStore>(
    store: &S,
    id: NotificationId,
) -> Result<AdminNotification, AdminError> {
    let updated: Vec<AdminNotification> = store
        .update(
            tables::ADMIN_NOTIFICATIONS,
            &ReadPatch { read: true },
            &[Filter::eq("id", id)],
        )
        .await?;
    updated
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("notification {id}")))
}

/// Mark every unread notification read, returning how many changed.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn mark_all_read<S: TableStore>(store: &S) -> Result<u64, AdminError> {
    let updated: Vec<AdminNotification> = store
        .update(
            tables::ADMIN_NOTIFICATIONS,
            &ReadPatch { read: true },
            &[Filter::eq("read", false)],
        )
        .await?;
    Ok(updated.len() as u64)
}

/// Periodically re-reads the unread count and publishes it.
///
/// Construct with [`NotificationPoller::new`], hand the receiver to the
/// badge, and spawn [`NotificationPoller::run`]. The loop stops when every
/// receiver is gone.
pub struct NotificationPoller<S> {
    store: S,
    interval: Duration,
    tx: watch::Sender<u64>,
}

impl<S: TableStore> NotificationPoller<S> {
    /// Create a poller with the standard 30-second interval.
    #[must_use]
    pub fn new(store: S) -> (Self, watch::Receiver<u64>) {
        let (tx, rx) = watch::channel(0);
        (
            Self {
                store,
                interval: POLL_INTERVAL,
                tx,
            },
            rx,
        )
    }

    /// Override the poll interval (tests use a short one).
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll until every receiver is dropped.
    #[instrument(skip(self))]
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match unread_count(&self.store).await {
                Ok(count) => {
                    if self.tx.send(count).is_err() {
                        // Badge is gone; nothing left to update
                        return;
                    }
                }
                // Keep the last published value; the next tick retries
                Err(e) => tracing::error!(error = %e, "notification poll failed"),
            }
        }
    }
}
