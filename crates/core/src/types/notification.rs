//! Admin notification row type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NotificationId;

/// What produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new order was placed.
    Order,
    /// A user signed up or changed state.
    User,
    System,
}

/// A row of the `admin_notifications` table, listed newest-first in the
/// admin panel. The unread count drives the 30-second badge poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminNotification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
