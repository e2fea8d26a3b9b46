//! Promotional banner row type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BannerId;

/// A row of the `banners` table. The storefront shows active banners in
/// ascending `position` order; everything else is admin-managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: String,
    pub active: bool,
    pub position: u32,
    pub created_at: DateTime<Utc>,
}
