//! Banner management.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use attar_core::{Banner, BannerId, tables};
use attar_datastore::{Filter, Query, TableStore};

use crate::error::AdminError;

/// Input for a new banner.
#[derive(Debug, Clone)]
pub struct NewBanner {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: String,
    pub active: bool,
    pub position: u32,
}

/// Partial update for a banner; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BannerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Serialize)]
struct ActivePatch {
    active: bool,
}

/// All banners in display order, active or not.
///
/// # Errors
///
/// Returns an error if the store request fails.
pub async fn list<S: TableStore>(store: &S) -> Result<Vec<Banner>, AdminError> {
    let banners: Vec<Banner> = store
        .select(tables::BANNERS, Query::new().order_asc("position"))
        .await?;
    Ok(banners)
}

/// Create a banner.
///
/// # Errors
///
/// Returns an error if the store request fails.
#[instrument(skip(store, new), fields(title = %new.title))]
pub async fn create_banner<S: TableStore>(store: &S, new: NewBanner) -> Result<Banner, AdminError> {
    let banner = Banner {
        id: BannerId::generate(),
        title: new.title,
        subtitle: new.subtitle,
        image_url: new.image_url,
        link_url: new.link_url,
        active: new.active,
        position: new.position,
        created_at: Utc::now(),
    };

    let stored: Vec<Banner> = store
        .insert(tables::BANNERS, &std::slice::from_ref(&banner))
        .await?;

    info!(banner_id = %banner.id, "banner created");
    Ok(stored.into_iter().next().unwrap_or(banner))
}

/// Apply a partial update to a banner.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown banner, or a store
/// error.
pub async fn update_banner<S: TableStore>(
    store: &S,
    id: BannerId,
    update: BannerUpdate,
) -> Result<Banner, AdminError> {
    let updated: Vec<Banner> = store
        .update(tables::BANNERS, &update, &[Filter::eq("id", id)])
        .await?;
    updated
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("banner {id}")))
}

/// Show or hide a banner.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown banner, or a store
/// error.
pub async fn set_active<S: TableStore>(
    store: &S,
    id: BannerId,
    active: bool,
) -> Result<Banner, AdminError> {
    let updated: Vec<Banner> = store
        .update(tables::BANNERS, &ActivePatch { active }, &[Filter::eq("id", id)])
        .await?;
    updated
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("banner {id}")))
}

/// Delete a banner.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown banner, or a store
/// error.
pub async fn delete_banner<S: TableStore>(store: &S, id: BannerId) -> Result<(), AdminError> {
    let removed = store
        .delete(tables::BANNERS, &[Filter::eq("id", id)])
        .await?;
    if removed == 0 {
        return Err(AdminError::NotFound(format!("banner {id}")));
    }
    Ok(())
}
