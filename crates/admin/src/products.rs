//! Catalog writes.
//!
//! The one invariant enforced here: a discount price, when set, must be
//! strictly below the list price. Updates validate against the merged row
//! (current values plus the patch), so changing the list price under an
//! existing discount is caught too.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};

use attar_core::{Category, Perfume, PerfumeId, tables};
use attar_datastore::{Filter, Query, TableStore};

use crate::error::AdminError;

/// Input for a new catalog entry.
#[derive(Debug, Clone)]
pub struct NewPerfume {
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub image_url: String,
    pub category: Category,
    pub stock: u32,
    pub featured: bool,
}

/// Partial update for a catalog entry. Absent fields are left untouched;
/// `discount_price` distinguishes "leave alone" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct PerfumeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Option<Decimal>>,
}

#[derive(Serialize)]
struct Timestamped<'a, P: Serialize> {
    #[serde(flatten)]
    patch: &'a P,
    updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct StockPatch {
    stock: u32,
}

#[derive(Serialize)]
struct FeaturedPatch {
    featured: bool,
}

fn check_discount(price: Decimal, discount: Option<Decimal>) -> Result<(), AdminError> {
    match discount {
        Some(d) if d >= price => Err(AdminError::InvalidDiscount { price, discount: d }),
        _ => Ok(()),
    }
}

/// Create a catalog entry.
///
/// # Errors
///
/// Returns [`AdminError::InvalidDiscount`] when the discount is not below
/// the price, or a store error.
#[instrument(skip(store, new), fields(name = %new.name))]
pub async fn create_perfume<S: TableStore>(
    store: &S,
    new: NewPerfume,
) -> Result<Perfume, AdminError> {
    check_discount(new.price, new.discount_price)?;

    let now = Utc::now();
    let perfume = Perfume {
        id: PerfumeId::generate(),
        name: new.name,
        brand: new.brand,
        description: new.description,
        price: new.price,
        discount_price: new.discount_price,
        image_url: new.image_url,
        category: new.category,
        stock: new.stock,
        featured: new.featured,
        created_at: now,
        updated_at: now,
    };

    let stored: Vec<Perfume> = store
        .insert(tables::PERFUMES, &std::slice::from_ref(&perfume))
        .await?;

    info!(perfume_id = %perfume.id, "perfume created");
    Ok(stored.into_iter().next().unwrap_or(perfume))
}

/// Apply a partial update to a catalog entry.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown perfume,
/// [`AdminError::InvalidDiscount`] when the merged row would violate the
/// discount invariant, or a store error.
#[instrument(skip(store, update), fields(perfume_id = %id))]
pub async fn update_perfume<S: TableStore>(
    store: &S,
    id: PerfumeId,
    update: PerfumeUpdate,
) -> Result<Perfume, AdminError> {
    let current = fetch(store, id).await?;

    let merged_price = update.price.unwrap_or(current.price);
    let merged_discount = update
        .discount_price
        .unwrap_or(current.discount_price);
    check_discount(merged_price, merged_discount)?;

    let updated: Vec<Perfume> = store
        .update(
            tables::PERFUMES,
            &Timestamped {
                patch: &update,
                updated_at: Utc::now(),
            },
            &[Filter::eq("id", id)],
        )
        .await?;

    updated
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("perfume {id}")))
}

/// Overwrite the stock count.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown perfume, or a store
/// error.
pub async fn set_stock<S: TableStore>(
    store: &S,
    id: PerfumeId,
    stock: u32,
) -> Result<Perfume, AdminError> {
    patch_one(store, id, &StockPatch { stock }).await
}

/// Toggle the featured flag.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown perfume, or a store
/// error.
pub async fn set_featured<S: TableStore>(
    store: &S,
    id: PerfumeId,
    featured: bool,
) -> Result<Perfume, AdminError> {
    patch_one(store, id, &FeaturedPatch { featured }).await
}

/// Remove a catalog entry. Order history keeps its snapshotted prices.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] for an unknown perfume, or a store
/// error.
#[instrument(skip(store), fields(perfume_id = %id))]
pub async fn delete_perfume<S: TableStore>(store: &S, id: PerfumeId) -> Result<(), AdminError> {
    let removed = store
        .delete(tables::PERFUMES, &[Filter::eq("id", id)])
        .await?;
    if removed == 0 {
        return Err(AdminError::NotFound(format!("perfume {id}")));
    }
    info!("perfume deleted");
    Ok(())
}

async fn fetch<S: TableStore>(store: &S, id: PerfumeId) -> Result<Perfume, AdminError> {
    let rows: Vec<Perfume> = store
        .select(
            tables::PERFUMES,
            Query::new().filter(Filter::eq("id", id)).limit(1),
        )
        .await?;
    rows.into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("perfume {id}")))
}

async fn patch_one<S: TableStore, P: Serialize + Sync>(
    store: &S,
    id: PerfumeId,
    patch: &P,
) -> Result<Perfume, AdminError> {
    let updated: Vec<Perfume> = store
        .update(
            tables::PERFUMES,
            &Timestamped {
                patch,
                updated_at: Utc::now(),
            },
            &[Filter::eq("id", id)],
        )
        .await?;
    updated
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("perfume {id}")))
}
