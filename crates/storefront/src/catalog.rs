//! Read-only catalog queries.
//!
//! Every query is a thin filter over the `perfumes` table. Results are
//! cached for 5 minutes keyed by query shape; search is never cached and
//! mutable cart state never passes through here. Admin catalog writes call
//! [`CatalogReader::invalidate`].

use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use attar_core::{Category, Perfume, PerfumeId, tables};
use attar_datastore::{Filter, Query, StoreError, TableStore};

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

#[derive(Clone)]
enum CacheEntry {
    One(Box<Perfume>),
    Many(Vec<Perfume>),
}

/// Client-side sort keys applied to a fetched set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
    Brand,
}

/// Sort a fetched set in place. Price keys use the effective (discounted)
/// price, which is what the shopper is comparing.
pub fn sort(perfumes: &mut [Perfume], key: SortKey) {
    match key {
        SortKey::Newest => perfumes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::PriceAsc => perfumes.sort_by_key(Perfume::effective_price),
        SortKey::PriceDesc => {
            perfumes.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()));
        }
        SortKey::Name => perfumes.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortKey::Brand => {
            perfumes.sort_by(|a, b| a.brand.to_lowercase().cmp(&b.brand.to_lowercase()));
        }
    }
}

/// Read-only perfume queries with a short-lived cache.
pub struct CatalogReader<S> {
    store: S,
    cache: Cache<String, CacheEntry>,
}

impl<S: TableStore> CatalogReader<S> {
    /// Create a reader over `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        Self { store, cache }
    }

    /// The whole catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    pub async fn all(&self) -> Result<Vec<Perfume>, StoreError> {
        self.cached_many("all", Query::new().order_desc("created_at"))
            .await
    }

    /// Featured perfumes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    pub async fn featured(&self) -> Result<Vec<Perfume>, StoreError> {
        self.cached_many(
            "featured",
            Query::new()
                .filter(Filter::eq("featured", true))
                .order_desc("created_at"),
        )
        .await
    }

    /// Perfumes in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    pub async fn by_category(&self, category: Category) -> Result<Vec<Perfume>, StoreError> {
        self.cached_many(
            &format!("category:{category}"),
            Query::new()
                .filter(Filter::eq("category", category))
                .order_desc("created_at"),
        )
        .await
    }

    /// Perfumes with an active discount.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    pub async fn discounted(&self) -> Result<Vec<Perfume>, StoreError> {
        self.cached_many(
            "discounted",
            Query::new().filter(Filter::not_null("discount_price")),
        )
        .await
    }

    /// The exclusive shelf: list price at or above `min_price`, priciest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    pub async fn exclusive(&self, min_price: Decimal) -> Result<Vec<Perfume>, StoreError> {
        self.cached_many(
            &format!("exclusive:{min_price}"),
            Query::new()
                .filter(Filter::gte("price", min_price))
                .order_desc("price"),
        )
        .await
    }

    /// Perfumes of one brand.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    pub async fn by_brand(&self, brand: &str) -> Result<Vec<Perfume>, StoreError> {
        self.cached_many(
            &format!("brand:{brand}"),
            Query::new().filter(Filter::eq("brand", brand)),
        )
        .await
    }

    /// The landing-page shelves: featured and discounted perfumes, fetched
    /// concurrently and joined before returning.
    ///
    /// # Errors
    ///
    /// Returns the first error if either fetch fails.
    pub async fn highlights(&self) -> Result<(Vec<Perfume>, Vec<Perfume>), StoreError> {
        let (featured, discounted) = tokio::join!(self.featured(), self.discounted());
        Ok((featured?, discounted?))
    }

    /// Case-insensitive substring search over name and brand. Not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<Perfume>, StoreError> {
        self.store
            .select(
                tables::PERFUMES,
                Query::new().filter(Filter::any_ilike(["name", "brand"], term)),
            )
            .await
    }

    /// One perfume by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such perfume exists, or any
    /// transport error.
    #[instrument(skip(self), fields(perfume_id = %id))]
    pub async fn get(&self, id: PerfumeId) -> Result<Perfume, StoreError> {
        let key = format!("perfume:{id}");

        if let Some(CacheEntry::One(perfume)) = self.cache.get(&key).await {
            debug!("cache hit for perfume");
            return Ok(*perfume);
        }

        let rows: Vec<Perfume> = self
            .store
            .select(
                tables::PERFUMES,
                Query::new().filter(Filter::eq("id", id)).limit(1),
            )
            .await?;

        let perfume = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("perfume {id}")))?;

        self.cache
            .insert(key, CacheEntry::One(Box::new(perfume.clone())))
            .await;

        Ok(perfume)
    }

    /// Drop all cached results. Called after catalog writes.
    pub async fn invalidate(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    async fn cached_many(&self, key: &str, query: Query) -> Result<Vec<Perfume>, StoreError> {
        if let Some(CacheEntry::Many(perfumes)) = self.cache.get(key).await {
            debug!(key = %key, "cache hit for catalog query");
            return Ok(perfumes);
        }

        let perfumes: Vec<Perfume> = self.store.select(tables::PERFUMES, query).await?;

        self.cache
            .insert(key.to_string(), CacheEntry::Many(perfumes.clone()))
            .await;

        Ok(perfumes)
    }
}
