//! In-memory caching using moka
//!
//! Provides application-level caching for homestay listings. Listings change
//! rarely compared to how often they are quoted, so they are held with a
//! short TTL. Pricing rules, availability, and bookings are never cached:
//! host edits must show up in the very next quote or calendar call.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::models::Homestay;

/// How many recently updated listings the warmer preloads.
const WARM_HOMESTAY_COUNT: i64 = 50;

/// Application cache holding homestay listings
#[derive(Clone)]
pub struct AppCache {
    /// Homestays (id -> Homestay)
    pub homestays: Cache<Uuid, Arc<Homestay>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Homestays: 1000 entries, 10 min TTL, 5 min idle
            homestays: Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(10 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            homestays_size: self.homestays.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.homestays.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate a specific homestay by id
    pub async fn invalidate_homestay(&self, id: Uuid) {
        self.homestays.invalidate(&id).await;
        info!("Cache invalidated for homestay: {}", id);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub homestays_size: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    // Initial warm-up
    warm_cache(&cache, &db).await;

    // Periodic refresh every 10 minutes
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with recently updated listings
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::list_published_homestays(db, WARM_HOMESTAY_COUNT).await {
        Ok(homestays) => {
            let count = homestays.len();
            for homestay in homestays {
                cache
                    .homestays
                    .insert(homestay.id, Arc::new(homestay))
                    .await;
            }
            info!("Warmed {} homestays", count);
        }
        Err(e) => warn!("Failed to warm homestay cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
