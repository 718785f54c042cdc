//! Process lifecycle: one store per process, seeded on `init`, released on
//! `shutdown`.

use std::sync::Arc;

use axum::Router;
use tracing::{info, warn};

use crate::listings::{listing_router, ListingService, ListingServiceError, SeedOutcome};
use crate::store::{DocumentStore, StoreError};

/// Owns the store and the listing service for the life of the process.
pub struct Backend<S> {
    service: Arc<ListingService<S>>,
    seed: SeedOutcome,
}

impl<S> Backend<S>
where
    S: DocumentStore + 'static,
{
    /// Runs the seeding check once against the freshly opened store.
    pub async fn init(store: S) -> Result<Self, ListingServiceError> {
        let service = Arc::new(ListingService::new(Arc::new(store)));
        let seed = service.seed_properties().await?;
        info!(?seed, "backend initialized");
        Ok(Self { service, seed })
    }

    pub fn seed_outcome(&self) -> SeedOutcome {
        self.seed
    }

    pub fn router(&self) -> Router {
        listing_router(self.service.clone())
    }

    /// Closes the store. Routers built from this backend must be dropped first.
    pub async fn shutdown(self) -> Result<(), StoreError> {
        let Self { service, .. } = self;
        if Arc::strong_count(&service) > 1 {
            warn!("shutting down while the listing service is still shared");
        }
        service.store().close().await?;
        info!("backend shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use bson::doc;

    #[tokio::test]
    async fn init_seeds_an_empty_store_once() {
        let store = MemoryStore::new();
        let backend = Backend::init(store.clone()).await.expect("init");
        assert_eq!(backend.seed_outcome(), SeedOutcome::Seeded(6));
        backend.shutdown().await.expect("shutdown");

        let restarted = Backend::init(store.clone()).await.expect("second init");
        assert_eq!(
            restarted.seed_outcome(),
            SeedOutcome::Skipped { existing: 6 }
        );
        assert_eq!(
            store.count(crate::listings::PROPERTIES, doc! {}).await.expect("count"),
            6
        );
    }
}
