use log::{info, warn};

use super::catalog::Catalog;
use super::endpoint::StoreEndpoint;

/// Result of one inventory read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote counts were applied; `updated` products had an entry in the response.
    Synced { updated: usize },
    /// The read failed and the given snapshot was kept as is.
    Fallback { reason: String },
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

/// Reads current stock once and overlays it on `catalog`.
///
/// Any failure keeps the snapshot unchanged. There is no retry.
pub fn sync_catalog(endpoint: &dyn StoreEndpoint, catalog: &Catalog) -> (Catalog, SyncOutcome) {
    match endpoint.fetch_inventory() {
        Ok(levels) => {
            let updated = catalog
                .products()
                .iter()
                .filter(|p| levels.contains_key(&p.id))
                .count();
            info!("Inventory loaded from remote sheet ({updated} products updated)");
            (
                catalog.with_inventory(&levels),
                SyncOutcome::Synced { updated },
            )
        }
        Err(e) => {
            warn!("Could not load remote inventory, using local data: {e}");
            (
                catalog.clone(),
                SyncOutcome::Fallback {
                    reason: e.to_string(),
                },
            )
        }
    }
}
