pub mod disk;
pub mod memory;

use crate::core::cache::KeyValueStore;
use crate::core::config::AppConfig;
use disk::FjallStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::warn;

/// Opens the on-disk store under the configured data path.
///
/// Falls back to an in-memory store when the disk store cannot be opened, so
/// rates still work for the lifetime of the process.
pub fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    let opened = config
        .default_data_path()
        .map_err(|e| e.to_string())
        .and_then(|path| FjallStore::open(&path.join("cache")).map_err(|e| e.to_string()));

    match opened {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Could not open rate store on disk, using memory");
            Arc::new(MemoryStore::new())
        }
    }
}
