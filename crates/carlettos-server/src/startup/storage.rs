// Storage backend selection

use std::sync::Arc;

use carlettos_persistence::{
    ChessPersistence, EmbeddedPersistService, PersistenceService, StorageMode, SurrealPersistService,
};
use tracing::info;

use crate::model::Configuration;

/// Open the backend named by `storage.mode` and make sure the shared chess
/// game exists
pub async fn create_persistence(
    configuration: &Configuration,
) -> anyhow::Result<Arc<dyn PersistenceService>> {
    let mode = configuration.storage_mode()?;
    let persistence: Arc<dyn PersistenceService> = match mode {
        StorageMode::Embedded => {
            let data_dir = configuration.embedded_data_dir();
            info!("Opening embedded storage at {}", data_dir);
            Arc::new(EmbeddedPersistService::open(&data_dir)?)
        }
        StorageMode::Database => {
            let surreal = configuration.surreal_config();
            info!(
                "Connecting to database engine at {} (ns: {}, db: {})",
                surreal.url, surreal.namespace, surreal.database
            );
            Arc::new(SurrealPersistService::connect(surreal).await?)
        }
    };

    persistence.chess_init().await?;
    info!("Storage ready: {}", persistence.storage_mode());
    Ok(persistence)
}
