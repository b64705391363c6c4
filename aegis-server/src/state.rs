use crate::config::Config;
use aegis_registry::{EventJournal, InMemoryJournal, Registry, SqliteJournal, SystemClock};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Build journal backend
        let journal: Arc<dyn EventJournal> = match config.journal.backend.as_str() {
            "sqlite" => {
                let path = config
                    .journal
                    .path
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("sqlite journal requires journal.path"))?;
                tracing::info!("Opening sqlite journal at {}", path);
                Arc::new(SqliteJournal::open(path)?)
            }
            "memory" => {
                tracing::warn!("Using in-memory journal - state is lost on restart");
                Arc::new(InMemoryJournal::new())
            }
            other => {
                anyhow::bail!(
                    "Unknown journal backend '{}'. Valid options: 'memory', 'sqlite'",
                    other
                );
            }
        };

        let registry =
            Registry::open(journal, Arc::new(SystemClock), config.registry_config()?).await?;

        Ok(Self {
            registry: Arc::new(registry),
        })
    }
}
