use std::sync::Arc;

use tracing::info;

use super::{
    auth::Authenticator,
    catalog::{Catalog, MemoryCatalog},
    config::{Backend, Config},
    database::{RedisCatalog, RedisLedger, init_redis},
    error::StorageError,
    ledger::{MemoryLedger, VoteLedger},
};

pub struct State {
    pub config: Config,
    pub ledger: Arc<dyn VoteLedger>,
    pub catalog: Arc<dyn Catalog>,
    pub auth: Authenticator,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>, StorageError> {
        let (ledger, catalog): (Arc<dyn VoteLedger>, Arc<dyn Catalog>) = match config.backend {
            Backend::Memory => {
                info!("Using in-memory ledger");

                let catalog = match &config.seed_path {
                    Some(path) => MemoryCatalog::load(path)?,
                    None => MemoryCatalog::default(),
                };

                (Arc::new(MemoryLedger::default()), Arc::new(catalog))
            }
            Backend::Redis => {
                info!("Connecting to Redis at {}", config.redis_url);

                let connection = init_redis(&config.redis_url).await?;

                (
                    Arc::new(RedisLedger::new(connection.clone())),
                    Arc::new(RedisCatalog::new(connection)),
                )
            }
        };

        Ok(Self::with_stores(config, ledger, catalog))
    }

    pub fn with_stores(
        config: Config,
        ledger: Arc<dyn VoteLedger>,
        catalog: Arc<dyn Catalog>,
    ) -> Arc<Self> {
        let auth = Authenticator::new(&config.jwt_secret);

        Arc::new(Self {
            config,
            ledger,
            catalog,
            auth,
        })
    }
}
