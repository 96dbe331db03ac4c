use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, LedgerService, SeaOrmAuthService, SeaOrmLedgerService};

/// Long-lived handles shared by the HTTP layer and the CLI.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub ledger: Arc<dyn LedgerService>,

    pub auth: Arc<dyn AuthService>,
}

impl SharedState {
    /// Opens the store, applies migrations and seeds empty roster tables.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store).await
    }

    pub async fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let ledger = Arc::new(SeaOrmLedgerService::new(store.clone(), &config))
            as Arc<dyn LedgerService>;
        let auth = Arc::new(SeaOrmAuthService::new(store.clone()))
            as Arc<dyn AuthService>;

        ledger
            .seed_if_empty()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed roster: {e}"))?;

        Ok(Self {
            config: Arc::new(config),
            store,
            ledger,
            auth,
        })
    }
}
