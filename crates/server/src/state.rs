use std::sync::Arc;

use db::DBService;
use db::store::{DbOrderStore, InMemoryOrderStore, OrderStore};
use services::services::{
    config::{Config, StorageBackend},
    export::SiteExportService,
    generation::{CompletionClient, GenerationService, OpenAiCompletionClient},
    orders::OrderService,
};

/// Everything a request handler needs, assembled once at startup.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn OrderStore>,
    orders: OrderService,
    generation: GenerationService,
    export: SiteExportService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn OrderStore> = match config.storage {
            StorageBackend::Database => Arc::new(DbOrderStore::new(DBService::new().await?)),
            StorageBackend::Memory => {
                tracing::info!("Using in-memory order store; state is not persisted");
                Arc::new(InMemoryOrderStore::new())
            }
        };
        let client = Arc::new(OpenAiCompletionClient::new(&config.generation)?);
        Ok(Self::with_parts(store, client))
    }

    /// Assembly seam for tests: any store and completion client.
    pub fn with_parts(store: Arc<dyn OrderStore>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            store,
            orders: OrderService::new(),
            generation: GenerationService::new(client),
            export: SiteExportService::new(),
        }
    }

    pub fn store(&self) -> &dyn OrderStore {
        self.store.as_ref()
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    pub fn generation(&self) -> &GenerationService {
        &self.generation
    }

    pub fn export(&self) -> &SiteExportService {
        &self.export
    }
}
