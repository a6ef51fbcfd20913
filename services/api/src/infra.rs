use auto_quote::catalog::{loader, VehicleCatalog};
use auto_quote::config::{AppConfig, CatalogConfig, PricingConfig, StoreBackend, StoreConfig};
use auto_quote::error::AppError;
use auto_quote::quotes::{
    InMemoryQuoteRepository, JsonFileQuoteRepository, PricingEngine, PricingTable, QuoteId,
    QuoteRecord, QuoteRepository, QuoteService, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Quote backend chosen at startup from `APP_QUOTE_STORE`.
#[derive(Debug)]
pub(crate) enum QuoteStore {
    Memory(InMemoryQuoteRepository),
    File(JsonFileQuoteRepository),
}

impl QuoteStore {
    pub(crate) fn open(config: &StoreConfig) -> Self {
        match config.backend {
            StoreBackend::Memory => {
                info!("using in-memory quote store");
                Self::Memory(InMemoryQuoteRepository::new())
            }
            StoreBackend::File => {
                info!(path = %config.path.display(), "using json file quote store");
                Self::File(JsonFileQuoteRepository::new(config.path.clone()))
            }
        }
    }

    fn inner(&self) -> &dyn QuoteRepository {
        match self {
            Self::Memory(store) => store,
            Self::File(store) => store,
        }
    }
}

impl QuoteRepository for QuoteStore {
    fn insert(&self, record: QuoteRecord) -> Result<QuoteRecord, RepositoryError> {
        self.inner().insert(record)
    }

    fn fetch(&self, id: &QuoteId) -> Result<Option<QuoteRecord>, RepositoryError> {
        self.inner().fetch(id)
    }

    fn list(&self) -> Result<Vec<QuoteRecord>, RepositoryError> {
        self.inner().list()
    }

    fn delete(&self, id: &QuoteId) -> Result<bool, RepositoryError> {
        self.inner().delete(id)
    }
}

pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<VehicleCatalog, AppError> {
    match &config.directory {
        Some(dir) => {
            let catalog = loader::load_dir(dir, config.type_match)?;
            info!(
                dir = %dir.display(),
                types = catalog.types().len(),
                makes = catalog.makes().len(),
                "loaded vehicle catalog"
            );
            Ok(catalog)
        }
        None => Ok(VehicleCatalog::standard().with_policy(config.type_match)),
    }
}

pub(crate) fn load_pricing(config: &PricingConfig) -> Result<PricingEngine, AppError> {
    let table = match &config.table_path {
        Some(path) => {
            let table = PricingTable::from_path(path)?;
            info!(path = %path.display(), "loaded pricing table");
            table
        }
        None => PricingTable::default(),
    };
    Ok(PricingEngine::new(table))
}

pub(crate) fn build_quote_service(
    config: &AppConfig,
) -> Result<QuoteService<QuoteStore>, AppError> {
    let catalog = load_catalog(&config.catalog)?;
    let engine = load_pricing(&config.pricing)?;
    let store = QuoteStore::open(&config.store);
    Ok(QuoteService::new(Arc::new(store), Arc::new(catalog), engine))
}
