use std::sync::Arc;

use service::registry::repo::SeaOrmServiceRepository;
use service::registry::RegistryService;

pub type Registry = RegistryService<SeaOrmServiceRepository>;

/// Shared handler state, built once at startup.
#[derive(Clone)]
pub struct ServerState {
    pub registry: Arc<Registry>,
}

impl ServerState {
    pub fn new(db: sea_orm::DatabaseConnection) -> Self {
        let repo = Arc::new(SeaOrmServiceRepository::new(db));
        Self { registry: Arc::new(RegistryService::new(repo)) }
    }
}
