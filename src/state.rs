//! Estado compartilhado da aplicação
//!
//! Passado para os handlers pelo router do Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::repositories::identifier_repository::PgIdentifierRepository;
use crate::repositories::supplier_repository::PgSupplierRepository;
use crate::repositories::vehicle_repository::PgVehicleRepository;
use crate::repositories::{IdentifierSource, SupplierStore, VehicleStore};
use crate::services::{Clock, IdAllocator, NamespaceLocks, SystemClock, UploadStorage};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub suppliers: Arc<dyn SupplierStore>,
    pub vehicles: Arc<dyn VehicleStore>,
    pub ids: IdAllocator,
    pub locks: NamespaceLocks,
    pub uploads: UploadStorage,
}

impl AppState {
    /// Estado de produção sobre o PostgreSQL
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        Self::with_stores(
            config,
            Arc::new(PgSupplierRepository::new(pool.clone())),
            Arc::new(PgVehicleRepository::new(pool.clone())),
            Arc::new(PgIdentifierRepository::new(pool)),
            Arc::new(SystemClock),
        )
    }

    pub fn with_stores(
        config: AppConfig,
        suppliers: Arc<dyn SupplierStore>,
        vehicles: Arc<dyn VehicleStore>,
        identifiers: Arc<dyn IdentifierSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let uploads = UploadStorage::new(config.upload_folder.clone());
        Self {
            config: Arc::new(config),
            suppliers,
            vehicles,
            ids: IdAllocator::new(identifiers, clock),
            locks: NamespaceLocks::new(),
            uploads,
        }
    }
}
