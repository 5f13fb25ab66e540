//! Armazenamento em memória para os testes
//!
//! Reproduz as restrições do schema: chave primária única e a chave
//! estrangeira `veiculos.id_fornecedor → fornecedores.id`.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use super::{
    IdentifierSource, SupplierStore, VehicleStore, SUPPLIER_IN_USE_MESSAGE,
    SUPPLIER_MISSING_MESSAGE,
};
use crate::models::{Namespace, Supplier, Vehicle};
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Default)]
struct Tables {
    suppliers: BTreeMap<String, Supplier>,
    vehicles: BTreeMap<String, Vehicle>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> AppResult<T>) -> AppResult<T> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| AppError::Internal("memory store poisoned".to_string()))?;
        f(&mut tables)
    }
}

fn duplicate_key(id: &str) -> AppError {
    AppError::Internal(format!("duplicate key value violates primary key: {}", id))
}

#[async_trait::async_trait]
impl IdentifierSource for MemoryStore {
    async fn ids_with_prefix(
        &self,
        namespace: Namespace,
        prefix: &str,
    ) -> AppResult<HashSet<String>> {
        self.with(|t| {
            let ids: Vec<&String> = match namespace {
                Namespace::Fornecedores => t.suppliers.keys().collect(),
                Namespace::Veiculos => t.vehicles.keys().collect(),
            };
            Ok(ids
                .into_iter()
                .filter(|id| id.starts_with(prefix))
                .cloned()
                .collect())
        })
    }
}

#[async_trait::async_trait]
impl SupplierStore for MemoryStore {
    async fn insert(&self, supplier: &Supplier) -> AppResult<Supplier> {
        self.with(|t| {
            if t.suppliers.contains_key(&supplier.id) {
                return Err(duplicate_key(&supplier.id));
            }
            t.suppliers.insert(supplier.id.clone(), supplier.clone());
            Ok(supplier.clone())
        })
    }

    async fn update(&self, supplier: &Supplier) -> AppResult<Supplier> {
        self.with(|t| match t.suppliers.get_mut(&supplier.id) {
            Some(existing) => {
                *existing = supplier.clone();
                Ok(supplier.clone())
            }
            None => Err(not_found_error("Fornecedor", &supplier.id)),
        })
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.with(|t| {
            if t.vehicles.values().any(|v| v.supplier_id == id) {
                return Err(AppError::ReferentialIntegrity(
                    SUPPLIER_IN_USE_MESSAGE.to_string(),
                ));
            }
            t.suppliers
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| not_found_error("Fornecedor", id))
        })
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Supplier>> {
        self.with(|t| Ok(t.suppliers.get(id).cloned()))
    }

    async fn list_all(&self) -> AppResult<Vec<Supplier>> {
        self.with(|t| Ok(t.suppliers.values().cloned().collect()))
    }
}

#[async_trait::async_trait]
impl VehicleStore for MemoryStore {
    async fn insert(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        self.with(|t| {
            if !t.suppliers.contains_key(&vehicle.supplier_id) {
                return Err(AppError::ReferentialIntegrity(
                    SUPPLIER_MISSING_MESSAGE.to_string(),
                ));
            }
            if t.vehicles.contains_key(&vehicle.id) {
                return Err(duplicate_key(&vehicle.id));
            }
            t.vehicles.insert(vehicle.id.clone(), vehicle.clone());
            Ok(vehicle.clone())
        })
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        self.with(|t| {
            if !t.suppliers.contains_key(&vehicle.supplier_id) {
                return Err(AppError::ReferentialIntegrity(
                    SUPPLIER_MISSING_MESSAGE.to_string(),
                ));
            }
            match t.vehicles.get_mut(&vehicle.id) {
                Some(existing) => {
                    *existing = vehicle.clone();
                    Ok(vehicle.clone())
                }
                None => Err(not_found_error("Veículo", &vehicle.id)),
            }
        })
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.with(|t| {
            t.vehicles
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| not_found_error("Veículo", id))
        })
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Vehicle>> {
        self.with(|t| Ok(t.vehicles.get(id).cloned()))
    }

    async fn list_all(&self) -> AppResult<Vec<Vehicle>> {
        self.with(|t| Ok(t.vehicles.values().cloned().collect()))
    }

    async fn max_sequential(&self) -> AppResult<Option<i32>> {
        self.with(|t| Ok(t.vehicles.values().map(|v| v.sequential).max()))
    }
}
