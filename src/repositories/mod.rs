//! Camada de armazenamento
//!
//! Os controllers dependem destes traits, não do PostgreSQL diretamente.
//! A implementação em memória existe só para os testes.

pub mod identifier_repository;
pub mod supplier_repository;
pub mod vehicle_repository;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use std::collections::HashSet;

use crate::models::{Namespace, Supplier, Vehicle};
use crate::utils::errors::AppResult;

/// Consulta de IDs existentes para o alocador
#[async_trait]
pub trait IdentifierSource: Send + Sync {
    /// IDs da coleção que começam com `prefix`
    async fn ids_with_prefix(&self, namespace: Namespace, prefix: &str)
        -> AppResult<HashSet<String>>;
}

#[async_trait]
pub trait SupplierStore: Send + Sync {
    async fn insert(&self, supplier: &Supplier) -> AppResult<Supplier>;
    /// `NotFound` se o fornecedor não existir
    async fn update(&self, supplier: &Supplier) -> AppResult<Supplier>;
    /// `ReferentialIntegrity` se algum veículo ainda referenciar o fornecedor
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Supplier>>;
    async fn list_all(&self) -> AppResult<Vec<Supplier>>;
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// `ReferentialIntegrity` se o fornecedor não existir
    async fn insert(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;
    async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Vehicle>>;
    async fn list_all(&self) -> AppResult<Vec<Vehicle>>;
    /// Maior `sequencial` gravado, `None` sem veículos
    async fn max_sequential(&self) -> AppResult<Option<i32>>;
}

pub const SUPPLIER_IN_USE_MESSAGE: &str = "Não é possível excluir o fornecedor porque ele está associado a veículos. Remova os veículos associados primeiro.";
pub const SUPPLIER_MISSING_MESSAGE: &str = "Fornecedor informado não existe.";
