use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::dto::supplier_dto::SupplierRequest;
use crate::dto::ApiResponse;
use crate::models::{Namespace, Supplier};
use crate::repositories::SupplierStore;
use crate::services::{IdAllocator, NamespaceLocks};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct SupplierController {
    suppliers: Arc<dyn SupplierStore>,
    ids: IdAllocator,
    locks: NamespaceLocks,
}

impl SupplierController {
    pub fn new(state: &AppState) -> Self {
        Self {
            suppliers: state.suppliers.clone(),
            ids: state.ids.clone(),
            locks: state.locks.clone(),
        }
    }

    pub async fn create(&self, request: SupplierRequest) -> AppResult<ApiResponse<Supplier>> {
        request.validate()?;
        let request = request.normalized();

        // Alocar e inserir sob o mesmo guard
        let _guard = self.locks.lock(Namespace::Fornecedores).await;
        let id = self.ids.allocate(Namespace::Fornecedores).await?;
        let supplier = Supplier {
            id,
            name: request.nome,
            contact_person: request.pessoa_de_contato,
            whatsapp: request.whatsapp,
        };
        let saved = self.suppliers.insert(&supplier).await?;

        info!("✅ Fornecedor {} cadastrado: {}", saved.id, saved.name);
        Ok(ApiResponse::success_with_message(
            saved,
            "Fornecedor cadastrado com sucesso!".to_string(),
        ))
    }

    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        self.suppliers.list_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Supplier> {
        self.suppliers
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Fornecedor", id))
    }

    pub async fn update(
        &self,
        id: &str,
        request: SupplierRequest,
    ) -> AppResult<ApiResponse<Supplier>> {
        request.validate()?;
        let request = request.normalized();

        let existing = self.get_by_id(id).await?;
        let supplier = Supplier {
            id: existing.id,
            name: request.nome,
            contact_person: request.pessoa_de_contato,
            whatsapp: request.whatsapp,
        };
        let saved = self.suppliers.update(&supplier).await?;

        info!("✏️ Fornecedor {} atualizado", saved.id);
        Ok(ApiResponse::success_with_message(
            saved,
            "Fornecedor atualizado com sucesso!".to_string(),
        ))
    }

    pub async fn delete(&self, id: &str) -> AppResult<ApiResponse<()>> {
        self.suppliers.delete(id).await?;
        info!("🗑️ Fornecedor {} excluído", id);
        Ok(ApiResponse::message("Fornecedor excluído com sucesso!".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::memory_state;
    use crate::dto::MessageCategory;
    use crate::utils::errors::AppError;

    fn request(nome: &str) -> SupplierRequest {
        SupplierRequest {
            nome: nome.to_string(),
            pessoa_de_contato: Some("João".into()),
            whatsapp: Some("".into()),
        }
    }

    #[tokio::test]
    async fn test_create_allocates_id_and_normalizes() {
        let (state, _tmp) = memory_state();
        let controller = SupplierController::new(&state);

        let response = controller.create(request("  Acme  ")).await.unwrap();
        assert_eq!(response.category, MessageCategory::Success);
        let supplier = response.data.unwrap();
        assert_eq!(supplier.id, "202410191200000");
        assert_eq!(supplier.name, "Acme");
        assert_eq!(supplier.whatsapp, None);

        let second = controller.create(request("Beta")).await.unwrap().data.unwrap();
        assert_eq!(second.id, "202410191200001");
        assert_eq!(controller.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (state, _tmp) = memory_state();
        let err = SupplierController::new(&state)
            .create(request("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let (state, _tmp) = memory_state();
        let controller = SupplierController::new(&state);
        let created = controller.create(request("Acme")).await.unwrap().data.unwrap();

        let updated = controller
            .update(&created.id, request("Acme Ltda"))
            .await
            .unwrap()
            .data
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(controller.get_by_id(&created.id).await.unwrap().name, "Acme Ltda");

        let missing = controller.update("000", request("X")).await.unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_supplier() {
        let (state, _tmp) = memory_state();
        let err = SupplierController::new(&state).delete("nada").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
