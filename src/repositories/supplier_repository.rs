use sqlx::PgPool;

use super::{SupplierStore, SUPPLIER_IN_USE_MESSAGE};
use crate::models::Supplier;
use crate::utils::errors::{map_constraint_error, not_found_error, AppError, AppResult};

pub struct PgSupplierRepository {
    pool: PgPool,
}

impl PgSupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SupplierStore for PgSupplierRepository {
    async fn insert(&self, supplier: &Supplier) -> AppResult<Supplier> {
        let result = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO fornecedores (id, nome, pessoa_de_contato, whatsapp)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact_person)
        .bind(&supplier.whatsapp)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn update(&self, supplier: &Supplier) -> AppResult<Supplier> {
        let result = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE fornecedores
            SET nome = $2, pessoa_de_contato = $3, whatsapp = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact_person)
        .bind(&supplier.whatsapp)
        .fetch_optional(&self.pool)
        .await?;

        result.ok_or_else(|| not_found_error("Fornecedor", &supplier.id))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM fornecedores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_constraint_error(e, SUPPLIER_IN_USE_MESSAGE))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Fornecedor", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Supplier>> {
        let result = sqlx::query_as::<_, Supplier>("SELECT * FROM fornecedores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result)
    }

    async fn list_all(&self) -> AppResult<Vec<Supplier>> {
        let result = sqlx::query_as::<_, Supplier>("SELECT * FROM fornecedores ORDER BY nome")
            .fetch_all(&self.pool)
            .await?;

        Ok(result)
    }
}
