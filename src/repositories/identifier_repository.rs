use std::collections::HashSet;

use sqlx::PgPool;

use super::IdentifierSource;
use crate::models::Namespace;
use crate::utils::errors::{AppError, AppResult};

pub struct PgIdentifierRepository {
    pool: PgPool,
}

impl PgIdentifierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IdentifierSource for PgIdentifierRepository {
    async fn ids_with_prefix(
        &self,
        namespace: Namespace,
        prefix: &str,
    ) -> AppResult<HashSet<String>> {
        // O nome da tabela vem do enum, nunca da requisição
        let query = format!("SELECT id FROM {} WHERE id LIKE $1", namespace.table());

        let rows: Vec<(String,)> = sqlx::query_as(&query)
            .bind(format!("{}%", prefix))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
