//! Sistema de tratamento de erros
//!
//! Este módulo define os tipos de erro do sistema
//! e sua conversão em respostas HTTP apropriadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::dto::MessageCategory;

/// Erros principais da aplicação
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No identifiers left for {namespace} in minute {prefix}")]
    AllocatorExhausted { namespace: String, prefix: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Referential integrity violation: {0}")]
    ReferentialIntegrity(String),

    #[error("Artifact generation failed: {0}")]
    ArtifactGeneration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Resposta de erro da API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    category: MessageCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AllocatorExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ReferentialIntegrity(_) => StatusCode::CONFLICT,
            AppError::ArtifactGeneration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::AllocatorExhausted { .. } => "ALLOCATOR_EXHAUSTED",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::ReferentialIntegrity(_) => "REFERENTIAL_INTEGRITY",
            AppError::ArtifactGeneration(_) => "ARTIFACT_GENERATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Mensagem legível para o operador
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(_) => "Erro ao acessar o banco de dados".to_string(),
            AppError::Validation(_) => "Os dados informados são inválidos".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::AllocatorExhausted { .. } => {
                "Não há IDs disponíveis para o período atual.".to_string()
            }
            AppError::Configuration(msg) => format!("Configuração inválida: {}", msg),
            AppError::ReferentialIntegrity(msg) => msg.clone(),
            AppError::ArtifactGeneration(msg) => format!("Erro ao gerar arquivo: {}", msg),
            AppError::Internal(_) => "Ocorreu um erro inesperado".to_string(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Database(e) => Some(json!({ "sql_error": e.to_string() })),
            AppError::Validation(e) => Some(json!(e)),
            AppError::AllocatorExhausted { namespace, prefix } => {
                Some(json!({ "namespace": namespace, "prefix": prefix }))
            }
            AppError::Internal(msg) => Some(json!({ "internal_error": msg })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        error!("❌ {} ({})", self, status);

        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message: self.user_message(),
            category: MessageCategory::Danger,
            details: self.details(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operações que podem falhar
pub type AppResult<T> = Result<T, AppError>;

/// Função helper para erros de recurso não encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} '{}' não encontrado!", resource, id))
}

/// Função helper para erros de requisição incorreta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

/// Função helper para erros de configuração
pub fn configuration_error(key: &str) -> AppError {
    AppError::Configuration(format!("{} não configurado", key))
}

/// Converte erros de I/O de arquivos gerados
pub fn artifact_error(context: &str, e: impl std::fmt::Display) -> AppError {
    AppError::ArtifactGeneration(format!("{}: {}", context, e))
}

/// SQLSTATE de violação de chave estrangeira no PostgreSQL
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Traduz a violação de chave estrangeira para `ReferentialIntegrity`
pub fn map_constraint_error(e: sqlx::Error, message: &str) -> AppError {
    let is_fk = e
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == FOREIGN_KEY_VIOLATION)
        .unwrap_or(false);

    if is_fk {
        AppError::ReferentialIntegrity(message.to_string())
    } else {
        AppError::Database(e)
    }
}
