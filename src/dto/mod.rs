//! Objetos de transferência da API
//!
//! Corpos de requisição/resposta e o envelope `ApiResponse` com a
//! categoria da mensagem exibida ao operador.

pub mod supplier_dto;
pub mod vehicle_dto;

use serde::Serialize;

/// Categoria da mensagem exibida ao operador
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageCategory {
    Success,
    Warning,
    Danger,
}

/// Resposta genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub category: MessageCategory,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            category: MessageCategory::Success,
            message: Some(message),
            data: Some(data),
        }
    }

    /// Operação principal concluída, mas um artefato secundário falhou
    pub fn warning(data: T, message: String) -> Self {
        Self {
            success: true,
            category: MessageCategory::Warning,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: String) -> Self {
        Self {
            success: true,
            category: MessageCategory::Success,
            message: Some(message),
            data: None,
        }
    }
}
