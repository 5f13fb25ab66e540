//! Modelo de Fornecedor
//!
//! Mapeia a tabela `fornecedores`. O `id` é imutável depois de atribuído.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Fornecedor principal - mapeia exatamente a tabela fornecedores
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Supplier {
    pub id: String,
    #[serde(rename = "nome")]
    #[sqlx(rename = "nome")]
    pub name: String,
    #[serde(rename = "pessoa_de_contato")]
    #[sqlx(rename = "pessoa_de_contato")]
    pub contact_person: Option<String>,
    pub whatsapp: Option<String>,
}
