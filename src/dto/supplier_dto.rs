use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

// Request para criar ou atualizar um fornecedor
#[derive(Debug, Deserialize, Validate)]
pub struct SupplierRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub nome: String,

    #[validate(length(max = 255))]
    pub pessoa_de_contato: Option<String>,

    #[validate(length(max = 20))]
    pub whatsapp: Option<String>,
}

impl SupplierRequest {
    /// Campos opcionais vazios viram `None`
    pub fn normalized(self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            nome: self.nome.trim().to_string(),
            pessoa_de_contato: blank_to_none(self.pessoa_de_contato),
            whatsapp: blank_to_none(self.whatsapp),
        }
    }
}
