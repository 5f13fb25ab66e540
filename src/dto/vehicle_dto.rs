use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Vehicle;
use crate::utils::validation::{validate_asset_tag, validate_plate};

/// Arquivo de foto recebido no formulário
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

// Formulário de veículo (multipart), já com a placa normalizada
#[derive(Debug, Default, Validate)]
pub struct VehicleForm {
    #[validate(length(min = 1, max = 15))]
    pub supplier_id: String,

    #[validate(custom = "validate_plate")]
    pub plate: String,

    #[validate(custom = "validate_asset_tag")]
    pub asset_tag: String,

    pub status: String,

    pub photo1: Option<PhotoUpload>,
    pub photo2: Option<PhotoUpload>,
}

impl VehicleForm {
    pub fn photo(&self, slot: u8) -> Option<&PhotoUpload> {
        match slot {
            1 => self.photo1.as_ref(),
            2 => self.photo2.as_ref(),
            _ => None,
        }
    }
}

// Request do fluxo de impressão
#[derive(Debug, Deserialize, Validate)]
pub struct PrintRequest {
    #[validate(url)]
    pub link: String,
}

// Response de veículo com o caminho da etiqueta, quando gerada
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etiqueta: Option<String>,
}

// Response do fluxo de impressão
#[derive(Debug, Serialize)]
pub struct PrintResponse {
    pub qr_code: String,
    pub pdf: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_form_validation() {
        let form = VehicleForm {
            supplier_id: "202410191100000".into(),
            plate: "ABC1D23".into(),
            asset_tag: "001".into(),
            status: "ok".into(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());

        let bad_plate = VehicleForm {
            plate: "AB-1234".into(),
            ..form
        };
        let errors = bad_plate.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("plate"));
    }

    #[test]
    fn test_print_request_requires_url() {
        assert!(PrintRequest { link: "https://exemplo.com/v/1".into() }
            .validate()
            .is_ok());
        assert!(PrintRequest { link: "não é url".into() }.validate().is_err());
    }
}
