//! Modelo de Veículo
//!
//! Este módulo contém o struct `Vehicle` e o enum de status.
//! Os nomes serializados seguem as colunas da tabela `veiculos`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::errors::AppError;

/// Limite superior do número sequencial exibido
pub const MAX_SEQUENTIAL: i32 = 999;

/// Status do veículo - mapeia a coluna `status`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VehicleStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "bloqueado")]
    Blocked,
    #[serde(rename = "desligado")]
    Decommissioned,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Ok => "ok",
            VehicleStatus::Blocked => "bloqueado",
            VehicleStatus::Decommissioned => "desligado",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, VehicleStatus::Ok)
    }

    /// Texto da faixa de status na etiqueta
    pub fn banner_text(&self) -> String {
        if self.is_ok() {
            "LIBERADO".to_string()
        } else {
            self.as_str().to_uppercase()
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ok" => Ok(VehicleStatus::Ok),
            "bloqueado" => Ok(VehicleStatus::Blocked),
            "desligado" => Ok(VehicleStatus::Decommissioned),
            other => Err(AppError::BadRequest(format!(
                "Status inválido: '{}' (use ok, bloqueado ou desligado)",
                other
            ))),
        }
    }
}

/// Veículo principal - mapeia a tabela `veiculos`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: String,
    #[serde(rename = "id_fornecedor")]
    pub supplier_id: String,
    #[serde(rename = "placa")]
    pub plate: String,
    #[serde(rename = "ativo")]
    pub asset_tag: String,
    pub status: VehicleStatus,
    #[serde(rename = "sequencial")]
    pub sequential: i32,
    #[serde(rename = "foto1")]
    pub photo1: Option<String>,
    #[serde(rename = "foto2")]
    pub photo2: Option<String>,
}

impl Vehicle {
    /// Sequencial com três dígitos, como impresso
    pub fn padded_sequential(&self) -> String {
        format!("{:03}", self.sequential)
    }

    /// Referências de foto por slot (1 e 2)
    pub fn photos(&self) -> [Option<&str>; 2] {
        [self.photo1.as_deref(), self.photo2.as_deref()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_banner_text() {
        assert_eq!(VehicleStatus::Ok.banner_text(), "LIBERADO");
        assert_eq!(VehicleStatus::Blocked.banner_text(), "BLOQUEADO");
        assert_eq!(VehicleStatus::Decommissioned.banner_text(), "DESLIGADO");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("OK".parse::<VehicleStatus>().unwrap(), VehicleStatus::Ok);
        assert_eq!(
            "bloqueado".parse::<VehicleStatus>().unwrap(),
            VehicleStatus::Blocked
        );
        assert!("vendido".parse::<VehicleStatus>().is_err());
    }

    #[test]
    fn test_vehicle_serializes_with_column_names() {
        let vehicle = Vehicle {
            id: "202410191200000".into(),
            supplier_id: "202410191100000".into(),
            plate: "ABC1234".into(),
            asset_tag: "001".into(),
            status: VehicleStatus::Blocked,
            sequential: 7,
            photo1: None,
            photo2: None,
        };
        let json = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(json["placa"], "ABC1234");
        assert_eq!(json["status"], "bloqueado");
        assert_eq!(json["sequencial"], 7);
        assert_eq!(vehicle.padded_sequential(), "007");
    }
}
