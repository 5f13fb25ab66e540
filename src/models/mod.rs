//! Modelos do sistema
//!
//! Este módulo contém os modelos de dados que mapeiam as tabelas
//! `fornecedores` e `veiculos`.

pub mod namespace;
pub mod supplier;
pub mod vehicle;

pub use namespace::Namespace;
pub use supplier::Supplier;
pub use vehicle::{Vehicle, VehicleStatus};
