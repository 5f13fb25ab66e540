//! Coleções que recebem identificadores gerados

use serde::Serialize;
use std::fmt;

/// Coleção lógica onde os IDs devem ser únicos por minuto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Fornecedores,
    Veiculos,
}

impl Namespace {
    /// Nome da tabela correspondente
    pub fn table(&self) -> &'static str {
        match self {
            Namespace::Fornecedores => "fornecedores",
            Namespace::Veiculos => "veiculos",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}
