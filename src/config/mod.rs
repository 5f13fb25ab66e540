//! Configuração do projeto
//!
//! Este módulo contém a configuração do banco de dados e as variáveis
//! de ambiente da aplicação.

pub mod database;
pub mod environment;

pub use environment::*;
