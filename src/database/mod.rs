//! Módulo de banco de dados
//!
//! Gerencia a conexão e o schema no PostgreSQL

pub mod connection;

pub use connection::DatabaseConnection;
