//! Conexão com o PostgreSQL
//!
//! Abre o pool e garante que as tabelas `fornecedores` e `veiculos` existem.

use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;

const CREATE_FORNECEDORES: &str = r#"
    CREATE TABLE IF NOT EXISTS fornecedores (
        id VARCHAR(15) PRIMARY KEY,
        nome VARCHAR(255) NOT NULL,
        pessoa_de_contato VARCHAR(255),
        whatsapp VARCHAR(20)
    )
"#;

const CREATE_VEICULOS: &str = r#"
    CREATE TABLE IF NOT EXISTS veiculos (
        id VARCHAR(15) PRIMARY KEY,
        id_fornecedor VARCHAR(15) NOT NULL REFERENCES fornecedores(id),
        placa VARCHAR(7) NOT NULL,
        ativo VARCHAR(6) NOT NULL,
        status VARCHAR(10) NOT NULL CHECK (status IN ('ok', 'bloqueado', 'desligado')),
        sequencial INT NOT NULL CHECK (sequencial BETWEEN 1 AND 999),
        foto1 VARCHAR(255),
        foto2 VARCHAR(255)
    )
"#;

/// Pool de conexões da aplicação
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Conectar usando a configuração informada
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!("🔌 Conectando ao banco de dados {}", config.masked_url());
        let pool = config.create_pool().await?;
        info!("✅ Conexão com o banco de dados estabelecida.");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Criar as tabelas necessárias, se ainda não existirem
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(CREATE_FORNECEDORES).execute(&mut *tx).await?;
        sqlx::query(CREATE_VEICULOS).execute(&mut *tx).await?;
        tx.commit().await?;
        info!("🗄️ Tabelas do banco de dados criadas com sucesso.");
        Ok(())
    }
}
