mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::database::DatabaseConfig;
use config::AppConfig;
use database::DatabaseConnection;
use middleware::cors_layer;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Carregar variáveis de ambiente
    dotenv().ok();

    // Sem configuração válida não há como sequer abrir o log
    let config = AppConfig::from_env().context("configuração inválida")?;
    let _log_guard = utils::logger::init_logging(&config.log_dir)?;

    info!("🌾 ID Colheita - identificação de veículos da safra {}", config.safra);
    info!("================================================");

    // Inicializar banco de dados
    let db_config = DatabaseConfig::from_env().context("configuração do banco inválida")?;
    info!("🗄️ Conectando em {}", db_config.masked_url());
    let db_connection = match DatabaseConnection::new(&db_config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Erro conectando ao banco de dados: {}", e);
            return Err(anyhow::anyhow!("Erro de banco de dados: {}", e));
        }
    };
    db_connection
        .init_schema()
        .await
        .context("falha ao criar as tabelas")?;

    for dir in [
        &config.upload_folder,
        &config.output_folder,
        &config.vehicle_image_dir,
    ] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("não foi possível criar {}", dir.display()))?;
    }

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("endereço inválido: {}", config.server_url()))?;
    let cors = cors_layer(&config.cors_origins);

    let app_state = AppState::new(db_connection.pool().clone(), config);
    let app = routes::create_app_router(app_state)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    info!("🌐 Servidor iniciando em http://{}", addr);
    info!("🔍 Endpoints disponíveis:");
    info!("   GET  /health - Verificação de saúde");
    info!("🏭 Fornecedores:");
    info!("   GET|POST /api/fornecedores");
    info!("   GET|PUT|DELETE /api/fornecedores/:id");
    info!("🚜 Veículos (multipart):");
    info!("   GET|POST /api/veiculos");
    info!("   GET|PUT|DELETE /api/veiculos/:id");
    info!("   POST /api/veiculos/:id/impressao - QR code + PDF");
    info!("📁 Arquivos gerados: /output e /etiquetas");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Erro do servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor encerrado");
    Ok(())
}

/// Sinal de desligamento
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Não foi possível escutar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ Não foi possível escutar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C recebido, encerrando servidor...");
        },
        _ = terminate => {
            info!("🛑 Sinal de término recebido, encerrando servidor...");
        },
    }
}
