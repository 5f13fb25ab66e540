//! Rotas HTTP
//!
//! `/api/fornecedores` recebe JSON; `/api/veiculos` recebe multipart por
//! causa das fotos. Os arquivos gerados ficam disponíveis só para leitura.

pub mod supplier_routes;
pub mod vehicle_routes;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Router completo da aplicação, sem as camadas de CORS e trace
pub fn create_app_router(state: AppState) -> Router {
    let output_dir = ServeDir::new(&state.config.output_folder);
    let label_dir = ServeDir::new(&state.config.vehicle_image_dir);

    Router::new()
        .route("/health", get(health))
        .nest("/api/fornecedores", supplier_routes::create_supplier_router())
        .nest("/api/veiculos", vehicle_routes::create_vehicle_router())
        .nest_service("/output", output_dir)
        .nest_service("/etiquetas", label_dir)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "id_colheita",
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}
