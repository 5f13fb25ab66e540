use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::supplier_controller::SupplierController;
use crate::dto::supplier_dto::SupplierRequest;
use crate::dto::ApiResponse;
use crate::models::Supplier;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_supplier_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/:id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

async fn create_supplier(
    State(state): State<AppState>,
    Json(request): Json<SupplierRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let response = SupplierController::new(&state).create(request).await?;
    Ok(Json(response))
}

async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    Ok(Json(SupplierController::new(&state).list().await?))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Supplier>> {
    Ok(Json(SupplierController::new(&state).get_by_id(&id).await?))
}

async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SupplierRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let response = SupplierController::new(&state).update(&id, request).await?;
    Ok(Json(response))
}

async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    Ok(Json(SupplierController::new(&state).delete(&id).await?))
}
