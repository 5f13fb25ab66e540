use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::debug;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    PhotoUpload, PrintRequest, PrintResponse, VehicleForm, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::models::Vehicle;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::normalize_plate;

/// Duas fotos de celular com folga
const MAX_FORM_BYTES: usize = 32 * 1024 * 1024;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route(
            "/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        .route("/:id/impressao", post(print_vehicle))
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES))
}

fn multipart_error(e: impl std::fmt::Display) -> crate::utils::errors::AppError {
    bad_request_error(&format!("Formulário inválido: {}", e))
}

/// Ler o formulário multipart; arquivos vazios contam como não enviados
async fn read_vehicle_form(mut multipart: Multipart) -> AppResult<VehicleForm> {
    let mut form = VehicleForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "foto1" || name == "foto2" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if file_name.is_empty() || bytes.is_empty() {
                continue;
            }
            let upload = Some(PhotoUpload { file_name, bytes });
            if name == "foto1" {
                form.photo1 = upload;
            } else {
                form.photo2 = upload;
            }
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "id_fornecedor" => form.supplier_id = value.trim().to_string(),
            "placa" => form.plate = normalize_plate(&value),
            "ativo" => form.asset_tag = value.trim().to_string(),
            "status" => form.status = value.trim().to_string(),
            other => debug!("Campo ignorado no formulário: {}", other),
        }
    }

    Ok(form)
}

async fn create_vehicle(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<VehicleResponse>>> {
    let form = read_vehicle_form(multipart).await?;
    Ok(Json(VehicleController::new(&state).create(form).await?))
}

async fn list_vehicles(State(state): State<AppState>) -> AppResult<Json<Vec<Vehicle>>> {
    Ok(Json(VehicleController::new(&state).list().await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vehicle>> {
    Ok(Json(VehicleController::new(&state).get_by_id(&id).await?))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<VehicleResponse>>> {
    let form = read_vehicle_form(multipart).await?;
    Ok(Json(VehicleController::new(&state).update(&id, form).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    Ok(Json(VehicleController::new(&state).delete(&id).await?))
}

async fn print_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PrintRequest>,
) -> AppResult<Json<ApiResponse<PrintResponse>>> {
    Ok(Json(VehicleController::new(&state).print(&id, request).await?))
}
