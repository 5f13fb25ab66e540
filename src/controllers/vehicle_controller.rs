use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};
use validator::Validate;

use crate::config::AppConfig;
use crate::dto::vehicle_dto::{PrintRequest, PrintResponse, VehicleForm, VehicleResponse};
use crate::dto::ApiResponse;
use crate::models::{Namespace, Supplier, Vehicle, VehicleStatus};
use crate::repositories::{SupplierStore, VehicleStore};
use crate::services::label_composer::{compose_label, label_filename, LabelSettings};
use crate::services::print_composer::{compose_print_document, pdf_filename, PrintSettings};
use crate::services::qr_encoder::{encode_qr, qr_filename};
use crate::services::sequence::next_sequence;
use crate::services::{IdAllocator, NamespaceLocks, UploadStorage};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};

const PHOTO_SLOTS: [u8; 2] = [1, 2];

pub struct VehicleController {
    config: Arc<AppConfig>,
    suppliers: Arc<dyn SupplierStore>,
    vehicles: Arc<dyn VehicleStore>,
    ids: IdAllocator,
    locks: NamespaceLocks,
    uploads: UploadStorage,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            suppliers: state.suppliers.clone(),
            vehicles: state.vehicles.clone(),
            ids: state.ids.clone(),
            locks: state.locks.clone(),
            uploads: state.uploads.clone(),
        }
    }

    pub async fn create(&self, form: VehicleForm) -> AppResult<ApiResponse<VehicleResponse>> {
        form.validate()?;
        let status: VehicleStatus = form.status.parse()?;
        let supplier = self.find_supplier(&form.supplier_id).await?;
        let names = photo_names(&form)?;

        let vehicle = {
            let _guard = self.locks.lock(Namespace::Veiculos).await;
            let id = self.ids.allocate(Namespace::Veiculos).await?;
            let sequential = next_sequence(self.vehicles.as_ref()).await?;

            let saved = self.save_photos(&form, &names).await?;
            let vehicle = Vehicle {
                id,
                supplier_id: supplier.id.clone(),
                plate: form.plate.clone(),
                asset_tag: form.asset_tag.clone(),
                status,
                sequential,
                photo1: names[0].clone(),
                photo2: names[1].clone(),
            };

            match self.vehicles.insert(&vehicle).await {
                Ok(vehicle) => vehicle,
                Err(e) => {
                    error!("❌ Erro ao inserir veículo {}: {}", vehicle.id, e);
                    self.remove_photos(&saved).await;
                    return Err(e);
                }
            }
        };

        info!(
            "✅ Veículo {} cadastrado (placa {}, Nº {})",
            vehicle.id,
            vehicle.plate,
            vehicle.padded_sequential()
        );
        let label = self.generate_label(&vehicle, &supplier).await;
        Ok(with_label(vehicle, label, "Veículo cadastrado com sucesso!"))
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.vehicles.list_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Vehicle> {
        self.vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Veículo", id))
    }

    /// Fotos só são trocadas quando um arquivo novo é enviado; o sequencial não muda
    pub async fn update(
        &self,
        id: &str,
        form: VehicleForm,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        form.validate()?;
        let status: VehicleStatus = form.status.parse()?;
        let existing = self.get_by_id(id).await?;
        let supplier = self.find_supplier(&form.supplier_id).await?;
        let names = photo_names(&form)?;

        let saved = self.save_photos(&form, &names).await?;
        let [old1, old2] = existing.photos();
        let photo1 = names[0].clone().or_else(|| old1.map(str::to_string));
        let photo2 = names[1].clone().or_else(|| old2.map(str::to_string));

        let vehicle = Vehicle {
            id: existing.id.clone(),
            supplier_id: supplier.id.clone(),
            plate: form.plate.clone(),
            asset_tag: form.asset_tag.clone(),
            status,
            sequential: existing.sequential,
            photo1,
            photo2,
        };

        let vehicle = match self.vehicles.update(&vehicle).await {
            Ok(vehicle) => vehicle,
            Err(e) => {
                error!("❌ Erro ao atualizar veículo {}: {}", id, e);
                let orphans: Vec<String> = saved
                    .into_iter()
                    .filter(|name| !existing.photos().contains(&Some(name.as_str())))
                    .collect();
                self.remove_photos(&orphans).await;
                return Err(e);
            }
        };

        // Fotos antigas substituídas por um arquivo de outro nome
        let replaced: Vec<String> = existing
            .photos()
            .iter()
            .flatten()
            .filter(|old| !vehicle.photos().contains(&Some(**old)))
            .map(|old| old.to_string())
            .collect();
        self.remove_photos(&replaced).await;

        info!("✏️ Veículo {} atualizado", vehicle.id);
        let label = self.generate_label(&vehicle, &supplier).await;
        Ok(with_label(vehicle, label, "Veículo atualizado com sucesso!"))
    }

    /// Remove o registro e depois, sem falhar, fotos e artefatos
    pub async fn delete(&self, id: &str) -> AppResult<ApiResponse<()>> {
        let vehicle = self.get_by_id(id).await?;
        self.vehicles.delete(id).await?;

        let photos: Vec<String> = vehicle
            .photos()
            .iter()
            .flatten()
            .map(|name| name.to_string())
            .collect();
        self.remove_photos(&photos).await;

        for artifact in [
            self.config.vehicle_image_dir.join(label_filename(id)),
            self.config.qr_dir().join(qr_filename(id)),
            self.config.pdf_dir().join(pdf_filename(id)),
        ] {
            remove_artifact(&artifact).await;
        }

        info!("🗑️ Veículo {} excluído", id);
        Ok(ApiResponse::message("Veículo excluído com sucesso!".to_string()))
    }

    /// QR code do link e PDF de impressão; aqui os artefatos são o resultado principal
    pub async fn print(
        &self,
        id: &str,
        request: PrintRequest,
    ) -> AppResult<ApiResponse<PrintResponse>> {
        request.validate()?;
        let vehicle = self.get_by_id(id).await?;
        let config = self.config.clone();

        let (qr, pdf) = tokio::task::spawn_blocking(move || -> AppResult<(PathBuf, PathBuf)> {
            let qr = encode_qr(&config.qr_dir(), &vehicle.id, &request.link)?;
            let settings = PrintSettings::from_config(&config);
            let pdf = compose_print_document(&settings, &vehicle, &qr, &config.safra)?;
            Ok((qr, pdf))
        })
        .await
        .map_err(|e| AppError::Internal(format!("tarefa de impressão interrompida: {}", e)))??;

        Ok(ApiResponse::success_with_message(
            PrintResponse {
                qr_code: qr.display().to_string(),
                pdf: pdf.display().to_string(),
            },
            "Documento de impressão gerado com sucesso!".to_string(),
        ))
    }

    async fn find_supplier(&self, id: &str) -> AppResult<Supplier> {
        self.suppliers
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Fornecedor", id))
    }

    /// Grava as fotos enviadas; se uma falhar, apaga as já gravadas
    async fn save_photos(
        &self,
        form: &VehicleForm,
        names: &[Option<String>; 2],
    ) -> AppResult<Vec<String>> {
        let mut saved = Vec::new();
        for (slot, name) in PHOTO_SLOTS.iter().zip(names) {
            let (Some(upload), Some(name)) = (form.photo(*slot), name) else {
                continue;
            };
            match self.uploads.save(name, &upload.bytes).await {
                Ok(name) => saved.push(name),
                Err(e) => {
                    self.remove_photos(&saved).await;
                    return Err(e);
                }
            }
        }
        Ok(saved)
    }

    async fn remove_photos(&self, names: &[String]) {
        for name in names {
            self.uploads.remove(name).await;
        }
    }

    async fn generate_label(&self, vehicle: &Vehicle, supplier: &Supplier) -> AppResult<PathBuf> {
        let config = self.config.clone();
        let vehicle = vehicle.clone();
        let supplier = supplier.clone();

        tokio::task::spawn_blocking(move || {
            let settings = LabelSettings::resolve(&config)?;
            compose_label(&settings, &vehicle, &supplier)
        })
        .await
        .map_err(|e| AppError::Internal(format!("tarefa de etiqueta interrompida: {}", e)))?
    }
}

/// Nomes finais das fotos enviadas, por slot
fn photo_names(form: &VehicleForm) -> AppResult<[Option<String>; 2]> {
    let mut names: [Option<String>; 2] = [None, None];
    for (index, slot) in PHOTO_SLOTS.iter().enumerate() {
        if let Some(upload) = form.photo(*slot) {
            names[index] = Some(UploadStorage::photo_filename(
                &form.plate,
                &form.asset_tag,
                *slot,
                &upload.file_name,
            )?);
        }
    }
    Ok(names)
}

/// Registro salvo; a etiqueta é secundária e sua falha vira aviso
fn with_label(
    vehicle: Vehicle,
    label: AppResult<PathBuf>,
    message: &str,
) -> ApiResponse<VehicleResponse> {
    match label {
        Ok(path) => ApiResponse::success_with_message(
            VehicleResponse {
                vehicle,
                etiqueta: Some(path.display().to_string()),
            },
            message.to_string(),
        ),
        Err(e) => {
            warn!("⚠️ Etiqueta do veículo {} não gerada: {}", vehicle.id, e);
            ApiResponse::warning(
                VehicleResponse {
                    vehicle,
                    etiqueta: None,
                },
                format!("{} Porém a etiqueta não foi gerada: {}", message, e.user_message()),
            )
        }
    }
}

async fn remove_artifact(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!("🗑️ Artefato {} removido", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("⚠️ Não foi possível remover {}: {}", path.display(), e),
    }
}
