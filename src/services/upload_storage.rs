//! Armazenamento das fotos enviadas
//!
//! Os arquivos ficam em `UPLOAD_FOLDER` com o nome `<placa>_<ativo>_<slot>.<ext>`.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::utils::errors::{bad_request_error, AppError, AppResult};
use crate::utils::validation::{photo_extension, secure_filename};

#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Nome final da foto; rejeita extensões fora de jpg/jpeg/png
    pub fn photo_filename(
        plate: &str,
        asset_tag: &str,
        slot: u8,
        original_name: &str,
    ) -> AppResult<String> {
        let ext = photo_extension(original_name).ok_or_else(|| {
            bad_request_error("Apenas imagens JPG, JPEG ou PNG são permitidas.")
        })?;
        Ok(secure_filename(&format!(
            "{}_{}_{}.{}",
            plate, asset_tag, slot, ext
        )))
    }

    /// Caminho absoluto de uma foto gravada
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Gravar a foto e devolver o caminho relativo ao diretório de uploads
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Internal(format!(
                "Erro ao criar diretório de uploads {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let path = self.path_of(filename);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            AppError::Internal(format!("Erro ao salvar foto {}: {}", path.display(), e))
        })?;

        info!("📷 Foto salva em {}", path.display());
        Ok(filename.to_string())
    }

    /// Remover uma foto, sem falhar se ela não existir
    pub async fn remove(&self, filename: &str) -> bool {
        let path = self.path_of(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("🗑️ Foto {} removida", path.display());
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!("⚠️ Não foi possível remover {}: {}", path.display(), e);
                false
            }
        }
    }
}
