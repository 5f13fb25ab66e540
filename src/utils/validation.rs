//! Utilitários de validação
//!
//! Regras de formato para placas, ativos e nomes de arquivo enviados.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Placa brasileira: antiga (ABC1234) ou Mercosul (ABC1D23)
    pub static ref PLATE_REGEX: Regex =
        Regex::new(r"^[A-Z]{3}\d{4}$|^[A-Z]{3}\d[A-Z]\d{2}$").unwrap();

    /// Ativo: de 1 a 6 dígitos
    pub static ref ASSET_TAG_REGEX: Regex = Regex::new(r"^\d{1,6}$").unwrap();
}

/// Extensões aceitas para fotos
pub const ALLOWED_PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Normaliza a placa para maiúsculas sem espaços
pub fn normalize_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Validar placa já normalizada
pub fn validate_plate(value: &str) -> Result<(), ValidationError> {
    if !PLATE_REGEX.is_match(value) {
        let mut error = ValidationError::new("placa");
        error.message =
            Some("Placa deve seguir o formato brasileiro (ex.: ABC1234 ou ABC1D23).".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar ativo
pub fn validate_asset_tag(value: &str) -> Result<(), ValidationError> {
    if !ASSET_TAG_REGEX.is_match(value) {
        let mut error = ValidationError::new("ativo");
        error.message = Some("Ativo deve ser um número com até 6 dígitos.".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que um string não está vazio
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Extensão em minúsculas de um nome de arquivo enviado, se for uma extensão aceita
pub fn photo_extension(file_name: &str) -> Option<String> {
    let ext = std::path::Path::new(file_name)
        .extension()?
        .to_str()?
        .to_lowercase();
    ALLOWED_PHOTO_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// Reduz um nome de arquivo a caracteres seguros (ASCII alfanumérico, `.`, `_`, `-`)
pub fn secure_filename(name: &str) -> String {
    let cleaned: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}
