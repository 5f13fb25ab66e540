//! Configuração de variáveis de ambiente
//!
//! Este módulo lê a configuração da aplicação. Valores obrigatórios ausentes
//! são um erro fatal de inicialização, nunca um default silencioso.

use std::env;
use std::path::PathBuf;

use crate::utils::errors::{configuration_error, AppError, AppResult};

/// Tamanho de página do documento de impressão
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintPage {
    /// Página do tamanho exato do painel (etiqueta 140×80 mm)
    Label,
    /// A4 retrato, painel deslocado pela margem
    A4,
}

impl PrintPage {
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "etiqueta" | "label" => Ok(PrintPage::Label),
            "a4" => Ok(PrintPage::A4),
            other => Err(AppError::Configuration(format!(
                "PRINT_PAGE inválido: '{}' (use 'etiqueta' ou 'a4')",
                other
            ))),
        }
    }
}

/// Configuração da aplicação
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upload_folder: PathBuf,
    pub output_folder: PathBuf,
    pub vehicle_image_dir: PathBuf,
    pub safra: String,
    pub font_regular: PathBuf,
    pub font_bold: PathBuf,
    pub print_page: PrintPage,
    pub log_dir: PathBuf,
    /// Origens liberadas no CORS; vazio libera todas
    pub cors_origins: Vec<String>,
}

const DEFAULT_FONT_REGULAR: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
const DEFAULT_FONT_BOLD: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

fn required(key: &str) -> AppResult<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| configuration_error(key))
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Lista separada por vírgulas
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    /// Carregar a configuração a partir das variáveis de ambiente
    pub fn from_env() -> AppResult<Self> {
        let port = optional("PORT", "3000")
            .parse()
            .map_err(|_| AppError::Configuration("PORT deve ser um número válido".to_string()))?;

        Ok(Self {
            host: optional("HOST", "0.0.0.0"),
            port,
            upload_folder: PathBuf::from(required("UPLOAD_FOLDER")?),
            output_folder: PathBuf::from(required("OUTPUT_FOLDER")?),
            vehicle_image_dir: PathBuf::from(optional("VEICULO_IMAGE_DIR", "output/veiculos")),
            safra: required("SAFRA")?,
            font_regular: PathBuf::from(optional("FONT_REGULAR", DEFAULT_FONT_REGULAR)),
            font_bold: PathBuf::from(optional("FONT_BOLD", DEFAULT_FONT_BOLD)),
            print_page: PrintPage::parse(&optional("PRINT_PAGE", "etiqueta"))?,
            log_dir: PathBuf::from(optional("LOG_DIR", "logs")),
            cors_origins: parse_origins(&optional("CORS_ORIGINS", "")),
        })
    }

    /// Obter o endereço do servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Diretório dos QR codes gerados
    pub fn qr_dir(&self) -> PathBuf {
        self.output_folder.join("qr_codes")
    }

    /// Diretório dos PDFs de impressão
    pub fn pdf_dir(&self) -> PathBuf {
        self.output_folder.join("pdfs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_page_parse() {
        assert_eq!(PrintPage::parse("etiqueta").unwrap(), PrintPage::Label);
        assert_eq!(PrintPage::parse(" A4 ").unwrap(), PrintPage::A4);
        assert!(matches!(
            PrintPage::parse("carta"),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_parse_origins() {
        assert!(parse_origins("").is_empty());
        assert_eq!(
            parse_origins("http://a.local, ,http://b.local "),
            vec!["http://a.local".to_string(), "http://b.local".to_string()]
        );
    }

    #[test]
    fn test_artifact_dirs() {
        let config = AppConfig {
            host: "127.0.0.1".into(),
            port: 3000,
            upload_folder: "uploads".into(),
            output_folder: "saida".into(),
            vehicle_image_dir: "saida/veiculos".into(),
            safra: "2024/2025".into(),
            font_regular: DEFAULT_FONT_REGULAR.into(),
            font_bold: DEFAULT_FONT_BOLD.into(),
            print_page: PrintPage::Label,
            log_dir: "logs".into(),
            cors_origins: Vec::new(),
        };
        assert_eq!(config.qr_dir(), PathBuf::from("saida/qr_codes"));
        assert_eq!(config.pdf_dir(), PathBuf::from("saida/pdfs"));
        assert_eq!(config.server_url(), "127.0.0.1:3000");
    }
}
