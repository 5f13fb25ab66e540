//! Estado em memória para os testes de controllers e rotas

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use crate::config::{AppConfig, PrintPage};
use crate::repositories::memory::MemoryStore;
use crate::services::id_generator::FixedClock;
use crate::state::AppState;

pub const SYSTEM_REGULAR: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
pub const SYSTEM_BOLD: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

pub fn system_fonts_available() -> bool {
    Path::new(SYSTEM_REGULAR).exists() && Path::new(SYSTEM_BOLD).exists()
}

/// Instante fixo dos testes: 19/10/2024 12:00
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 10, 19)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Configuração em `dir`; as fontes não existem, então a etiqueta falha
pub fn test_config(dir: &Path) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        upload_folder: dir.join("uploads"),
        output_folder: dir.join("output"),
        vehicle_image_dir: dir.join("output/veiculos"),
        safra: "2024/2025".into(),
        font_regular: dir.join("fonts/ausente.ttf"),
        font_bold: dir.join("fonts/ausente-bold.ttf"),
        print_page: PrintPage::Label,
        log_dir: dir.join("logs"),
        cors_origins: Vec::new(),
    }
}

pub fn memory_state_with(config: AppConfig) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_stores(
        config,
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(FixedClock(now())),
    );
    (state, store)
}

pub fn memory_state() -> (AppState, TempDir) {
    let tmp = TempDir::new().unwrap();
    let (state, _) = memory_state_with(test_config(tmp.path()));
    (state, tmp)
}
