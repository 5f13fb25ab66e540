//! QR code do link do veículo
//!
//! Nível de correção L, menor versão que comporta o conteúdo, módulos de
//! 10 px e margem silenciosa de 4 módulos. Preto sobre branco.

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};
use tracing::{error, info};

use crate::utils::errors::{artifact_error, AppResult};

pub const MODULE_SIZE: u32 = 10;
pub const QUIET_ZONE: u32 = 4;

/// Nome do arquivo do QR
pub fn qr_filename(vehicle_id: &str) -> String {
    format!("qr_{}.png", vehicle_id)
}

/// Rasterizar o QR do conteúdo em escala de cinza
pub fn render_qr(payload: &str) -> AppResult<GrayImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
        .map_err(|e| artifact_error("QR code", e))?;
    let modules = code.width() as u32;
    let side = (modules + 2 * QUIET_ZONE) * MODULE_SIZE;

    let mut img = GrayImage::from_pixel(side, side, Luma([255u8]));
    for (i, color) in code.to_colors().iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = i as u32 % modules + QUIET_ZONE;
        let my = i as u32 / modules + QUIET_ZONE;
        for dy in 0..MODULE_SIZE {
            for dx in 0..MODULE_SIZE {
                img.put_pixel(mx * MODULE_SIZE + dx, my * MODULE_SIZE + dy, Luma([0u8]));
            }
        }
    }
    Ok(img)
}

/// Gerar `qr_<id>.png` em `output_dir`, sobrescrevendo o anterior
#[tracing::instrument(skip(output_dir, payload))]
pub fn encode_qr(output_dir: &Path, vehicle_id: &str, payload: &str) -> AppResult<PathBuf> {
    let img = render_qr(payload)?;

    std::fs::create_dir_all(output_dir).map_err(|e| {
        error!("❌ Erro ao criar {}: {}", output_dir.display(), e);
        artifact_error("diretório de QR codes", e)
    })?;
    let path = output_dir.join(qr_filename(vehicle_id));
    img.save_with_format(&path, image::ImageFormat::Png)
        .map_err(|e| {
            error!("❌ Erro ao salvar QR {}: {}", path.display(), e);
            artifact_error("QR code", e)
        })?;

    info!("🔳 QR code gerado para veículo {} em {}", vehicle_id, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LINK: &str = "https://colheita.example.com/veiculos/202410191200000";

    #[test]
    fn test_saved_qr_matches_module_matrix() {
        let tmp = TempDir::new().unwrap();
        let path = encode_qr(tmp.path(), "202410191200000", LINK).unwrap();
        assert_eq!(path, tmp.path().join("qr_202410191200000.png"));

        let code = QrCode::with_error_correction_level(LINK.as_bytes(), EcLevel::L).unwrap();
        let modules = code.width() as u32;
        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!(img.width(), (modules + 2 * QUIET_ZONE) * MODULE_SIZE);
        assert_eq!(img.width(), img.height());

        // Amostra no centro de cada módulo
        let half = MODULE_SIZE / 2;
        for (i, color) in code.to_colors().iter().enumerate() {
            let x = (i as u32 % modules + QUIET_ZONE) * MODULE_SIZE + half;
            let y = (i as u32 / modules + QUIET_ZONE) * MODULE_SIZE + half;
            let expected = if *color == Color::Dark { 0 } else { 255 };
            assert_eq!(img.get_pixel(x, y).0[0], expected, "module {}", i);
        }

        // Margem silenciosa branca
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(QUIET_ZONE * MODULE_SIZE - 1, 5).0[0], 255);
    }

    fn decode_png(path: &Path) -> String {
        let img = image::open(path).unwrap().to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            img.width() as usize,
            img.height() as usize,
            |x, y| img.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1, "{}", path.display());
        let (_, content) = grids[0].decode().unwrap();
        content
    }

    #[test]
    fn test_same_payload_decodes_back_twice() {
        let tmp = TempDir::new().unwrap();
        let first = encode_qr(&tmp.path().join("a"), "202410191200000", LINK).unwrap();
        let second = encode_qr(&tmp.path().join("b"), "202410191200000", LINK).unwrap();

        assert_eq!(decode_png(&first), LINK);
        assert_eq!(decode_png(&second), LINK);
        assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
    }

    #[test]
    fn test_smallest_version_for_short_payload() {
        // Versão 1 tem 21 módulos
        let img = render_qr("https://x.io").unwrap();
        assert_eq!(img.width(), (21 + 2 * QUIET_ZONE) * MODULE_SIZE);
    }

    #[test]
    fn test_encode_overwrites_previous_file() {
        let tmp = TempDir::new().unwrap();
        let first = encode_qr(tmp.path(), "1", "https://x.io").unwrap();
        let small = image::open(&first).unwrap().to_luma8().width();
        let second = encode_qr(tmp.path(), "1", LINK).unwrap();
        assert_eq!(first, second);
        assert!(image::open(&second).unwrap().to_luma8().width() > small);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
