//! Fontes TrueType e desenho de texto sobre `RgbImage`

use std::path::Path;

use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};

use crate::utils::errors::{AppError, AppResult};

/// Peso do texto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// Par de fontes usado nas etiquetas
pub struct Fonts {
    regular: Font<'static>,
    bold: Font<'static>,
}

impl Fonts {
    /// Carregar as duas fontes; qualquer falha é erro de configuração
    pub fn load(regular: &Path, bold: &Path) -> AppResult<Self> {
        Ok(Self {
            regular: load_font(regular, "FONT_REGULAR")?,
            bold: load_font(bold, "FONT_BOLD")?,
        })
    }

    pub fn get(&self, weight: Weight) -> &Font<'static> {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }
}

fn load_font(path: &Path, key: &str) -> AppResult<Font<'static>> {
    let data = std::fs::read(path).map_err(|e| {
        AppError::Configuration(format!(
            "{}: fonte {} não encontrada ({})",
            key,
            path.display(),
            e
        ))
    })?;
    Font::try_from_vec(data).ok_or_else(|| {
        AppError::Configuration(format!("{}: {} não é uma fonte TrueType válida", key, path.display()))
    })
}

/// Largura do texto em pixels
pub fn text_width(font: &Font<'static>, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Desenhar texto com o topo da linha em `y`, misturando a cobertura do glifo
pub fn draw_text(
    img: &mut RgbImage,
    font: &Font<'static>,
    px: f32,
    x: i32,
    y: i32,
    color: Rgb<u8>,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let origin = point(x as f32, y as f32 + v_metrics.ascent);

    for glyph in font.layout(text, scale, origin) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 || px as u32 >= img.width() || py as u32 >= img.height() {
                return;
            }
            if coverage <= 0.0 {
                return;
            }
            let dst = img.get_pixel_mut(px as u32, py as u32);
            let inv = 1.0 - coverage;
            for c in 0..3 {
                dst.0[c] = (color.0[c] as f32 * coverage + dst.0[c] as f32 * inv) as u8;
            }
        });
    }
}
