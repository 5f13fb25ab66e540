//! Etiqueta PNG do veículo (9:16, 1080×1920)
//!
//! A composição tem quatro etapas: resolver a configuração de renderização,
//! carregar as fotos, planejar o layout (puro, sem fontes) e rasterizar.
//! Fotos ausentes ou ilegíveis viram uma linha de aviso em vez de abortar.
//!
//! Ordem vertical:
//!
//! | Bloco | Altura |
//! |---|---|
//! | Cabeçalho `SAFRA <safra>` | 100 px |
//! | Faixa de status | 80 px |
//! | Placa, ativo, fornecedor, `Nº NNN` | 80 px cada |
//! | Foto 1 e foto 2 (ou aviso) | até 720 px + 50 px de espaço |

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use tracing::{error, info, warn};

use super::fonts::{draw_text, text_width, Fonts, Weight};
use crate::config::AppConfig;
use crate::models::{Supplier, Vehicle};
use crate::utils::errors::{artifact_error, configuration_error, AppError, AppResult};

pub const CANVAS_WIDTH: u32 = 1080;
pub const CANVAS_HEIGHT: u32 = 1920;
const BORDER: u32 = 3;
const HEADER_HEIGHT: u32 = 100;
const STATUS_HEIGHT: u32 = 80;
const TEXT_TOP_PADDING: u32 = 20;
const X_MARGIN: u32 = 40;
const LINE_ADVANCE: u32 = 80;
const FONT_SIZE: f32 = 60.0;
const MIN_FONT_SIZE: f32 = 20.0;
const FONT_STEP: f32 = 5.0;
const BAND_FONT_SIZE: f32 = 56.0;
const PHOTO_WIDTH: u32 = 1080;
const PHOTO_HEIGHT: u32 = 720;
const PHOTO_GAP: u32 = 50;
/// Acima desta razão largura/altura a foto é limitada pela largura
const WIDE_RATIO: f64 = 1.5;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const HEADER_GREEN: Rgb<u8> = Rgb([27, 94, 32]);
const OK_GREEN: Rgb<u8> = Rgb([46, 125, 50]);
const ALERT_RED: Rgb<u8> = Rgb([198, 40, 40]);

/// Configuração resolvida antes de qualquer desenho
pub struct LabelSettings {
    pub output_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub safra: String,
    pub fonts: Fonts,
}

impl LabelSettings {
    pub fn resolve(config: &AppConfig) -> AppResult<Self> {
        if config.vehicle_image_dir.as_os_str().is_empty() {
            return Err(configuration_error("VEICULO_IMAGE_DIR"));
        }
        if config.upload_folder.as_os_str().is_empty() {
            return Err(configuration_error("UPLOAD_FOLDER"));
        }
        if config.safra.trim().is_empty() {
            return Err(configuration_error("SAFRA"));
        }

        Ok(Self {
            output_dir: config.vehicle_image_dir.clone(),
            upload_dir: config.upload_folder.clone(),
            safra: config.safra.clone(),
            fonts: Fonts::load(&config.font_regular, &config.font_bold)?,
        })
    }
}

/// Estado de cada slot de foto depois do carregamento
pub enum PhotoSlot {
    Empty,
    NotFound(PathBuf),
    Unreadable(String),
    Ready(DynamicImage),
}

impl PhotoSlot {
    pub fn load(upload_dir: &Path, reference: Option<&str>) -> Self {
        let Some(name) = reference.filter(|r| !r.trim().is_empty()) else {
            return PhotoSlot::Empty;
        };
        let path = upload_dir.join(name);
        if !path.exists() {
            return PhotoSlot::NotFound(path);
        }
        match image::open(&path) {
            Ok(img) if img.width() > 0 && img.height() > 0 => PhotoSlot::Ready(img),
            Ok(_) => PhotoSlot::Unreadable(format!("{} está vazia", path.display())),
            Err(e) => PhotoSlot::Unreadable(e.to_string()),
        }
    }

    fn describe(&self) -> Option<String> {
        match self {
            PhotoSlot::Ready(_) | PhotoSlot::Empty => None,
            PhotoSlot::NotFound(path) => Some(format!("{} não encontrada", path.display())),
            PhotoSlot::Unreadable(reason) => Some(reason.clone()),
        }
    }
}

/// Trecho de texto com peso
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub weight: Weight,
}

impl Span {
    fn regular(text: impl Into<String>) -> Self {
        Self { text: text.into(), weight: Weight::Regular }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self { text: text.into(), weight: Weight::Bold }
    }
}

/// Bloco posicionado na etiqueta
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Faixa de largura total com texto centralizado
    Band { y: u32, height: u32, fill: Rgb<u8>, text: String },
    /// Linha alinhada à margem esquerda; `shrink` reduz a fonte até caber
    Line { y: u32, spans: Vec<Span>, color: Rgb<u8>, size: f32, shrink: bool },
    /// Foto do slot `slot` (0 ou 1) redimensionada
    Photo { slot: usize, x: u32, y: u32, width: u32, height: u32 },
}

/// Resultado do planejamento: blocos e posição final do cursor vertical
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub blocks: Vec<Block>,
    pub cursor_y: u32,
}

impl LabelLayout {
    /// Base do último bloco desenhado, sem o espaço que sobra depois dele
    pub fn content_bottom(&self) -> u32 {
        self.blocks
            .iter()
            .map(|b| match b {
                Block::Band { y, height, .. } | Block::Photo { y, height, .. } => y + height,
                Block::Line { y, .. } => y + LINE_ADVANCE,
            })
            .max()
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub fn photo_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Photo { .. }))
            .count()
    }

    #[cfg(test)]
    pub fn band_text(&self, index: usize) -> Option<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Band { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .nth(index)
    }
}

/// Tamanho da foto preservando a proporção dentro do alvo
pub fn fit_photo(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;
    let ratio = src_w as f64 / src_h as f64;

    let (w, h) = if ratio > WIDE_RATIO {
        (tgt_w, (tgt_w as f64 / ratio) as u32)
    } else {
        ((tgt_h as f64 * ratio) as u32, tgt_h)
    };
    (w.max(1), h.max(1))
}

/// Alvo das fotos a partir da posição onde elas começam
fn photo_target(start_y: u32) -> (u32, u32) {
    if start_y + PHOTO_HEIGHT * 2 + PHOTO_GAP <= CANVAS_HEIGHT {
        return (PHOTO_WIDTH, PHOTO_HEIGHT);
    }
    let height = CANVAS_HEIGHT.saturating_sub(start_y + PHOTO_GAP) / 2;
    let width = (height as f64 / PHOTO_HEIGHT as f64 * PHOTO_WIDTH as f64) as u32;
    (width, height)
}

/// Planejar a etiqueta sem desenhar nada
pub fn plan_label(
    vehicle: &Vehicle,
    supplier_name: &str,
    safra: &str,
    photos: &[PhotoSlot; 2],
) -> LabelLayout {
    let mut blocks = Vec::new();
    let mut y = 0;

    blocks.push(Block::Band {
        y,
        height: HEADER_HEIGHT,
        fill: HEADER_GREEN,
        text: format!("SAFRA {}", safra),
    });
    y += HEADER_HEIGHT;

    blocks.push(Block::Band {
        y,
        height: STATUS_HEIGHT,
        fill: if vehicle.status.is_ok() { OK_GREEN } else { ALERT_RED },
        text: vehicle.status.banner_text(),
    });
    y += STATUS_HEIGHT + TEXT_TOP_PADDING;

    // Só o nome do fornecedor tem tamanho livre
    let info_lines = [
        (vec![Span::regular("Placa: "), Span::bold(vehicle.plate.to_uppercase())], false),
        (vec![Span::regular("Ativo: "), Span::bold(vehicle.asset_tag.clone())], false),
        (vec![Span::bold(supplier_name.to_uppercase())], true),
        (vec![Span::bold(format!("Nº {}", vehicle.padded_sequential()))], false),
    ];
    for (spans, shrink) in info_lines {
        blocks.push(Block::Line { y, spans, color: BLACK, size: FONT_SIZE, shrink });
        y += LINE_ADVANCE;
    }

    let target = photo_target(y);
    for (slot, photo) in photos.iter().enumerate() {
        let number = slot + 1;
        let (text, color) = match photo {
            PhotoSlot::Ready(img) => {
                let (width, height) = fit_photo(img.dimensions(), target);
                blocks.push(Block::Photo { slot, x: 0, y, width, height });
                y += height + PHOTO_GAP;
                continue;
            }
            PhotoSlot::Empty => (format!("Sem Foto {}", number), BLACK),
            PhotoSlot::NotFound(_) => (format!("Foto {} Não Encontrada", number), BLACK),
            PhotoSlot::Unreadable(_) => (format!("Erro na Foto {}", number), ALERT_RED),
        };
        blocks.push(Block::Line {
            y,
            spans: vec![Span::bold(text)],
            color,
            size: FONT_SIZE,
            shrink: false,
        });
        y += LINE_ADVANCE;
    }

    LabelLayout { blocks, cursor_y: y }
}

/// Maior tamanho de fonte, em passos de 5 px a partir de 60 px, cuja largura
/// medida cabe em `max_width`. Devolve `None` quando nem o mínimo de 20 px cabe.
pub fn fit_font_size(max_width: f32, measure: impl Fn(f32) -> f32) -> Option<f32> {
    let mut size = FONT_SIZE;
    while size >= MIN_FONT_SIZE {
        if measure(size) <= max_width {
            return Some(size);
        }
        size -= FONT_STEP;
    }
    None
}

fn spans_width(spans: &[Span], fonts: &Fonts, size: f32) -> f32 {
    spans
        .iter()
        .map(|span| text_width(fonts.get(span.weight), size, &span.text))
        .sum()
}

/// Reduzir as linhas marcadas até caberem entre as margens
pub fn fit_lines(layout: &mut LabelLayout, fonts: &Fonts) {
    let max_width = (CANVAS_WIDTH - 2 * X_MARGIN) as f32;
    for block in layout.blocks.iter_mut() {
        let Block::Line { spans, size, shrink: true, .. } = block else {
            continue;
        };
        let spans: &[Span] = spans;
        *size = match fit_font_size(max_width, |px| spans_width(spans, fonts, px)) {
            Some(px) => px,
            None => {
                let text: String = spans.iter().map(|s| s.text.as_str()).collect();
                warn!("⚠️ '{}' não cabe nem com {}px; texto cortado", text, MIN_FONT_SIZE);
                MIN_FONT_SIZE
            }
        };
    }
}

/// Nome do arquivo da etiqueta
pub fn label_filename(vehicle_id: &str) -> String {
    format!("veiculo_{}.png", vehicle_id)
}

fn check_display_fields(vehicle: &Vehicle, supplier: &Supplier) -> AppResult<()> {
    let fields = [
        ("placa", vehicle.plate.as_str()),
        ("ativo", vehicle.asset_tag.as_str()),
        ("nome do fornecedor", supplier.name.as_str()),
    ];
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(AppError::Configuration(format!(
            "campo obrigatório '{}' vazio para o veículo {}",
            name, vehicle.id
        ))),
        None => Ok(()),
    }
}

fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = (x + width).min(canvas.width());
    let y_end = (y + height).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}

fn draw_border(canvas: &mut RgbImage, thickness: u32, color: Rgb<u8>) {
    let (w, h) = canvas.dimensions();
    fill_rect(canvas, 0, 0, w, thickness, color);
    fill_rect(canvas, 0, h.saturating_sub(thickness), w, thickness, color);
    fill_rect(canvas, 0, 0, thickness, h, color);
    fill_rect(canvas, w.saturating_sub(thickness), 0, thickness, h, color);
}

/// Rasterizar um layout já planejado
pub fn render_label(layout: &LabelLayout, photos: &[PhotoSlot; 2], fonts: &Fonts) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, WHITE);

    for block in &layout.blocks {
        match block {
            Block::Band { y, height, fill, text } => {
                fill_rect(&mut canvas, 0, *y, CANVAS_WIDTH, *height, *fill);
                let font = fonts.get(Weight::Bold);
                let width = text_width(font, BAND_FONT_SIZE, text);
                let x = ((CANVAS_WIDTH as f32 - width) / 2.0).max(0.0) as i32;
                let text_y = *y as i32 + (*height as i32 - BAND_FONT_SIZE as i32) / 2;
                draw_text(&mut canvas, font, BAND_FONT_SIZE, x, text_y, WHITE, text);
            }
            Block::Line { y, spans, color, size, .. } => {
                let mut x = X_MARGIN as f32;
                for span in spans {
                    let font = fonts.get(span.weight);
                    draw_text(&mut canvas, font, *size, x as i32, *y as i32, *color, &span.text);
                    x += text_width(font, *size, &span.text);
                }
            }
            Block::Photo { slot, x, y, width, height } => {
                if let Some(PhotoSlot::Ready(img)) = photos.get(*slot) {
                    let resized =
                        imageops::resize(&img.to_rgb8(), *width, *height, FilterType::Lanczos3);
                    imageops::replace(&mut canvas, &resized, *x as i64, *y as i64);
                }
            }
        }
    }

    // A borda vai por cima das faixas e das fotos
    draw_border(&mut canvas, BORDER, BLACK);
    canvas
}

/// Gerar a etiqueta PNG do veículo e devolver o caminho gravado
#[tracing::instrument(skip_all, fields(vehicle = %vehicle.id))]
pub fn compose_label(
    settings: &LabelSettings,
    vehicle: &Vehicle,
    supplier: &Supplier,
) -> AppResult<PathBuf> {
    check_display_fields(vehicle, supplier)?;

    let [photo1, photo2] = vehicle.photos();
    let photos = [
        PhotoSlot::load(&settings.upload_dir, photo1),
        PhotoSlot::load(&settings.upload_dir, photo2),
    ];
    for (index, photo) in photos.iter().enumerate() {
        if let Some(reason) = photo.describe() {
            warn!("⚠️ Foto {} do veículo {}: {}", index + 1, vehicle.id, reason);
        }
    }

    let mut layout = plan_label(vehicle, &supplier.name, &settings.safra, &photos);
    fit_lines(&mut layout, &settings.fonts);
    if layout.content_bottom() > CANVAS_HEIGHT {
        warn!(
            "⚠️ Espaço insuficiente para as fotos em {}; conteúdo cortado em {}px",
            vehicle.id, CANVAS_HEIGHT
        );
    }
    let canvas = render_label(&layout, &photos, &settings.fonts);

    std::fs::create_dir_all(&settings.output_dir).map_err(|e| {
        error!("❌ Erro ao criar {}: {}", settings.output_dir.display(), e);
        artifact_error("diretório de saída", e)
    })?;
    let path = settings.output_dir.join(label_filename(&vehicle.id));
    canvas
        .save_with_format(&path, image::ImageFormat::Png)
        .map_err(|e| {
            error!("❌ Erro ao salvar etiqueta {}: {}", path.display(), e);
            artifact_error("etiqueta PNG", e)
        })?;

    info!("🖼️ Imagem gerada para veículo {} em {}", vehicle.id, path.display());
    Ok(path)
}
