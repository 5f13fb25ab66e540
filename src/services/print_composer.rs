//! Documento PDF de impressão da etiqueta
//!
//! Painel de 140×80 mm com safra, placa, ativo e sequencial à esquerda e o
//! QR code à direita. Coordenadas em milímetros com origem no canto inferior
//! esquerdo da página, como no PDF.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, Line, LineDashPattern, Mm, PdfDocument, Point,
};
use tracing::{error, info};

use crate::config::{AppConfig, PrintPage};
use crate::models::Vehicle;
use crate::utils::errors::{artifact_error, AppResult};

pub const PANEL_WIDTH_MM: f32 = 140.0;
pub const PANEL_HEIGHT_MM: f32 = 80.0;
const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
/// Deslocamento do painel a partir da esquerda e do topo da A4
const PAGE_MARGIN_MM: f32 = 10.0;

const TEXT_MARGIN_MM: f32 = 8.0;
const FIRST_BASELINE_MM: f32 = 14.0;
const TITLE_SIZE_PT: f32 = 18.0;
const SEQUENCE_SIZE_PT: f32 = 32.0;
/// Avanço negativo: as linhas ficam mais próximas que a altura da fonte
pub const LINE_SPACING: f32 = -4.0;

const QR_MARGIN_MM: f32 = 5.0;
const OUTLINE_INSET_MM: f32 = 2.0;
const OUTLINE_THICKNESS_PT: f32 = 0.5;
const DASH_PT: i64 = 3;
const GAP_PT: i64 = 2;

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * 25.4 / 72.0
}

/// Nome do arquivo do PDF
pub fn pdf_filename(vehicle_id: &str) -> String {
    format!("id_colheita_{}.pdf", vehicle_id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub size_pt: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Posições de tudo que vai na página
#[derive(Debug, Clone, PartialEq)]
pub struct PrintPlan {
    pub page_width: f32,
    pub page_height: f32,
    pub panel: Rect,
    pub lines: Vec<TextLine>,
    pub qr: Rect,
    pub outline: Rect,
}

/// Textos do painel, de cima para baixo
pub fn panel_texts(vehicle: &Vehicle, safra: &str) -> [(String, f32); 4] {
    [
        (format!("SAFRA {}", safra), TITLE_SIZE_PT),
        (vehicle.plate.to_uppercase(), TITLE_SIZE_PT),
        (format!("ATIVO {}", vehicle.asset_tag), TITLE_SIZE_PT),
        (vehicle.padded_sequential(), SEQUENCE_SIZE_PT),
    ]
}

/// Planejar a página; mesmas entradas, mesmo plano
pub fn plan_print(page: PrintPage, texts: &[(String, f32)]) -> PrintPlan {
    let (page_width, page_height, panel_x, panel_y) = match page {
        PrintPage::Label => (PANEL_WIDTH_MM, PANEL_HEIGHT_MM, 0.0, 0.0),
        PrintPage::A4 => (
            A4_WIDTH_MM,
            A4_HEIGHT_MM,
            PAGE_MARGIN_MM,
            A4_HEIGHT_MM - PAGE_MARGIN_MM - PANEL_HEIGHT_MM,
        ),
    };
    let panel = Rect {
        x: panel_x,
        y: panel_y,
        width: PANEL_WIDTH_MM,
        height: PANEL_HEIGHT_MM,
    };

    let mut lines = Vec::with_capacity(texts.len());
    let mut y = panel.y + panel.height - FIRST_BASELINE_MM;
    for (index, (text, size_pt)) in texts.iter().enumerate() {
        if index > 0 {
            y -= pt_to_mm(size_pt + LINE_SPACING);
        }
        lines.push(TextLine {
            text: text.clone(),
            size_pt: *size_pt,
            x: panel.x + TEXT_MARGIN_MM,
            y,
        });
    }

    let side = panel.height - 2.0 * QR_MARGIN_MM;
    let qr = Rect {
        x: panel.x + panel.width - QR_MARGIN_MM - side,
        y: panel.y + QR_MARGIN_MM,
        width: side,
        height: side,
    };

    let outline = Rect {
        x: panel.x + OUTLINE_INSET_MM,
        y: panel.y + OUTLINE_INSET_MM,
        width: panel.width - 2.0 * OUTLINE_INSET_MM,
        height: panel.height - 2.0 * OUTLINE_INSET_MM,
    };

    PrintPlan {
        page_width,
        page_height,
        panel,
        lines,
        qr,
        outline,
    }
}

/// Destino e formato de página dos PDFs
#[derive(Debug, Clone)]
pub struct PrintSettings {
    pub output_dir: PathBuf,
    pub page: PrintPage,
}

impl PrintSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            output_dir: config.pdf_dir(),
            page: config.print_page,
        }
    }
}

fn rect_points(rect: &Rect) -> Vec<(Point, bool)> {
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.x + rect.width, rect.y + rect.height);
    vec![
        (Point::new(Mm(x0), Mm(y0)), false),
        (Point::new(Mm(x1), Mm(y0)), false),
        (Point::new(Mm(x1), Mm(y1)), false),
        (Point::new(Mm(x0), Mm(y1)), false),
    ]
}

/// Montar `id_colheita_<id>.pdf` com o QR já gerado
#[tracing::instrument(skip_all, fields(vehicle = %vehicle.id))]
pub fn compose_print_document(
    settings: &PrintSettings,
    vehicle: &Vehicle,
    qr_path: &Path,
    safra: &str,
) -> AppResult<PathBuf> {
    let plan = plan_print(settings.page, &panel_texts(vehicle, safra));

    let qr = image::open(qr_path).map_err(|e| {
        error!("❌ QR {} ilegível: {}", qr_path.display(), e);
        artifact_error("QR code para o PDF", e)
    })?;
    let qr = DynamicImage::ImageRgb8(qr.to_rgb8());

    let (doc, page, layer) = PdfDocument::new(
        format!("ID Colheita {}", vehicle.id),
        Mm(plan.page_width),
        Mm(plan.page_height),
        "Etiqueta",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| artifact_error("fonte do PDF", e))?;

    for line in &plan.lines {
        layer.use_text(line.text.clone(), line.size_pt, Mm(line.x), Mm(line.y), &font);
    }

    // A resolução faz o QR ocupar exatamente o quadrado planejado
    let dpi = qr.width() as f32 * 25.4 / plan.qr.width;
    Image::from_dynamic_image(&qr).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(plan.qr.x)),
            translate_y: Some(Mm(plan.qr.y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    layer.set_outline_color(Color::Rgb(printpdf::Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(OUTLINE_THICKNESS_PT);
    layer.set_line_dash_pattern(LineDashPattern {
        dash_1: Some(DASH_PT),
        gap_1: Some(GAP_PT),
        ..Default::default()
    });
    layer.add_line(Line {
        points: rect_points(&plan.outline),
        is_closed: true,
    });

    std::fs::create_dir_all(&settings.output_dir).map_err(|e| {
        error!("❌ Erro ao criar {}: {}", settings.output_dir.display(), e);
        artifact_error("diretório de PDFs", e)
    })?;
    let path = settings.output_dir.join(pdf_filename(&vehicle.id));
    let file = File::create(&path).map_err(|e| artifact_error("PDF", e))?;
    doc.save(&mut BufWriter::new(file)).map_err(|e| {
        error!("❌ Erro ao salvar PDF {}: {}", path.display(), e);
        artifact_error("PDF", e)
    })?;

    info!("🖨️ PDF gerado para veículo {} em {}", vehicle.id, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleStatus;
    use crate::services::qr_encoder::encode_qr;
    use tempfile::TempDir;

    const EPS: f32 = 1e-4;

    fn vehicle() -> Vehicle {
        Vehicle {
            id: "202410191200000".into(),
            supplier_id: "202410191100000".into(),
            plate: "abc1d23".into(),
            asset_tag: "4512".into(),
            status: VehicleStatus::Ok,
            sequential: 42,
            photo1: None,
            photo2: None,
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_panel_texts() {
        let texts = panel_texts(&vehicle(), "2024/2025");
        assert_eq!(texts[0].0, "SAFRA 2024/2025");
        assert_eq!(texts[1].0, "ABC1D23");
        assert_eq!(texts[2].0, "ATIVO 4512");
        assert_eq!(texts[3].0, "042");
        assert!(texts[3].1 > texts[0].1);
    }

    #[test]
    fn test_label_page_layout() {
        let plan = plan_print(PrintPage::Label, &panel_texts(&vehicle(), "2024/2025"));
        assert!(close(plan.page_width, PANEL_WIDTH_MM));
        assert!(close(plan.page_height, PANEL_HEIGHT_MM));

        assert!(close(plan.lines[0].y, 80.0 - 14.0));
        assert!(plan.lines.iter().all(|l| close(l.x, 8.0)));

        // QR quadrado de 70 mm encostado na margem direita
        assert!(close(plan.qr.width, 70.0));
        assert!(close(plan.qr.height, 70.0));
        assert!(close(plan.qr.x + plan.qr.width, 135.0));
        assert!(close(plan.qr.y, 5.0));

        assert!(close(plan.outline.x, 2.0));
        assert!(close(plan.outline.width, 136.0));
        assert!(close(plan.outline.height, 76.0));
    }

    #[test]
    fn test_line_spacing_formula() {
        let plan = plan_print(PrintPage::Label, &panel_texts(&vehicle(), "2024/2025"));
        for pair in plan.lines.windows(2) {
            let expected = pt_to_mm(pair[1].size_pt + LINE_SPACING);
            assert!(close(pair[0].y - pair[1].y, expected));
        }
        // Sequencial ainda acima da base do painel
        assert!(plan.lines[3].y > pt_to_mm(SEQUENCE_SIZE_PT));
    }

    #[test]
    fn test_a4_offsets_panel() {
        let texts = panel_texts(&vehicle(), "2024/2025");
        let label = plan_print(PrintPage::Label, &texts);
        let a4 = plan_print(PrintPage::A4, &texts);

        assert!(close(a4.page_width, 210.0));
        assert!(close(a4.page_height, 297.0));
        assert!(close(a4.panel.x, 10.0));
        assert!(close(a4.panel.y + a4.panel.height, 297.0 - 10.0));

        let dx = a4.panel.x - label.panel.x;
        let dy = a4.panel.y - label.panel.y;
        for (l, a) in label.lines.iter().zip(&a4.lines) {
            assert!(close(a.x - l.x, dx));
            assert!(close(a.y - l.y, dy));
        }
        assert!(close(a4.qr.x - label.qr.x, dx));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let texts = panel_texts(&vehicle(), "2024/2025");
        assert_eq!(plan_print(PrintPage::A4, &texts), plan_print(PrintPage::A4, &texts));
    }

    #[test]
    fn test_compose_writes_pdf() {
        let tmp = TempDir::new().unwrap();
        let qr = encode_qr(&tmp.path().join("qr_codes"), "202410191200000", "https://x.io/v/1")
            .unwrap();
        let settings = PrintSettings {
            output_dir: tmp.path().join("pdfs"),
            page: PrintPage::A4,
        };

        let path = compose_print_document(&settings, &vehicle(), &qr, "2024/2025").unwrap();
        assert_eq!(path, tmp.path().join("pdfs/id_colheita_202410191200000.pdf"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_compose_fails_without_qr() {
        let tmp = TempDir::new().unwrap();
        let settings = PrintSettings {
            output_dir: tmp.path().join("pdfs"),
            page: PrintPage::Label,
        };
        let err = compose_print_document(
            &settings,
            &vehicle(),
            &tmp.path().join("qr_nada.png"),
            "2024/2025",
        )
        .unwrap_err();
        assert!(matches!(err, crate::utils::errors::AppError::ArtifactGeneration(_)));
        assert!(!settings.output_dir.exists());
    }
}
