use anyhow::{Context, Result, anyhow};
use chrono::Local;
use polars::prelude::DataFrame;
use printpdf::image_crate;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ReportConfig;
use crate::report::summary::SummaryStats;

/// US letter, landscape
const PAGE_WIDTH: Mm = Mm(279.4);
const PAGE_HEIGHT: Mm = Mm(215.9);
const MARGIN_MM: f32 = 12.7;
const IMAGE_DPI: f32 = 300.0;

/// Write the report: a title page, the statistics page, then one page per chart in the given
/// order. Statistics are computed from `df` here, not carried over from earlier stages.
pub fn build_report(
    df: &DataFrame,
    chart_paths: &[PathBuf],
    out_path: impl AsRef<Path>,
    config: &ReportConfig,
) -> Result<()> {
    let out_path = out_path.as_ref();
    let stats = SummaryStats::from_frame(df)?;

    let (doc, page, layer) = PdfDocument::new(config.title.as_str(), PAGE_WIDTH, PAGE_HEIGHT, "Title");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("Failed to load report font: {}", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("Failed to load report font: {}", e))?;

    let title_layer = doc.get_page(page).get_layer(layer);
    write_title_page(&title_layer, &regular, &bold, config, &stats);

    let summary_layer = new_page(&doc, "Summary");
    write_summary_page(&summary_layer, &regular, &bold, &stats);

    for (index, chart) in chart_paths.iter().enumerate() {
        let layer = new_page(&doc, &format!("Chart {}", index + 1));
        place_chart(&layer, chart)?;
    }

    let file = File::create(out_path)
        .with_context(|| format!("Failed to create report {}", out_path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| anyhow!("Failed to write report {}: {}", out_path.display(), e))?;

    info!(
        "PDF report created: {} ({} pages)",
        out_path.display(),
        chart_paths.len() + 2
    );
    Ok(())
}

fn new_page(doc: &PdfDocumentReference, name: &str) -> PdfLayerReference {
    let (page, layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, name);
    doc.get_page(page).get_layer(layer)
}

fn write_title_page(
    layer: &PdfLayerReference,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    config: &ReportConfig,
    stats: &SummaryStats,
) {
    layer.use_text(&config.title, 28.0, centered_x(&config.title, 28.0), Mm(140.0), bold);
    layer.use_text(&config.subtitle, 24.0, centered_x(&config.subtitle, 24.0), Mm(125.0), bold);

    let rows = format!("Total Rows: {}", stats.rows);
    let columns = format!("Total Columns: {}", stats.columns);
    layer.use_text(&rows, 14.0, centered_x(&rows, 14.0), Mm(100.0), regular);
    layer.use_text(&columns, 14.0, centered_x(&columns, 14.0), Mm(92.0), regular);

    let generated = format!("Generated {}", Local::now().format("%Y-%m-%d %H:%M"));
    layer.use_text(&generated, 10.0, centered_x(&generated, 10.0), Mm(30.0), regular);
}

fn write_summary_page(
    layer: &PdfLayerReference,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    stats: &SummaryStats,
) {
    let left = Mm(PAGE_WIDTH.0 * 0.05);
    layer.use_text("Summary Statistics", 18.0, left, Mm(PAGE_HEIGHT.0 * 0.9), bold);

    let mut y = PAGE_HEIGHT.0 * 0.8;
    for line in stats.lines() {
        layer.use_text(line, 12.0, left, Mm(y), regular);
        y -= 8.0;
    }
}

/// Embed a chart image scaled to fit inside the page margins and centred.
fn place_chart(layer: &PdfLayerReference, path: &Path) -> Result<()> {
    let decoded = image_crate::open(path)
        .with_context(|| format!("Failed to read chart image {}", path.display()))?;
    let (width_px, height_px) = (decoded.width() as f32, decoded.height() as f32);
    let image = Image::from_dynamic_image(&decoded);

    let natural_width = width_px / IMAGE_DPI * 25.4;
    let natural_height = height_px / IMAGE_DPI * 25.4;
    let available_width = PAGE_WIDTH.0 - 2.0 * MARGIN_MM;
    let available_height = PAGE_HEIGHT.0 - 2.0 * MARGIN_MM;
    let scale = (available_width / natural_width).min(available_height / natural_height);

    let placed_width = natural_width * scale;
    let placed_height = natural_height * scale;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm((PAGE_WIDTH.0 - placed_width) / 2.0)),
            translate_y: Some(Mm((PAGE_HEIGHT.0 - placed_height) / 2.0)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
    Ok(())
}

/// Approximate left edge for centring Helvetica text; assumes an average glyph width of
/// half the font size.
fn centered_x(text: &str, font_size_pt: f32) -> Mm {
    let pt_to_mm = 25.4 / 72.0;
    let text_width = text.chars().count() as f32 * font_size_pt * 0.5 * pt_to_mm;
    Mm(((PAGE_WIDTH.0 - text_width) / 2.0).max(MARGIN_MM))
}
