use anyhow::{Context, Result};
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::charts::aggregate::{self, Bucket};
use crate::config::ChartConfig;

pub const PRICE_HIST: &str = "price_hist.png";
pub const RATING_HIST: &str = "rating_hist.png";
pub const BRAND_PIE: &str = "brand_pie.png";
pub const RAM_PIE: &str = "ram_pie.png";
pub const AVG_PRICE_BRAND: &str = "avg_price_brand.png";
pub const PRICE_VS_RATING: &str = "price_vs_rating.png";

/// Chart files in the order the report shows them.
pub type ChartPaths = Vec<PathBuf>;

const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Slice colours, cycled when there are more slices than entries.
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Render the six charts into `out_dir`, creating it if needed. Any drawing or write failure
/// aborts, so every returned path exists.
pub fn render_charts(df: &DataFrame, out_dir: impl AsRef<Path>, config: &ChartConfig) -> Result<ChartPaths> {
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create figures directory {}", out_dir.display()))?;

    let mut paths = ChartPaths::new();

    let path = out_dir.join(PRICE_HIST);
    let buckets = aggregate::histogram(&aggregate::prices(df)?, config.price_bins);
    draw_histogram(&path, (700, 500), "Price Distribution of Mobiles (INR)", "Price (INR)", &buckets)?;
    paths.push(path);

    let path = out_dir.join(RATING_HIST);
    let buckets = aggregate::histogram(&aggregate::ratings(df)?, config.rating_bins);
    draw_histogram(&path, (700, 500), "Rating Distribution", "Rating", &buckets)?;
    paths.push(path);

    let path = out_dir.join(BRAND_PIE);
    draw_pie(&path, "Top Brand Share", &aggregate::brand_share(df, config.top_categories)?)?;
    paths.push(path);

    let path = out_dir.join(RAM_PIE);
    draw_pie(&path, "RAM Distribution", &aggregate::ram_share(df, config.top_categories)?)?;
    paths.push(path);

    let path = out_dir.join(AVG_PRICE_BRAND);
    let title = format!("Average Price by Brand (Top {})", config.top_brands_by_price);
    draw_bars(&path, &title, &aggregate::average_price_by_brand(df, config.top_brands_by_price)?)?;
    paths.push(path);

    let path = out_dir.join(PRICE_VS_RATING);
    draw_scatter(&path, "Price vs Rating", &aggregate::price_rating_points(df)?)?;
    paths.push(path);

    for path in &paths {
        info!("Saved chart {}", path.display());
    }
    Ok(paths)
}

fn draw_histogram(
    path: &Path,
    size: (u32, u32),
    title: &str,
    x_desc: &str,
    buckets: &[Bucket],
) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = match (buckets.first(), buckets.last()) {
        (Some(first), Some(last)) => (first.lower, last.upper),
        _ => (0.0, 1.0),
    };
    let y_max = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.05;

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_caption(title, buckets.is_empty()), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Count")
        .draw()?;

    chart.draw_series(buckets.iter().map(|b| {
        Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], BAR_COLOR.filled())
    }))?;
    chart.draw_series(buckets.iter().map(|b| {
        Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], WHITE.stroke_width(1))
    }))?;

    root.present()
        .with_context(|| format!("Failed to write chart {}", path.display()))?;
    Ok(())
}

fn draw_pie(path: &Path, title: &str, shares: &[(String, usize)]) -> Result<()> {
    let root = BitMapBackend::new(path, (700, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(&chart_caption(title, shares.is_empty()), ("sans-serif", 24))?;

    if !shares.is_empty() {
        let (width, height) = area.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = width.min(height) as f64 * 0.35;
        let sizes: Vec<f64> = shares.iter().map(|(_, count)| *count as f64).collect();
        let colors: Vec<RGBColor> = (0..shares.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();
        let labels: Vec<&str> = shares.iter().map(|(label, _)| label.as_str()).collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(90.0);
        pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
        pie.percentages(("sans-serif", 14).into_font().color(&WHITE));
        area.draw(&pie)?;
    }

    root.present()
        .with_context(|| format!("Failed to write chart {}", path.display()))?;
    Ok(())
}

fn draw_bars(path: &Path, title: &str, averages: &[(String, f64)]) -> Result<()> {
    let root = BitMapBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let slots = averages.len().max(1);
    let y_max = averages.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_caption(title, averages.is_empty()), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(70)
        .y_label_area_size(70)
        .build_cartesian_2d((0..slots).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots)
        .x_label_formatter(&|value: &SegmentValue<usize>| match value {
            SegmentValue::CenterOf(i) => averages
                .get(*i)
                .map(|(brand, _)| brand.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_label_style(
            ("sans-serif", 13)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc("Brand")
        .y_desc("Average Price (INR)")
        .draw()?;

    chart.draw_series(averages.iter().enumerate().map(|(i, (_, avg))| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *avg)],
            BAR_COLOR.filled(),
        );
        bar.set_margin(0, 0, 6, 6);
        bar
    }))?;

    root.present()
        .with_context(|| format!("Failed to write chart {}", path.display()))?;
    Ok(())
}

fn draw_scatter(path: &Path, title: &str, points: &[(f64, f64)]) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = padded_range(points.iter().map(|(x, _)| *x));
    let y_range = padded_range(points.iter().map(|(_, y)| *y));

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_caption(title, points.is_empty()), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Price (INR)")
        .y_desc("Rating")
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BAR_COLOR.mix(0.7).filled())),
    )?;

    root.present()
        .with_context(|| format!("Failed to write chart {}", path.display()))?;
    Ok(())
}

fn chart_caption(title: &str, empty: bool) -> String {
    if empty {
        format!("{} (No data)", title)
    } else {
        title.to_string()
    }
}

/// Axis range covering all values with 5% headroom on each side.
fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max > min { (max - min) * 0.05 } else { 0.5 };
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);
        assert_eq!(padded_range([4.0].into_iter()), 3.5..4.5);

        let range = padded_range([0.0, 100.0].into_iter());
        assert_eq!(range, -5.0..105.0);
    }

    #[test]
    fn test_no_data_caption() {
        assert_eq!(chart_caption("RAM Distribution", true), "RAM Distribution (No data)");
        assert_eq!(chart_caption("RAM Distribution", false), "RAM Distribution");
    }
}
