//! Chart rendering to PNG or SVG.

use crate::chart::Chart;
use crate::error::ReportError;
use crate::glyph::GlyphTextBackend;
use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage};
use log::{debug, info};
use num_format::{Locale, ToFormattedString};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_backend::DrawingBackend;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Figure size in inches; pixels are this times the DPI
pub const FIGURE_INCHES: (u32, u32) = (10, 6);

/// Line colors, assigned to series in order
const PALETTE: [RGBColor; 5] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
];

const MARKER_RADIUS: i32 = 4;

/// Output image encoding, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Svg,
}

impl ImageKind {
    pub fn from_path(path: &Path) -> std::result::Result<Self, ReportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" => Ok(ImageKind::Png),
            "svg" => Ok(ImageKind::Svg),
            _ => Err(ReportError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Pixel dimensions of the figure at `dpi`
pub fn figure_size(dpi: u32) -> (u32, u32) {
    (FIGURE_INCHES.0 * dpi, FIGURE_INCHES.1 * dpi)
}

/// Render the chart and replace `path` with the result.
///
/// The image is encoded fully in memory and moved into place with a rename,
/// so an existing file at `path` is untouched unless rendering succeeds.
pub fn save_chart(chart: &Chart, path: &Path, dpi: u32) -> Result<()> {
    let kind = ImageKind::from_path(path)?;
    let bytes = render(chart, kind, figure_size(dpi))?;
    write_replacing(path, &bytes)?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Encode the chart as an image file's bytes
pub fn render(chart: &Chart, kind: ImageKind, size: (u32, u32)) -> Result<Vec<u8>> {
    match kind {
        ImageKind::Png => render_png(chart, size),
        ImageKind::Svg => render_svg(chart, size),
    }
}

fn render_png(chart: &Chart, (width, height): (u32, u32)) -> Result<Vec<u8>> {
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let backend = BitMapBackend::with_buffer(&mut pixels, (width, height));
        let root = GlyphTextBackend::new(backend).into_drawing_area();
        draw_chart(&root, chart)?;
        root.present()?;
    }

    let image = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| ReportError::Render("pixel buffer does not match figure size".to_string()))?;
    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(encoded.into_inner())
}

fn render_svg(chart: &Chart, size: (u32, u32)) -> Result<Vec<u8>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_chart(&root, chart)?;
        root.present()?;
    }
    Ok(svg.into_bytes())
}

/// Draw every series with markers, then axes, grid and legend
fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, chart: &Chart) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (x_range, y_range) = chart.axis_ranges()?;
    debug!("x range {:?}, y range {:?}", x_range, y_range);

    let mut cc = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x_range, y_range)?;

    cc.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .axis_desc_style(("sans-serif", 20))
        .label_style(("sans-serif", 14))
        .x_label_formatter(&format_tick)
        .y_label_formatter(&format_tick)
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(TRANSPARENT)
        .draw()?;

    for (idx, series) in chart.series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        let line_style = color.stroke_width(2);
        let segments = series.segments();

        for segment in &segments {
            cc.draw_series(LineSeries::new(segment.iter().copied(), line_style))?;
        }

        // Markers carry the legend entry so that every series gets one,
        // even when none of its points are drawable.
        cc.draw_series(
            segments
                .iter()
                .flatten()
                .map(|&point| Circle::new(point, MARKER_RADIUS, color.filled())),
        )?
        .label(series.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    cc.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", 16))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Whole numbers get thousands separators; fractions keep two decimals
fn format_tick(value: &f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        (*value as i64).to_formatted_string(&Locale::en)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    let partial = partial_path(path);
    fs::write(&partial, bytes)
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    if let Err(e) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(e).with_context(|| format!("Failed to move image into place at {}", path.display()));
    }
    Ok(())
}

/// Hidden sibling of `path` used while the image is being written
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}
