//! Chart rasterization.
//!
//! Charts are plain RGB rasters with no text: titles, axis captions and
//! legends are returned as caption lines and laid out as PDF text, keyed to
//! the palette's color names.

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
    draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use tracing::debug;

use cvs_core::{BreakSeries, ChartKind, ChartSet, DeviceUsage, SymptomFrequency};

pub const CHART_WIDTH: u32 = 640;
pub const CHART_HEIGHT: u32 = 400;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const SKY_BLUE: Rgb<u8> = Rgb([135, 206, 235]);
const GREEN: Rgb<u8> = Rgb([44, 160, 44]);

/// Plot area margins: left, right, top, bottom.
const MARGINS: (u32, u32, u32, u32) = (60, 30, 30, 50);

/// Named slice colors, cycled when there are more slices.
const PALETTE: [(&str, Rgb<u8>); 10] = [
    ("blue", Rgb([31, 119, 180])),
    ("orange", Rgb([255, 127, 14])),
    ("green", Rgb([44, 160, 44])),
    ("red", Rgb([214, 39, 40])),
    ("purple", Rgb([148, 103, 189])),
    ("brown", Rgb([140, 86, 75])),
    ("pink", Rgb([227, 119, 194])),
    ("gray", Rgb([127, 127, 127])),
    ("olive", Rgb([188, 189, 34])),
    ("cyan", Rgb([23, 190, 207])),
];

/// A rendered chart and the text that goes with it.
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub kind: ChartKind,
    pub image: RgbImage,
    pub caption: Vec<String>,
}

impl ChartImage {
    pub fn file_name(&self) -> String {
        format!("{}_chart.png", self.kind.key())
    }
}

/// Renders every chart in the set, in report order.
pub fn render_charts(charts: &ChartSet) -> Vec<ChartImage> {
    let mut images = vec![render_symptoms(&charts.symptoms)];
    if let Some(devices) = &charts.devices {
        images.push(render_devices(devices));
    }
    if let Some(breaks) = &charts.breaks {
        images.push(render_breaks(breaks));
    }
    debug!(count = images.len(), "charts rendered");
    images
}

/// Writes a chart as PNG into `dir`, creating it if needed.
pub fn save_png(chart: &ChartImage, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create charts directory: {}", dir.display()))?;
    let path = dir.join(chart.file_name());
    chart
        .image
        .save(&path)
        .with_context(|| format!("Failed to write chart image: {}", path.display()))?;
    Ok(path)
}

/// Pixel geometry of the plot area.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl PlotArea {
    fn new() -> Self {
        let (left, right, top, bottom) = MARGINS;
        Self {
            left: left as f32,
            right: (CHART_WIDTH - right) as f32,
            top: top as f32,
            bottom: (CHART_HEIGHT - bottom) as f32,
        }
    }

    fn width(&self) -> f32 {
        self.right - self.left
    }

    fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Vertical pixel for `value` on a `0..=max` scale.
    fn y_for(&self, value: f32, max: f32) -> f32 {
        self.bottom - value / max * self.height()
    }

    /// Horizontal pixel for `value` on a `0..=max` scale.
    fn x_for(&self, value: f32, max: f32) -> f32 {
        self.left + value / max * self.width()
    }
}

fn canvas() -> RgbImage {
    RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, BACKGROUND)
}

/// Horizontal grid lines at every step of `0..=max`, plus both axes.
fn draw_axes(img: &mut RgbImage, area: PlotArea, y_max: u32) {
    let steps = grid_steps(y_max);
    for step in 0..=steps {
        let y = area.y_for(grid_value(y_max, step, steps), y_max as f32);
        draw_line_segment_mut(img, (area.left, y), (area.right, y), GRID);
    }
    draw_line_segment_mut(img, (area.left, area.top), (area.left, area.bottom), AXIS);
    draw_line_segment_mut(img, (area.left, area.bottom), (area.right, area.bottom), AXIS);
}

fn grid_steps(max: u32) -> u32 {
    max.clamp(1, 10)
}

/// Value of grid line `step` out of `steps` on a `0..=max` scale.
fn grid_value(max: u32, step: u32, steps: u32) -> f32 {
    (u64::from(max) * u64::from(step) / u64::from(steps.max(1))) as f32
}

/// Vertical bars, one per symptom, scaled to the largest count.
pub fn render_symptoms(frequencies: &[SymptomFrequency]) -> ChartImage {
    let mut img = canvas();
    let area = PlotArea::new();
    let y_max = frequencies.iter().map(|f| f.count).max().unwrap_or(0).max(1) as u32;
    draw_axes(&mut img, area, y_max);

    let slots = frequencies.len().max(1) as f32;
    let slot_width = area.width() / slots;
    let bar_width = (slot_width * 0.6).max(1.0);
    for (idx, freq) in frequencies.iter().enumerate() {
        let top = area.y_for(freq.count as f32, y_max as f32);
        let height = (area.bottom - top).round() as u32;
        if height == 0 {
            continue;
        }
        let x = area.left + slot_width * idx as f32 + (slot_width - bar_width) / 2.0;
        let rect = Rect::at(x.round() as i32, top.round() as i32).of_size(bar_width as u32, height);
        draw_filled_rect_mut(&mut img, rect, SKY_BLUE);
        draw_hollow_rect_mut(&mut img, rect, AXIS);
    }

    let mut caption = vec![
        "Symptoms Frequency".to_string(),
        format!("Bars left to right, count of \"Yes\" answers (scale 0 to {y_max}):"),
    ];
    caption.extend(
        frequencies
            .iter()
            .map(|f| format!("{}: {}", f.field.label(), f.count)),
    );
    ChartImage {
        kind: ChartKind::Symptoms,
        image: img,
        caption,
    }
}

/// Pie of device answers, starting at twelve o'clock and running
/// counter-clockwise.
pub fn render_devices(usage: &[DeviceUsage]) -> ChartImage {
    let mut img = canvas();
    let total: usize = usage.iter().map(|u| u.count).sum();
    let center = (CHART_WIDTH as f64 / 2.0, CHART_HEIGHT as f64 / 2.0);
    let radius = f64::from(CHART_HEIGHT.min(CHART_WIDTH)) / 2.0 - 30.0;

    let mut caption = vec!["Device Usage".to_string()];
    let mut start = PI / 2.0;
    for (idx, device) in usage.iter().enumerate() {
        let (color_name, color) = PALETTE[idx % PALETTE.len()];
        let share = if total == 0 {
            0.0
        } else {
            device.count as f64 / total as f64
        };
        let sweep = share * 2.0 * PI;
        draw_slice(&mut img, center, radius, start, sweep, color);
        start += sweep;
        caption.push(format!(
            "{color_name}: {} - {} ({:.1}%)",
            device.label,
            device.count,
            share * 100.0
        ));
    }

    ChartImage {
        kind: ChartKind::Devices,
        image: img,
        caption,
    }
}

fn draw_slice(
    img: &mut RgbImage,
    center: (f64, f64),
    radius: f64,
    start: f64,
    sweep: f64,
    color: Rgb<u8>,
) {
    if sweep <= 0.0 {
        return;
    }
    if sweep >= 2.0 * PI - 1e-9 {
        draw_filled_circle_mut(
            img,
            (center.0.round() as i32, center.1.round() as i32),
            radius.round() as i32,
            color,
        );
        return;
    }
    // one vertex per degree of arc
    let segments = ((sweep.to_degrees()).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(segments + 2);
    points.push(Point::new(center.0.round() as i32, center.1.round() as i32));
    for step in 0..=segments {
        let angle = start + sweep * step as f64 / segments as f64;
        // image y grows downwards
        let x = center.0 + radius * angle.cos();
        let y = center.1 - radius * angle.sin();
        let point = Point::new(x.round() as i32, y.round() as i32);
        if points.last() != Some(&point) {
            points.push(point);
        }
    }
    if points.len() >= 3 && points.first() != points.last() {
        draw_polygon_mut(img, &points, color);
    }
}

/// Scatter of breaks per hour against "yes" symptom count.
pub fn render_breaks(series: &BreakSeries) -> ChartImage {
    let mut img = canvas();
    let area = PlotArea::new();
    let x_max = series
        .points
        .iter()
        .map(|p| p.breaks)
        .max()
        .unwrap_or(0)
        .max(1);
    let y_max = cvs_model::SYMPTOM_FIELDS.len() as u32;
    draw_axes(&mut img, area, y_max);

    let x_steps = grid_steps(x_max);
    for step in 1..=x_steps {
        let x = area.x_for(grid_value(x_max, step, x_steps), x_max as f32);
        draw_line_segment_mut(&mut img, (x, area.top), (x, area.bottom), GRID);
    }

    for point in &series.points {
        let x = area.x_for(point.breaks as f32, x_max as f32);
        let y = area.y_for(point.symptoms as f32, y_max as f32);
        draw_filled_circle_mut(&mut img, (x.round() as i32, y.round() as i32), 5, GREEN);
    }

    let mut caption = vec![
        "Break Frequency vs Symptoms".to_string(),
        format!("X axis: Break Frequency (per hour), 0 to {x_max}"),
        format!("Y axis: Number of Symptoms, 0 to {y_max}"),
        format!("Respondents plotted: {}", series.points.len()),
    ];
    if !series.skipped_rows.is_empty() {
        caption.push(format!(
            "Left out (unreadable break frequency): {}",
            series.skipped_rows.len()
        ));
    }
    ChartImage {
        kind: ChartKind::Breaks,
        image: img,
        caption,
    }
}
