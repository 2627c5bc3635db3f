//! Terminal tables and JSON documents for decode results.

use epdimage::analysis::{BufferSummary, Hypothesis};
use epdimage::layout::{LengthMismatch, ScanOrder};
use epdimage::palette::{Palette, Rgb};
use epdimage::stats::{self, ContentSummary, DiffRow, Histogram, HistogramEntry};
use serde::Serialize;

/// Statistics of one image.
#[derive(Debug, Serialize)]
pub struct ImageReport {
    pub label: String,
    pub width: usize,
    pub height: usize,
    pub histogram: Vec<HistogramEntry>,
    pub content: ContentSummary,
}

impl ImageReport {
    pub fn new(label: &str, width: usize, height: usize, hist: &Histogram, palette: &Palette) -> Self {
        Self {
            label: label.to_string(),
            width,
            height,
            histogram: hist.ranked(palette),
            content: stats::content(hist, Rgb::WHITE),
        }
    }
}

/// One hypothesis of a comparison run.
#[derive(Debug, Serialize)]
pub struct HypothesisReport {
    pub profile: String,
    pub order: ScanOrder,
    pub buffer: BufferSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<LengthMismatch>,
    pub image: ImageReport,
}

impl HypothesisReport {
    pub fn new(profile: &str, hypothesis: &Hypothesis, palette: &Palette) -> Self {
        let grid = hypothesis.grid();
        Self {
            profile: profile.to_string(),
            order: hypothesis.order(),
            buffer: hypothesis.summary,
            mismatch: hypothesis.reconstruction.mismatch,
            image: ImageReport::new(profile, grid.width, grid.height, &hypothesis.histogram, palette),
        }
    }
}

/// Full result of comparing two readings of one array.
#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub array: String,
    pub first: HypothesisReport,
    pub second: HypothesisReport,
    pub diff: Vec<DiffRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differing_pixels: Option<usize>,
    pub outputs: Vec<String>,
}

fn color_name(palette: &Palette, rgb: Rgb) -> &'static str {
    palette.name(rgb).unwrap_or("unknown")
}

pub fn print_buffer_summary(summary: &BufferSummary) {
    println!("  total bytes:      {}", summary.total_bytes);
    println!("  expected bytes:   {}", summary.expected_bytes);
    println!("  image size:       {} x {}", summary.width, summary.height);
    println!("  bytes per row:    {}", summary.bytes_per_row);
    println!("  bytes per column: {}", summary.bytes_per_column);
}

pub fn print_image(report: &ImageReport) {
    println!("{} ({} x {})", report.label, report.width, report.height);
    println!("  {:<8} {:>16} {:>10} {:>7}", "Color", "RGB", "Pixels", "Share");
    for e in &report.histogram {
        println!(
            "  {:<8} {:>16} {:>10} {:>6.1}%",
            e.name.unwrap_or("unknown"),
            e.rgb.to_string(),
            e.count,
            e.percentage
        );
    }
    let c = &report.content;
    println!(
        "  content: {} of {} pixels non-white ({:.2}%)",
        c.content,
        c.total,
        c.ratio * 100.0
    );
}

pub fn print_diff(rows: &[DiffRow], palette: &Palette, label_a: &str, label_b: &str) {
    println!(
        "  {:<8} {:>16} {:>12} {:>12} {:>10}",
        "Color",
        "RGB",
        truncate(label_a, 12),
        truncate(label_b, 12),
        "Diff"
    );
    println!("  {}", "-".repeat(62));
    for r in rows {
        println!(
            "  {:<8} {:>16} {:>12} {:>12} {:>10}",
            color_name(palette, r.rgb),
            r.rgb.to_string(),
            r.count_a,
            r.count_b,
            r.abs_diff
        );
    }
}

pub fn print_compare(report: &CompareReport, palette: &Palette) {
    for h in [&report.first, &report.second] {
        println!("== {} ({}) ==", h.profile, h.order);
        print_buffer_summary(&h.buffer);
        if let Some(m) = &h.mismatch {
            println!("  warning: {m}");
        }
        print_image(&h.image);
        println!();
    }
    println!("== color distribution ==");
    print_diff(&report.diff, palette, &report.first.profile, &report.second.profile);
    match report.differing_pixels {
        Some(n) => println!("\n{n} pixel positions differ between the two readings"),
        None => println!("\ngeometries differ; compare the side-by-side images visually"),
    }
}

/// Render any report as pretty JSON.
pub fn to_json<T: Serialize>(report: &T) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{head}…")
    }
}
