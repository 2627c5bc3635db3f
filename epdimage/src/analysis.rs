//! Dual-hypothesis analysis: decode one buffer once, place it under two
//! scan-order hypotheses and compare the results.

use crate::codec::{decode, PIXELS_PER_BYTE};
use crate::config::{DecodeConfig, DisplayProfile};
use crate::error::LayoutError;
use crate::grid::Grid;
use crate::layout::{reconstruct_with, Reconstruction, ScanOrder};
use crate::palette::ColorIndex;
use crate::stats::{diff, histogram, DiffRow, Histogram};

/// How a byte buffer relates to a target geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BufferSummary {
    pub width: usize,
    pub height: usize,
    pub total_bytes: usize,
    /// `width * height / 4`.
    pub expected_bytes: usize,
    /// Bytes covering one row, `width / 4`.
    pub bytes_per_row: usize,
    /// Bytes covering one column, `height / 4`.
    pub bytes_per_column: usize,
}

impl BufferSummary {
    pub fn new(total_bytes: usize, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            total_bytes,
            expected_bytes: width * height / PIXELS_PER_BYTE,
            bytes_per_row: width / PIXELS_PER_BYTE,
            bytes_per_column: height / PIXELS_PER_BYTE,
        }
    }

    pub fn matches(&self) -> bool {
        self.total_bytes == self.expected_bytes
    }
}

/// One scan-order hypothesis applied to a buffer.
#[derive(Debug, Clone)]
pub struct Hypothesis {
    pub summary: BufferSummary,
    pub reconstruction: Reconstruction,
    pub histogram: Histogram,
}

impl Hypothesis {
    pub fn order(&self) -> ScanOrder {
        self.reconstruction.order
    }

    pub fn grid(&self) -> &Grid {
        &self.reconstruction.grid
    }
}

/// Two hypotheses over the same buffer.
#[derive(Debug, Clone)]
pub struct HypothesisComparison {
    pub first: Hypothesis,
    pub second: Hypothesis,
    /// Histogram diff with `first` as `a` and `second` as `b`.
    pub diff: Vec<DiffRow>,
    /// Positions where the two grids hold different colors, `None` when the
    /// hypotheses use different geometries.
    pub differing_pixels: Option<usize>,
}

/// Number of positions where two equally sized grids differ, `None` if their
/// sizes differ.
pub fn differing_pixels(a: &Grid, b: &Grid) -> Option<usize> {
    if (a.width, a.height) != (b.width, b.height) {
        return None;
    }
    Some(a.pixels.iter().zip(&b.pixels).filter(|(x, y)| x != y).count())
}

fn place(
    indices: &[ColorIndex],
    total_bytes: usize,
    config: &DecodeConfig,
    order: ScanOrder,
) -> Result<Hypothesis, LayoutError> {
    let reconstruction = reconstruct_with(config, indices, order)?;
    Ok(Hypothesis {
        summary: BufferSummary::new(total_bytes, config.width, config.height),
        histogram: histogram(&reconstruction.grid),
        reconstruction,
    })
}

fn pair(first: Hypothesis, second: Hypothesis) -> HypothesisComparison {
    let diff = diff(&first.histogram, &second.histogram);
    let differing_pixels = differing_pixels(first.grid(), second.grid());
    match differing_pixels {
        Some(n) => log::info!(
            "{n} of {} pixels differ between {} and {}",
            first.grid().pixel_count(),
            first.order(),
            second.order()
        ),
        None => log::debug!("hypotheses have different geometry, skipping pixel diff"),
    }
    HypothesisComparison {
        first,
        second,
        diff,
        differing_pixels,
    }
}

/// Decode `bytes` and place the result under `order`.
pub fn hypothesis(
    bytes: &[u8],
    config: &DecodeConfig,
    order: ScanOrder,
) -> Result<Hypothesis, LayoutError> {
    place(&decode(bytes), bytes.len(), config, order)
}

/// Run both scan orders over the same decoded buffer and geometry.
///
/// `first` is row-major, `second` column-major.
pub fn compare_hypotheses(
    bytes: &[u8],
    config: &DecodeConfig,
) -> Result<HypothesisComparison, LayoutError> {
    let indices = decode(bytes);
    let first = place(&indices, bytes.len(), config, ScanOrder::RowMajor)?;
    let second = place(&indices, bytes.len(), config, ScanOrder::ColumnMajor)?;
    Ok(pair(first, second))
}

/// Read the same buffer as two panel profiles, each with its own geometry
/// and scan order.
pub fn compare_profiles(
    bytes: &[u8],
    a: &DisplayProfile,
    b: &DisplayProfile,
) -> Result<HypothesisComparison, LayoutError> {
    let indices = decode(bytes);
    let first = place(&indices, bytes.len(), &a.decode_config(), a.scan_order)?;
    let second = place(&indices, bytes.len(), &b.decode_config(), b.scan_order)?;
    Ok(pair(first, second))
}
