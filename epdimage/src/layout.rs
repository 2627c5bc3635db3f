//! Placement of a flat index sequence into a 2D grid.
//!
//! The panel's true scan order is unknown, so the same decoded buffer is
//! placed under either [`ScanOrder`] and the two results compared.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::codec::to_rgb;
use crate::config::{DecodeConfig, LengthPolicy};
use crate::error::LayoutError;
use crate::grid::Grid;
use crate::palette::{ColorIndex, Palette};

/// Rule mapping a flat sequence position to a (column, row) coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScanOrder {
    /// Left to right, then top to bottom ("horizontal").
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "horizontal"))]
    RowMajor,
    /// Top to bottom, then left to right ("vertical"). Each column is
    /// consumed in full before advancing to the next.
    #[cfg_attr(feature = "serde", serde(alias = "vertical"))]
    ColumnMajor,
}

impl ScanOrder {
    pub const ALL: [ScanOrder; 2] = [ScanOrder::RowMajor, ScanOrder::ColumnMajor];

    /// Grid coordinate `(x, y)` of flat offset `i`.
    #[inline]
    pub fn position(self, i: usize, width: usize, height: usize) -> (usize, usize) {
        match self {
            ScanOrder::RowMajor => (i % width, i / width),
            ScanOrder::ColumnMajor => (i / height, i % height),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScanOrder::RowMajor => "row-major",
            ScanOrder::ColumnMajor => "column-major",
        }
    }
}

impl fmt::Display for ScanOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScanOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "row-major" | "row" | "horizontal" | "h" => Ok(ScanOrder::RowMajor),
            "column-major" | "column" | "col" | "vertical" | "v" => Ok(ScanOrder::ColumnMajor),
            _ => Err(format!(
                "unknown scan order '{s}', use 'horizontal' (row-major) or 'vertical' (column-major)"
            )),
        }
    }
}

/// Decoded index count differed from the target pixel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LengthMismatch {
    /// `width * height` of the target grid.
    pub expected: usize,
    /// Number of indices supplied.
    pub actual: usize,
}

impl LengthMismatch {
    /// Trailing pad indices appended to reach `expected`.
    pub fn padded(&self) -> usize {
        self.expected.saturating_sub(self.actual)
    }

    /// Trailing indices dropped to fit `expected`.
    pub fn truncated(&self) -> usize {
        self.actual.saturating_sub(self.expected)
    }
}

impl fmt::Display for LengthMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pixel count {} does not match expected {}",
            self.actual, self.expected
        )?;
        if self.actual < self.expected {
            write!(f, " ({} padded)", self.padded())
        } else {
            write!(f, " ({} truncated)", self.truncated())
        }
    }
}

/// A grid placed under one scan order, with any length diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    pub order: ScanOrder,
    pub grid: Grid,
    /// Set when the input had to be padded or truncated.
    pub mismatch: Option<LengthMismatch>,
}

/// Truncate or pad `indices` to exactly `target` entries.
///
/// Padding appends `pad` at the end. Borrowed when no change was needed.
pub fn reconcile_length(
    indices: &[ColorIndex],
    target: usize,
    pad: ColorIndex,
) -> (Cow<'_, [ColorIndex]>, Option<LengthMismatch>) {
    if indices.len() == target {
        return (Cow::Borrowed(indices), None);
    }
    let mismatch = LengthMismatch {
        expected: target,
        actual: indices.len(),
    };
    log::warn!("{mismatch}");
    if indices.len() > target {
        (Cow::Borrowed(&indices[..target]), Some(mismatch))
    } else {
        let mut padded = Vec::with_capacity(target);
        padded.extend_from_slice(indices);
        padded.resize(target, pad);
        (Cow::Owned(padded), Some(mismatch))
    }
}

/// Place `indices` into a `width` x `height` grid through `palette`.
///
/// `indices` must already hold exactly `width * height` entries.
fn place(
    indices: &[ColorIndex],
    width: usize,
    height: usize,
    order: ScanOrder,
    palette: &Palette,
) -> Grid {
    debug_assert_eq!(indices.len(), width * height);
    match order {
        ScanOrder::RowMajor => Grid::from_pixels(width, height, to_rgb(indices, palette)),
        ScanOrder::ColumnMajor => {
            let mut grid = Grid::new(width, height, palette.lookup(1));
            for (i, &idx) in indices.iter().enumerate() {
                let (x, y) = order.position(i, width, height);
                grid.set(x, y, palette.lookup(idx));
            }
            grid
        }
    }
}

/// Reconstruct a grid with the default palette and white padding.
///
/// Never fails: a length mismatch is resolved by truncating or padding and
/// reported through [`Reconstruction::mismatch`].
pub fn reconstruct(
    indices: &[ColorIndex],
    width: usize,
    height: usize,
    order: ScanOrder,
) -> Reconstruction {
    let (indices, mismatch) = reconcile_length(indices, width * height, 1);
    let grid = place(&indices, width, height, order, &Palette::default());
    log::debug!("reconstructed {width}x{height} {order} grid");
    Reconstruction {
        order,
        grid,
        mismatch,
    }
}

/// Reconstruct a grid following the dimensions and policies of `config`.
///
/// Under [`LengthPolicy::Strict`] a length mismatch is returned as an error
/// instead of being reconciled.
pub fn reconstruct_with(
    config: &DecodeConfig,
    indices: &[ColorIndex],
    order: ScanOrder,
) -> Result<Reconstruction, LayoutError> {
    config.validate_dimensions()?;
    let (width, height) = (config.width, config.height);
    let target = width * height;
    if config.length_policy == LengthPolicy::Strict && indices.len() != target {
        return Err(LayoutError::LengthMismatch(LengthMismatch {
            expected: target,
            actual: indices.len(),
        }));
    }
    let (indices, mismatch) = reconcile_length(indices, target, config.pad_index);
    let grid = place(&indices, width, height, order, &config.palette);
    log::debug!("reconstructed {width}x{height} {order} grid");
    Ok(Reconstruction {
        order,
        grid,
        mismatch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::palette::Rgb;

    const B: Rgb = Rgb::BLACK;
    const W: Rgb = Rgb::WHITE;
    const Y: Rgb = Rgb::YELLOW;
    const R: Rgb = Rgb::RED;

    #[test]
    fn row_major_two_byte_scenario() {
        let idx = decode(&[0x1B, 0xE4]);
        let rec = reconstruct(&idx, 4, 2, ScanOrder::RowMajor);
        assert!(rec.mismatch.is_none());
        assert_eq!(rec.grid.pixels, vec![B, W, Y, R, R, Y, W, B]);
    }

    #[test]
    fn column_major_fills_columns_first() {
        let idx = decode(&[0x1B, 0xE4]);
        let rec = reconstruct(&idx, 4, 2, ScanOrder::ColumnMajor);
        // columns: [0,1], [2,3], [3,2], [1,0]
        assert_eq!(rec.grid.pixels, vec![B, Y, R, W, W, R, Y, B]);
    }

    #[test]
    fn column_major_offset_formula() {
        let (w, h) = (3, 4);
        let idx: Vec<u8> = (0..12).map(|i| (i % 4) as u8).collect();
        let rec = reconstruct(&idx, w, h, ScanOrder::ColumnMajor);
        let pal = Palette::default();
        for col in 0..w {
            for row in 0..h {
                assert_eq!(rec.grid.get(col, row), pal.lookup(idx[col * h + row]));
            }
        }
    }

    #[test]
    fn positions_cover_grid_once() {
        let (w, h) = (5, 3);
        for order in ScanOrder::ALL {
            let mut seen = vec![false; w * h];
            for i in 0..w * h {
                let (x, y) = order.position(i, w, h);
                assert!(!seen[y * w + x], "{order} visits ({x}, {y}) twice");
                seen[y * w + x] = true;
            }
        }
        assert_eq!(ScanOrder::ColumnMajor.position(4, w, h), (1, 1));
        assert_eq!(ScanOrder::RowMajor.position(7, w, h), (2, 1));
    }

    #[test]
    fn orders_differ_on_non_constant_input() {
        let idx = decode(&[0x03, 0x00, 0x00, 0x00]);
        let row = reconstruct(&idx, 4, 4, ScanOrder::RowMajor);
        let col = reconstruct(&idx, 4, 4, ScanOrder::ColumnMajor);
        assert_ne!(row.grid, col.grid);
    }

    #[test]
    fn orders_agree_on_constant_input() {
        let idx = decode(&[0xAA; 4]);
        let row = reconstruct(&idx, 4, 4, ScanOrder::RowMajor);
        let col = reconstruct(&idx, 4, 4, ScanOrder::ColumnMajor);
        assert_eq!(row.grid, col.grid);
    }

    #[test]
    fn short_input_pads_trailing_white() {
        let idx = vec![0u8; 5];
        let rec = reconstruct(&idx, 4, 2, ScanOrder::RowMajor);
        let m = rec.mismatch.unwrap();
        assert_eq!(m.padded(), 3);
        assert_eq!(m.truncated(), 0);
        assert_eq!(rec.grid.pixels, vec![B, B, B, B, B, W, W, W]);
    }

    #[test]
    fn padding_happens_before_column_placement() {
        let idx = vec![0u8; 5];
        let rec = reconstruct(&idx, 4, 2, ScanOrder::ColumnMajor);
        // flat [B,B,B,B,B,W,W,W] columns: [B,B],[B,B],[B,W],[W,W]
        assert_eq!(rec.grid.pixels, vec![B, B, B, W, B, B, W, W]);
    }

    #[test]
    fn long_input_drops_trailing_indices() {
        let mut idx = vec![0u8; 8];
        idx.extend([3, 3, 3]);
        let rec = reconstruct(&idx, 4, 2, ScanOrder::RowMajor);
        assert_eq!(rec.mismatch.unwrap().truncated(), 3);
        assert!(rec.grid.pixels.iter().all(|&p| p == B));
    }

    #[test]
    fn reconcile_borrows_when_exact() {
        let idx = [1u8, 2, 3];
        let (out, mismatch) = reconcile_length(&idx, 3, 1);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert!(mismatch.is_none());
    }

    #[test]
    fn strict_policy_rejects_mismatch() {
        let config = DecodeConfig {
            length_policy: LengthPolicy::Strict,
            ..DecodeConfig::new(4, 2)
        };
        let err = reconstruct_with(&config, &[0; 4], ScanOrder::RowMajor).unwrap_err();
        assert_eq!(
            err,
            LayoutError::LengthMismatch(LengthMismatch {
                expected: 8,
                actual: 4
            })
        );
    }

    #[test]
    fn configured_pad_index_is_used() {
        let config = DecodeConfig {
            pad_index: 3,
            ..DecodeConfig::new(4, 1)
        };
        let rec = reconstruct_with(&config, &[0, 0], ScanOrder::RowMajor).unwrap();
        assert_eq!(rec.grid.pixels, vec![B, B, R, R]);
        assert_eq!(rec.mismatch.unwrap().padded(), 2);
    }

    #[test]
    fn reconstruct_with_rejects_zero_dimension() {
        let config = DecodeConfig::new(0, 4);
        assert_eq!(
            reconstruct_with(&config, &[], ScanOrder::RowMajor).unwrap_err(),
            LayoutError::ZeroDimension {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn scan_order_parses_aliases() {
        assert_eq!("horizontal".parse::<ScanOrder>(), Ok(ScanOrder::RowMajor));
        assert_eq!("Vertical".parse::<ScanOrder>(), Ok(ScanOrder::ColumnMajor));
        assert_eq!("column-major".parse::<ScanOrder>(), Ok(ScanOrder::ColumnMajor));
        assert!("diagonal".parse::<ScanOrder>().is_err());
    }

    #[test]
    fn mismatch_display() {
        let m = LengthMismatch {
            expected: 8,
            actual: 5,
        };
        assert_eq!(m.to_string(), "pixel count 5 does not match expected 8 (3 padded)");
    }
}
