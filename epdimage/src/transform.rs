//! Viewing transforms: quarter-turn rotations and nearest-neighbour resizing.
//!
//! These only ever produce new grids for presentation; decoded data is never
//! modified in place.

use std::str::FromStr;

use crate::grid::Grid;
use crate::palette::Rgb;

/// Rotate 90 degrees clockwise.
///
/// Maps (row, col) → (col, height-1-row); the output is `height` wide and
/// `width` tall.
pub fn rotate90(grid: &Grid) -> Grid {
    let (w, h) = (grid.width, grid.height);
    let mut pixels = Vec::with_capacity(grid.pixel_count());
    for row in 0..w {
        for col in 0..h {
            pixels.push(grid.get(row, h - 1 - col));
        }
    }
    Grid::from_pixels(h, w, pixels)
}

/// Rotate 90 degrees counter-clockwise; inverse of [`rotate90`].
///
/// Maps (row, col) → (width-1-col, row).
pub fn rotate270(grid: &Grid) -> Grid {
    let (w, h) = (grid.width, grid.height);
    let mut pixels = Vec::with_capacity(grid.pixel_count());
    for row in 0..w {
        for col in 0..h {
            pixels.push(grid.get(w - 1 - row, col));
        }
    }
    Grid::from_pixels(h, w, pixels)
}

/// Rotate 180 degrees.
pub fn rotate180(grid: &Grid) -> Grid {
    let mut pixels = grid.pixels.clone();
    pixels.reverse();
    Grid::from_pixels(grid.width, grid.height, pixels)
}

/// A quarter-turn rotation selected for viewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    /// 90 degrees clockwise.
    Cw90,
    Half,
    /// 90 degrees counter-clockwise.
    Ccw90,
}

impl Rotation {
    pub fn apply(self, grid: &Grid) -> Grid {
        match self {
            Rotation::None => grid.clone(),
            Rotation::Cw90 => rotate90(grid),
            Rotation::Half => rotate180(grid),
            Rotation::Ccw90 => rotate270(grid),
        }
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "none" => Ok(Rotation::None),
            "90" | "cw" => Ok(Rotation::Cw90),
            "180" => Ok(Rotation::Half),
            "270" | "-90" | "ccw" => Ok(Rotation::Ccw90),
            _ => Err(format!(
                "unknown rotation '{s}', use 0, 90 (clockwise), 180 or 270 (counter-clockwise)"
            )),
        }
    }
}

/// Source coordinate sampled for destination coordinate `d` when scaling
/// `src_len` to `dst_len`: the pixel under the destination pixel's center.
#[inline]
fn nearest(d: usize, src_len: usize, dst_len: usize) -> usize {
    ((2 * d + 1) * src_len / (2 * dst_len)).min(src_len - 1)
}

/// Resize with nearest-neighbour sampling.
///
/// An empty source has nothing to sample and yields an empty 0x0 grid
/// whatever the requested size.
pub fn resize_nearest(grid: &Grid, width: usize, height: usize) -> Grid {
    if (width, height) == (grid.width, grid.height) {
        return grid.clone();
    }
    if grid.is_empty() {
        return Grid::new(0, 0, Rgb::WHITE);
    }
    if width == 0 || height == 0 {
        return Grid::new(width, height, Rgb::WHITE);
    }
    let xs: Vec<usize> = (0..width)
        .map(|x| nearest(x, grid.width, width))
        .collect();
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        let sy = nearest(y, grid.height, height);
        let row = &grid.pixels[sy * grid.width..(sy + 1) * grid.width];
        pixels.extend(xs.iter().map(|&sx| row[sx]));
    }
    log::debug!(
        "resized {}x{} to {width}x{height}",
        grid.width,
        grid.height
    );
    Grid::from_pixels(width, height, pixels)
}

/// Width that keeps the aspect ratio of a `width` x `height` image scaled to
/// `target_height`, rounded to the nearest integer.
pub fn proportional_width(width: usize, height: usize, target_height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    (2 * width * target_height + height) / (2 * height)
}

/// Resize to `target_height`, keeping the aspect ratio.
pub fn resize_to_height(grid: &Grid, target_height: usize) -> Grid {
    let width = proportional_width(grid.width, grid.height, target_height);
    resize_nearest(grid, width, target_height)
}
