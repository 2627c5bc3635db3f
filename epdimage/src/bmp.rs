//! Uncompressed bitmap output and image loading, through the `image` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::grid::Grid;
use crate::palette::Rgb;

#[derive(Debug, thiserror::Error)]
pub enum BitmapError {
    #[error("cannot encode an empty {width}x{height} image")]
    EmptyGrid { width: usize, height: usize },
    #[error("image dimension {0} exceeds the bitmap limit")]
    TooLarge(usize),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn dimension(value: usize) -> Result<u32, BitmapError> {
    u32::try_from(value).map_err(|_| BitmapError::TooLarge(value))
}

/// Bitmap dimensions of `grid`, rejecting grids no BMP can hold.
fn bitmap_size(grid: &Grid) -> Result<(u32, u32), BitmapError> {
    if grid.is_empty() {
        return Err(BitmapError::EmptyGrid {
            width: grid.width,
            height: grid.height,
        });
    }
    Ok((dimension(grid.width)?, dimension(grid.height)?))
}

/// Encode a grid as a 24-bit uncompressed BMP stream.
pub fn encode_bmp<W: Write>(grid: &Grid, writer: &mut W) -> Result<(), BitmapError> {
    let (width, height) = bitmap_size(grid)?;
    BmpEncoder::new(writer).write_image(
        &grid.to_rgb_bytes(),
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

/// Write a grid to `path` as BMP.
///
/// The grid is checked before the file is touched. If encoding fails after
/// the file was created, the partial file is removed.
pub fn write_bmp(grid: &Grid, path: &Path) -> Result<(), BitmapError> {
    bitmap_size(grid)?;
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    let result = encode_bmp(grid, &mut w).and_then(|()| w.flush().map_err(BitmapError::from));
    if result.is_err() {
        drop(w);
        let _ = std::fs::remove_file(path);
    }
    result
}

fn grid_from_image(img: image::DynamicImage) -> Grid {
    let rgb = img.into_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let pixels = rgb.pixels().map(|p| Rgb(p[0], p[1], p[2])).collect();
    Grid::from_pixels(width, height, pixels)
}

/// Load any image the `image` crate understands as an RGB grid.
pub fn load_image(path: &Path) -> Result<Grid, BitmapError> {
    Ok(grid_from_image(image::open(path)?))
}

/// Decode an in-memory image as an RGB grid.
pub fn decode_image(bytes: &[u8]) -> Result<Grid, BitmapError> {
    Ok(grid_from_image(image::load_from_memory(bytes)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmp_has_signature_and_size() {
        let grid = Grid::new(3, 2, Rgb::YELLOW);
        let mut buf = Vec::new();
        encode_bmp(&grid, &mut buf).unwrap();
        assert_eq!(&buf[0..2], b"BM");
        // 14 + 40 header bytes, rows of 3*3 bytes padded to 12
        assert_eq!(buf.len(), 54 + 2 * 12);
        assert_eq!(u32::from_le_bytes(buf[2..6].try_into().unwrap()), buf.len() as u32);
    }

    #[test]
    fn encoded_bmp_decodes_to_same_grid() {
        let grid = Grid::from_pixels(
            2,
            2,
            vec![Rgb::BLACK, Rgb::WHITE, Rgb::YELLOW, Rgb::RED],
        );
        let mut buf = Vec::new();
        encode_bmp(&grid, &mut buf).unwrap();
        assert_eq!(decode_image(&buf).unwrap(), grid);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let mut buf = Vec::new();
        let err = encode_bmp(&Grid::new(0, 4, Rgb::WHITE), &mut buf).unwrap_err();
        assert!(matches!(err, BitmapError::EmptyGrid { width: 0, height: 4 }));
        assert!(buf.is_empty());
    }

    #[test]
    fn garbage_does_not_decode() {
        assert!(decode_image(b"not an image").is_err());
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("epdimage-{}-{name}", std::process::id()))
    }

    #[test]
    fn rejected_grid_leaves_no_file() {
        let path = scratch_path("empty.bmp");
        let _ = std::fs::remove_file(&path);
        let err = write_bmp(&Grid::new(0, 0, Rgb::WHITE), &path).unwrap_err();
        assert!(matches!(err, BitmapError::EmptyGrid { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn rejected_grid_keeps_existing_file() {
        let path = scratch_path("existing.bmp");
        std::fs::write(&path, b"keep me").unwrap();
        assert!(write_bmp(&Grid::new(3, 0, Rgb::WHITE), &path).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn write_then_load() {
        let path = scratch_path("roundtrip.bmp");
        let grid = Grid::from_pixels(2, 1, vec![Rgb::RED, Rgb::BLACK]);
        write_bmp(&grid, &path).unwrap();
        assert_eq!(load_image(&path).unwrap(), grid);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let path = Path::new("/nonexistent-dir/out.bmp");
        let err = write_bmp(&Grid::new(1, 1, Rgb::RED), path).unwrap_err();
        assert!(matches!(err, BitmapError::Io(_)));
    }
}
