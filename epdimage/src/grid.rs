use crate::palette::Rgb;

/// RGB image with row-major pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgb>,
}

impl Grid {
    /// Create a grid filled with a single color.
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    /// Create a grid from existing row-major pixel data.
    ///
    /// `pixels` must hold exactly `width * height` entries.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixel count does not match {width}x{height}"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get the pixel at (x, y).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    /// Set the pixel at (x, y).
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, val: Rgb) {
        self.pixels[y * self.width + x] = val;
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.pixels.chunks(self.width.max(1))
    }

    /// Copy `src` into this grid with its top-left corner at (x0, y0),
    /// clipping anything that falls outside.
    pub fn blit(&mut self, src: &Grid, x0: usize, y0: usize) {
        let w = src.width.min(self.width.saturating_sub(x0));
        let h = src.height.min(self.height.saturating_sub(y0));
        for y in 0..h {
            let dst = (y0 + y) * self.width + x0;
            let s = y * src.width;
            self.pixels[dst..dst + w].copy_from_slice(&src.pixels[s..s + w]);
        }
    }

    /// Flatten to interleaved RGB bytes, row-major.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_every_pixel() {
        let g = Grid::new(3, 2, Rgb::RED);
        assert_eq!(g.pixel_count(), 6);
        assert!(g.pixels.iter().all(|&p| p == Rgb::RED));
    }

    #[test]
    fn get_set_pixel() {
        let mut g = Grid::new(4, 4, Rgb::WHITE);
        g.set(2, 3, Rgb::BLACK);
        assert_eq!(g.get(2, 3), Rgb::BLACK);
        assert_eq!(g.pixels[3 * 4 + 2], Rgb::BLACK);
        assert_eq!(g.get(0, 0), Rgb::WHITE);
    }

    #[test]
    #[should_panic]
    fn from_pixels_rejects_wrong_length() {
        Grid::from_pixels(2, 2, vec![Rgb::BLACK; 3]);
    }

    #[test]
    fn rows_split_by_width() {
        let g = Grid::from_pixels(2, 2, vec![Rgb::BLACK, Rgb::WHITE, Rgb::YELLOW, Rgb::RED]);
        let rows: Vec<&[Rgb]> = g.rows().collect();
        assert_eq!(rows, vec![&[Rgb::BLACK, Rgb::WHITE][..], &[Rgb::YELLOW, Rgb::RED][..]]);
    }

    #[test]
    fn rows_of_empty_grid() {
        let g = Grid::new(0, 5, Rgb::WHITE);
        assert_eq!(g.rows().count(), 0);
    }

    #[test]
    fn blit_clips_at_edges() {
        let mut dst = Grid::new(3, 3, Rgb::WHITE);
        let src = Grid::new(2, 2, Rgb::RED);
        dst.blit(&src, 2, 2);
        assert_eq!(dst.get(2, 2), Rgb::RED);
        assert_eq!(dst.pixels.iter().filter(|&&p| p == Rgb::RED).count(), 1);
    }

    #[test]
    fn rgb_bytes_are_interleaved() {
        let g = Grid::from_pixels(2, 1, vec![Rgb::YELLOW, Rgb::RED]);
        assert_eq!(g.to_rgb_bytes(), vec![255, 255, 0, 255, 0, 0]);
    }
}
