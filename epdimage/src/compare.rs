use crate::grid::Grid;
use crate::palette::Rgb;
use crate::transform::resize_to_height;

/// Separator width between comparison panels, in pixels.
pub const DEFAULT_GAP_WIDTH: usize = 10;

/// Place two grids side by side at a common height.
///
/// Both inputs are resized (nearest neighbour, aspect preserved) to the
/// smaller of their heights. `a` occupies the left columns, then `gap_width`
/// columns of `gap_color`, then `b`.
pub fn side_by_side(a: &Grid, b: &Grid, gap_color: Rgb, gap_width: usize) -> Grid {
    let height = a.height.min(b.height);
    let a = resize_to_height(a, height);
    let b = resize_to_height(b, height);

    let width = a.width + gap_width + b.width;
    let mut out = Grid::new(width, height, gap_color);
    out.blit(&a, 0, 0);
    out.blit(&b, a.width + gap_width, 0);
    log::debug!(
        "composed {}x{} comparison from {}x{} and {}x{}",
        width,
        height,
        a.width,
        a.height,
        b.width,
        b.height
    );
    out
}
