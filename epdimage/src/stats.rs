/// Pixel statistics: color histograms, histogram diffs and content ratio.
use std::collections::BTreeMap;

use crate::grid::Grid;
use crate::palette::{Palette, Rgb};

/// Pixel count per distinct color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: BTreeMap<Rgb, u64>,
}

impl Histogram {
    /// Accumulate counts over any pixel sequence.
    pub fn from_pixels<I: IntoIterator<Item = Rgb>>(pixels: I) -> Self {
        let mut counts = BTreeMap::new();
        for p in pixels {
            *counts.entry(p).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Count for `rgb`, zero if absent.
    pub fn get(&self, rgb: Rgb) -> u64 {
        self.counts.get(&rgb).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in RGB order.
    pub fn iter(&self) -> impl Iterator<Item = (Rgb, u64)> + '_ {
        self.counts.iter().map(|(&rgb, &count)| (rgb, count))
    }

    /// Entries for display: descending count, ties broken by palette order,
    /// then by RGB for colors outside the palette.
    pub fn ranked(&self, palette: &Palette) -> Vec<HistogramEntry> {
        let total = self.total();
        let mut entries: Vec<HistogramEntry> = self
            .iter()
            .map(|(rgb, count)| HistogramEntry {
                rgb,
                count,
                percentage: percentage(count, total),
                name: palette.name(rgb),
            })
            .collect();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| {
                    let pa = palette.position(a.rgb).unwrap_or(usize::MAX);
                    let pb = palette.position(b.rgb).unwrap_or(usize::MAX);
                    pa.cmp(&pb)
                })
                .then_with(|| a.rgb.cmp(&b.rgb))
        });
        entries
    }
}

/// One ranked histogram line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HistogramEntry {
    pub rgb: Rgb,
    pub count: u64,
    /// Share of all pixels, 0–100.
    pub percentage: f64,
    /// Palette name, `None` for colors outside the palette.
    pub name: Option<&'static str>,
}

/// Per-color comparison of two histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiffRow {
    pub rgb: Rgb,
    pub count_a: u64,
    pub count_b: u64,
    pub abs_diff: u64,
}

/// Histogram of a grid, in one pass over its pixels.
pub fn histogram(grid: &Grid) -> Histogram {
    Histogram::from_pixels(grid.pixels.iter().copied())
}

/// Compare two histograms over the union of their colors, sorted by RGB.
pub fn diff(a: &Histogram, b: &Histogram) -> Vec<DiffRow> {
    let mut keys: Vec<Rgb> = a.counts.keys().chain(b.counts.keys()).copied().collect();
    keys.sort_unstable();
    keys.dedup();
    keys.into_iter()
        .map(|rgb| {
            let (count_a, count_b) = (a.get(rgb), b.get(rgb));
            DiffRow {
                rgb,
                count_a,
                count_b,
                abs_diff: count_a.abs_diff(count_b),
            }
        })
        .collect()
}

/// Pixels differing from white, i.e. actual drawn content.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContentSummary {
    pub total: u64,
    pub white: u64,
    pub content: u64,
    /// `content / total`, 0.0 for an empty image.
    pub ratio: f64,
}

/// Content summary of a histogram, treating `background` as blank.
pub fn content(hist: &Histogram, background: Rgb) -> ContentSummary {
    let total = hist.total();
    let white = hist.get(background);
    let content = total - white;
    ContentSummary {
        total,
        white,
        content,
        ratio: if total == 0 {
            0.0
        } else {
            content as f64 / total as f64
        },
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(pixels: Vec<Rgb>, width: usize) -> Grid {
        let height = pixels.len() / width;
        Grid::from_pixels(width, height, pixels)
    }

    #[test]
    fn histogram_sums_to_pixel_count() {
        let g = grid(
            vec![Rgb::BLACK, Rgb::WHITE, Rgb::WHITE, Rgb::RED, Rgb::RED, Rgb::RED],
            3,
        );
        let h = histogram(&g);
        assert_eq!(h.total(), (g.width * g.height) as u64);
        assert_eq!(h.get(Rgb::RED), 3);
        assert_eq!(h.get(Rgb::YELLOW), 0);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn empty_grid_has_empty_histogram() {
        let h = histogram(&Grid::new(0, 0, Rgb::WHITE));
        assert!(h.is_empty());
        assert_eq!(h.total(), 0);
    }

    #[test]
    fn ranked_by_count_then_palette_order() {
        let h = Histogram::from_pixels([
            Rgb::RED,
            Rgb::YELLOW,
            Rgb::WHITE,
            Rgb::WHITE,
            Rgb::WHITE,
        ]);
        let ranked = h.ranked(&Palette::default());
        let order: Vec<Rgb> = ranked.iter().map(|e| e.rgb).collect();
        // yellow and red tie at 1; yellow comes first in the palette
        assert_eq!(order, vec![Rgb::WHITE, Rgb::YELLOW, Rgb::RED]);
        assert_eq!(ranked[0].name, Some("white"));
        assert!((ranked[0].percentage - 60.0).abs() < 1e-9);
    }

    #[test]
    fn ranked_puts_unknown_colors_after_palette_ties() {
        let odd = Rgb(10, 20, 30);
        let h = Histogram::from_pixels([odd, Rgb::BLACK]);
        let ranked = h.ranked(&Palette::default());
        assert_eq!(ranked[0].rgb, Rgb::BLACK);
        assert_eq!(ranked[1].rgb, odd);
        assert_eq!(ranked[1].name, None);
    }

    #[test]
    fn diff_covers_union_sorted_by_rgb() {
        let a = Histogram::from_pixels([Rgb::WHITE, Rgb::WHITE, Rgb::BLACK]);
        let b = Histogram::from_pixels([Rgb::RED, Rgb::WHITE]);
        let rows = diff(&a, &b);
        let keys: Vec<Rgb> = rows.iter().map(|r| r.rgb).collect();
        assert_eq!(keys, vec![Rgb::BLACK, Rgb::RED, Rgb::WHITE]);
        assert_eq!(
            rows[2],
            DiffRow {
                rgb: Rgb::WHITE,
                count_a: 2,
                count_b: 1,
                abs_diff: 1
            }
        );
        assert_eq!(rows[1].count_a, 0);
    }

    #[test]
    fn diff_is_symmetric() {
        let a = Histogram::from_pixels([Rgb::WHITE, Rgb::YELLOW, Rgb::YELLOW]);
        let b = Histogram::from_pixels([Rgb::RED, Rgb::RED, Rgb::RED, Rgb::YELLOW]);
        let ab = diff(&a, &b);
        let ba = diff(&b, &a);
        assert_eq!(ab.len(), ba.len());
        for (x, y) in ab.iter().zip(&ba) {
            assert_eq!(x.rgb, y.rgb);
            assert_eq!(x.abs_diff, y.abs_diff);
            assert_eq!((x.count_a, x.count_b), (y.count_b, y.count_a));
        }
    }

    #[test]
    fn content_counts_non_white() {
        let h = Histogram::from_pixels([Rgb::WHITE, Rgb::WHITE, Rgb::WHITE, Rgb::RED]);
        let c = content(&h, Rgb::WHITE);
        assert_eq!((c.total, c.white, c.content), (4, 3, 1));
        assert!((c.ratio - 0.25).abs() < 1e-9);
        assert_eq!(content(&Histogram::default(), Rgb::WHITE).ratio, 0.0);
    }
}
