/// A 2-bit palette index, one per logical pixel. Only the values `0..=3` are
/// ever produced by the codec.
pub type ColorIndex = u8;

/// An 8-bit-per-channel RGB color.
///
/// Ordering is lexicographic over `(r, g, b)`, which is the order used for
/// deterministic histogram diffs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    /// Separator color used between side-by-side comparison panels.
    pub const GRAY: Rgb = Rgb(128, 128, 128);

    /// The three channels as a byte array.
    pub fn to_array(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Human names of the panel colors, in palette order.
const NAMES: [&str; 4] = ["black", "white", "yellow", "red"];

/// The four-entry color table of the panel.
///
/// Entry order doubles as the tie-break order when histograms are ranked for
/// display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Palette {
    pub colors: [Rgb; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [Rgb::BLACK, Rgb::WHITE, Rgb::YELLOW, Rgb::RED],
        }
    }
}

impl Palette {
    /// Map an index to its color. Indices outside `0..=3` resolve to white.
    #[inline]
    pub fn lookup(&self, index: ColorIndex) -> Rgb {
        self.colors
            .get(index as usize)
            .copied()
            .unwrap_or(Rgb::WHITE)
    }

    /// Position of `rgb` in the table, if it is one of the palette colors.
    pub fn position(&self, rgb: Rgb) -> Option<usize> {
        self.colors.iter().position(|&c| c == rgb)
    }

    /// Name of `rgb` if it is a palette entry.
    ///
    /// Names are positional (entry 0 is "black", and so on), so a custom
    /// palette keeps the panel's naming for its slots.
    pub fn name(&self, rgb: Rgb) -> Option<&'static str> {
        self.position(rgb).map(|i| NAMES[i])
    }
}

/// Map an index through the fixed panel palette.
#[inline]
pub fn palette_lookup(index: ColorIndex) -> Rgb {
    match index {
        0 => Rgb::BLACK,
        1 => Rgb::WHITE,
        2 => Rgb::YELLOW,
        3 => Rgb::RED,
        _ => Rgb::WHITE,
    }
}
