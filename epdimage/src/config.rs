use crate::codec::PIXELS_PER_BYTE;
use crate::error::{ConfigError, LayoutError};
use crate::layout::ScanOrder;
use crate::palette::{ColorIndex, Palette};

/// What to do when the decoded index count differs from `width * height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LengthPolicy {
    /// Truncate extra indices or pad missing ones, and report the mismatch.
    #[default]
    Reconcile,
    /// Refuse to reconstruct.
    Strict,
}

/// Dimensions and policies for turning indices into a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    pub width: usize,
    pub height: usize,
    pub palette: Palette,
    /// Index appended when the buffer is short. White by default.
    pub pad_index: ColorIndex,
    pub length_policy: LengthPolicy,
}

impl DecodeConfig {
    /// Config for a `width` x `height` target with the panel palette, white
    /// padding and reconciling length policy.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            palette: Palette::default(),
            pad_index: 1,
            length_policy: LengthPolicy::Reconcile,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Frame buffer size in bytes for these dimensions.
    pub fn frame_bytes(&self) -> usize {
        self.pixel_count() / PIXELS_PER_BYTE
    }

    pub(crate) fn validate_dimensions(&self) -> Result<(), LayoutError> {
        if self.width == 0 || self.height == 0 {
            return Err(LayoutError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.pixel_count() % PIXELS_PER_BYTE != 0 {
            return Err(LayoutError::NotPixelAligned {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Check dimensions and pad index.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_dimensions()?;
        if self.pad_index > 3 {
            return Err(ConfigError::PadIndex(self.pad_index));
        }
        Ok(())
    }
}

/// A named panel description: frame geometry, assumed scan order and the
/// size it is shown at.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayProfile {
    pub name: String,
    pub width: usize,
    pub height: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scan_order: ScanOrder,
    /// Presentation size. The decoded frame is resized to this for viewing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_width: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_height: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default = "default_pad_index"))]
    pub pad_index: ColorIndex,
    #[cfg_attr(feature = "serde", serde(default))]
    pub length_policy: LengthPolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub palette: Palette,
}

#[cfg(feature = "serde")]
fn default_pad_index() -> ColorIndex {
    1
}

impl DisplayProfile {
    /// Profile with default palette and policies.
    pub fn new(name: &str, width: usize, height: usize, scan_order: ScanOrder) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            scan_order,
            display_width: None,
            display_height: None,
            pad_index: 1,
            length_policy: LengthPolicy::Reconcile,
            palette: Palette::default(),
        }
    }

    pub fn decode_config(&self) -> DecodeConfig {
        DecodeConfig {
            width: self.width,
            height: self.height,
            palette: self.palette,
            pad_index: self.pad_index,
            length_policy: self.length_policy,
        }
    }

    /// Presentation size, if it differs from the frame size. A missing
    /// dimension keeps the frame's.
    pub fn display_size(&self) -> Option<(usize, usize)> {
        let size = (
            self.display_width.unwrap_or(self.width),
            self.display_height.unwrap_or(self.height),
        );
        (size != (self.width, self.height)).then_some(size)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.decode_config().validate()?;
        if let Some((width, height)) = self.display_size() {
            if width == 0 || height == 0 {
                return Err(ConfigError::DisplaySize { width, height });
            }
        }
        Ok(())
    }

    /// Parse and validate a profile from TOML.
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<DisplayProfile, ConfigError> {
        let profile: DisplayProfile =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }
}

// --- Built-in profiles ---

/// Bytes in one full frame of the 5.79" four-color panel.
pub const EPD579_FRAME_BYTES: usize = 53_856;

/// 5.79" panel read as 792x272 rows, shown at its 400-pixel display width.
pub fn epd579_horizontal() -> DisplayProfile {
    DisplayProfile {
        display_width: Some(400),
        display_height: Some(272),
        ..DisplayProfile::new("epd579-horizontal", 792, 272, ScanOrder::RowMajor)
    }
}

/// 5.79" panel read as 272x792 columns ("data horizontal, byte vertical").
pub fn epd579_vertical() -> DisplayProfile {
    DisplayProfile::new("epd579-vertical", 272, 792, ScanOrder::ColumnMajor)
}

/// List of all built-in profile names.
pub const BUILTIN_PROFILES: &[&str] = &["epd579-horizontal", "epd579-vertical"];

/// Load a built-in profile by name.
pub fn builtin_profile(name: &str) -> Option<DisplayProfile> {
    match name {
        "epd579-horizontal" => Some(epd579_horizontal()),
        "epd579-vertical" => Some(epd579_vertical()),
        _ => None,
    }
}
