//! Resolving a panel profile from the command line.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use epdimage::config::{self, DisplayProfile};
use epdimage::layout::ScanOrder;

/// Frame geometry options shared by the subcommands.
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Built-in profile name or path to a .toml profile
    #[arg(long, default_value = "epd579-horizontal")]
    pub profile: String,
    /// Override the frame width in pixels
    #[arg(long)]
    pub width: Option<usize>,
    /// Override the frame height in pixels
    #[arg(long)]
    pub height: Option<usize>,
    /// Override the scan order (horizontal/row-major or vertical/column-major)
    #[arg(long)]
    pub order: Option<ScanOrder>,
}

impl ProfileArgs {
    /// Load the named profile and apply overrides.
    pub fn resolve(&self) -> Result<DisplayProfile> {
        let mut profile = load_profile(&self.profile)?;
        if let Some(width) = self.width {
            profile.width = width;
        }
        if let Some(height) = self.height {
            profile.height = height;
        }
        if let Some(order) = self.order {
            profile.scan_order = order;
        }
        if self.width.is_some() || self.height.is_some() {
            // The presentation size belongs to the original geometry.
            profile.display_width = None;
            profile.display_height = None;
        }
        profile
            .validate()
            .with_context(|| format!("invalid geometry for profile '{}'", profile.name))?;
        Ok(profile)
    }
}

/// Load a profile by name (built-in) or path (.toml file).
pub fn load_profile(name_or_path: &str) -> Result<DisplayProfile> {
    if let Some(profile) = config::builtin_profile(name_or_path) {
        return Ok(profile);
    }

    let toml_path = Path::new(name_or_path);
    if toml_path.exists() {
        let toml_str = std::fs::read_to_string(toml_path)
            .with_context(|| format!("reading {}", toml_path.display()))?;
        let profile = DisplayProfile::from_toml(&toml_str)
            .with_context(|| format!("parsing profile from {}", toml_path.display()))?;
        return Ok(profile);
    }

    anyhow::bail!(
        "unknown profile '{}'. Use 'profiles' to see built-in profiles, or provide a .toml path.",
        name_or_path
    );
}
