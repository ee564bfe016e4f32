//! Sheet options from flags and an optional JSON config file.
//!
//! Flags always win over the file. The file may set any subset of:
//!
//! ```json
//! {
//!   "source": "assets/faces.png",
//!   "frame_size": 20,
//!   "tint_likelihood": 80,
//!   "palette": ["#e63c3c", "#3cc85a"]
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Deserialize;
use spritetint::{
    ColorSource, FileSource, FixedColor, HueColor, PaletteColor, Rgb, SheetConfig,
    DEFAULT_FRAME_SIZE, DEFAULT_TINT_LIKELIHOOD,
};

/// Flags shared by every command that opens a sheet.
#[derive(Args, Debug, Clone, Default)]
pub struct SheetArgs {
    /// Path to the sprite sheet PNG
    #[arg(long)]
    pub sheet: Option<PathBuf>,

    /// Frame edge length in pixels (default: 20)
    #[arg(long)]
    pub frame_size: Option<u32>,

    /// Percent chance (0-100) that an avatar is drawn and tinted (default: 100)
    #[arg(long)]
    pub likelihood: Option<u8>,

    /// Tint every avatar with this color (#rrggbb)
    #[arg(long, conflicts_with = "palette")]
    pub color: Option<Rgb>,

    /// Pick the tint from these colors (comma separated #rrggbb)
    #[arg(long, value_delimiter = ',')]
    pub palette: Vec<Rgb>,

    /// JSON config file with defaults for the flags above
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Contents of a `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<PathBuf>,
    pub frame_size: Option<u32>,
    pub tint_likelihood: Option<u8>,
    pub color: Option<Rgb>,
    pub palette: Option<Vec<Rgb>>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// How tint colors are chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorChoice {
    Fixed(Rgb),
    Palette(Vec<Rgb>),
    Hue,
}

impl ColorChoice {
    pub fn into_source(self) -> Result<Box<dyn ColorSource + Send + Sync>> {
        Ok(match self {
            ColorChoice::Fixed(color) => Box::new(FixedColor(color)),
            ColorChoice::Palette(colors) => Box::new(PaletteColor::new(colors)?),
            ColorChoice::Hue => Box::new(HueColor::default()),
        })
    }
}

/// Fully merged options.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub sheet: SheetConfig,
    pub color: ColorChoice,
}

impl SheetArgs {
    /// Merge flags over the config file (if any) over built-in defaults.
    pub fn resolve(&self) -> Result<Resolved> {
        let file = match &self.config {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        self.merge(file)
    }

    fn merge(&self, file: FileConfig) -> Result<Resolved> {
        let Some(source) = self.sheet.clone().or(file.source) else {
            bail!("No sprite sheet given; pass --sheet or set \"source\" in the config file");
        };

        let sheet = SheetConfig::new(FileSource::new(source))
            .with_frame_size(
                self.frame_size
                    .or(file.frame_size)
                    .unwrap_or(DEFAULT_FRAME_SIZE),
            )
            .with_tint_likelihood(
                self.likelihood
                    .or(file.tint_likelihood)
                    .unwrap_or(DEFAULT_TINT_LIKELIHOOD),
            );
        sheet.validate()?;

        let color = if let Some(color) = self.color {
            ColorChoice::Fixed(color)
        } else if !self.palette.is_empty() {
            ColorChoice::Palette(self.palette.clone())
        } else if let Some(color) = file.color {
            ColorChoice::Fixed(color)
        } else if let Some(palette) = file.palette {
            ColorChoice::Palette(palette)
        } else {
            ColorChoice::Hue
        };

        Ok(Resolved { sheet, color })
    }
}
