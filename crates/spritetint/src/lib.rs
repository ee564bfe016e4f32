//! Seed-driven tinted avatar sprites.
//!
//! This crate picks one frame out of a horizontal sprite sheet and tints it
//! with a color chosen from the same seed. The same seed always produces the
//! same pixels, so a stable identifier maps to a stable avatar.
//!
//! # Pipeline
//!
//! - **Sheet loading** ([`sheet`]): the sheet image is fetched once per
//!   composer, its frame count derived as `floor(width / frame_size)`
//! - **Composition** ([`composer`]): tint decision, frame index and color are
//!   drawn from a seeded RNG in a fixed order and the [`Composition`] cached
//!   per seed
//! - **Tinting** ([`tint`]): luminosity-weighted per-pixel blend that leaves
//!   alpha and transparent pixels untouched
//!
//! # Example
//!
//! ```no_run
//! use spritetint::{FileSource, HueColor, SheetConfig, SpriteComposer};
//! use spritetint::png::{write_png, PngConfig};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SheetConfig::new(FileSource::new("faces.png")).with_frame_size(20);
//! let composer = SpriteComposer::new(config, HueColor::default())?;
//!
//! composer.load().await?;
//! let seed = spritetint::seed_from_identifier("user-1234");
//! let avatar = composer.compose(seed)?;
//! write_png(avatar.surface(), Path::new("user-1234.png"), &PngConfig::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Determinism
//!
//! - PCG32 RNG is used for all random draws, seeded from a `u32`
//! - Identifiers hash to seeds with BLAKE3
//! - PNG encoding uses fixed compression settings

pub mod color;
pub mod composer;
pub mod error;
pub mod png;
pub mod rng;
pub mod sheet;
pub mod surface;
pub mod tint;

// Re-export main types for convenience
pub use color::{ColorSource, FixedColor, HueColor, PaletteColor, Rgb};
pub use composer::{AppliedTint, Composition, SpriteComposer};
pub use error::{ComposeError, ConfigError, LoadError, TintError};
pub use png::{PngConfig, PngError};
pub use rng::{seed_from_identifier, DeterministicRng, SpriteRng};
pub use sheet::{
    FileSource, LoadState, LoadedSheet, MemorySource, SheetConfig, SheetLoader, SheetSource,
    DEFAULT_FRAME_SIZE, DEFAULT_TINT_LIKELIHOOD, MAX_FRAME_SIZE,
};
pub use surface::Surface;
