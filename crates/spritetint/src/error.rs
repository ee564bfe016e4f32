//! Error types for sheet loading, tinting and composition.

use thiserror::Error;

/// Invalid composer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Frames must be at least one pixel wide.
    #[error("frame size must be non-zero")]
    ZeroFrameSize,

    /// Frames are small avatar tiles; larger sizes are refused before any
    /// surface is allocated.
    #[error("frame size {0} exceeds the {max}px limit", max = crate::sheet::MAX_FRAME_SIZE)]
    FrameSizeTooLarge(u32),

    /// Likelihood is a percentage.
    #[error("tint likelihood must be within 0-100, got {0}")]
    LikelihoodOutOfRange(u8),

    /// A palette color source needs at least one entry.
    #[error("palette must contain at least one color")]
    EmptyPalette,

    /// A color string was not `#rrggbb` / `rrggbb`.
    #[error("invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),
}

/// The sprite sheet could not be made ready.
///
/// Failures are cached by the loader and handed to every later caller, so the
/// type is cheap to clone and carries rendered messages instead of sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Reading the source failed.
    #[error("failed to read sheet '{source_ref}': {message}")]
    Io { source_ref: String, message: String },

    /// The source bytes are not a decodable image.
    #[error("failed to decode sheet '{source_ref}': {message}")]
    Decode { source_ref: String, message: String },

    /// The sheet cannot hold a single frame.
    #[error("sheet is {width}px wide, narrower than one {frame_size}px frame")]
    SheetTooSmall { width: u32, frame_size: u32 },
}

/// Per-pixel tinting failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TintError {
    /// The raw buffer is not a whole number of RGBA pixels.
    #[error("pixel buffer of {0} bytes is not a multiple of 4")]
    MisalignedBuffer(usize),
}

/// A composition request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// `compose` ran before the sheet finished loading successfully.
    #[error("sprite sheet not loaded")]
    NotReady,

    /// The sheet failed to load while rendering.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Tinting the drawn frame failed.
    #[error("tint failed: {0}")]
    Tint(#[from] TintError),
}
