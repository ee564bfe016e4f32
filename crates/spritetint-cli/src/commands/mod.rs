//! CLI command implementations

pub mod batch;
pub mod info;
pub mod render;

use anyhow::{Context, Result};
use serde::Serialize;
use spritetint::png::{encode_png, hash_png, PngConfig};
use spritetint::{ColorSource, Composition, FileSource, Rgb, SpriteComposer};
use std::path::{Path, PathBuf};

use crate::config::SheetArgs;

/// Composer over an on-disk sheet with a color strategy picked at runtime.
pub type AvatarComposer = SpriteComposer<FileSource, Box<dyn ColorSource + Send + Sync>>;

/// Build a composer from merged flags and config file.
pub fn open_composer(args: &SheetArgs) -> Result<AvatarComposer> {
    let resolved = args.resolve()?;
    let color = resolved.color.into_source()?;
    Ok(SpriteComposer::new(resolved.sheet, color)?)
}

/// Single-threaded runtime for the sheet load.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
}

/// One written avatar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarReport {
    pub path: PathBuf,
    pub seed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Whether the tint roll succeeded, even if the frame drew nothing.
    pub tinted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    pub hash: String,
}

/// Encode `avatar` deterministically, write it to `path` and describe it.
pub(crate) fn write_avatar(
    avatar: &Composition,
    path: &Path,
    seed: u32,
    identifier: Option<String>,
) -> Result<AvatarReport> {
    let data = encode_png(avatar.surface(), &PngConfig::default())?;
    std::fs::write(path, &data)
        .with_context(|| format!("Failed to write avatar to {}", path.display()))?;

    tracing::debug!(path = %path.display(), seed, bytes = data.len(), "avatar written");

    Ok(AvatarReport {
        path: path.to_path_buf(),
        seed,
        identifier,
        tinted: avatar.is_tinted(),
        frame: avatar.tint().map(|t| t.frame),
        color: avatar.tint().map(|t| t.color),
        hash: hash_png(&data),
    })
}
