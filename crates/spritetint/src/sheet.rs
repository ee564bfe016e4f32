//! Sprite sheet configuration and one-time asynchronous loading.
//!
//! A sheet is a single image holding same-sized square frames laid out left
//! to right. [`SheetLoader`] fetches it at most once per loader, however many
//! callers ask, and remembers the outcome (including failures) for the
//! loader's lifetime.

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::{ConfigError, LoadError};
use crate::surface::Surface;

/// Default frame edge length in pixels.
pub const DEFAULT_FRAME_SIZE: u32 = 20;

/// Largest accepted frame edge length in pixels.
pub const MAX_FRAME_SIZE: u32 = 4096;

/// Default tint likelihood in percent.
pub const DEFAULT_TINT_LIKELIHOOD: u8 = 100;

fn default_frame_size() -> u32 {
    DEFAULT_FRAME_SIZE
}

fn default_tint_likelihood() -> u8 {
    DEFAULT_TINT_LIKELIHOOD
}

/// Where the sheet comes from and how it is cut and tinted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig<S = FileSource> {
    /// The sheet image.
    pub source: S,
    /// Edge length of one square frame, in pixels.
    #[serde(default = "default_frame_size")]
    pub frame_size: u32,
    /// Percent chance (0-100) that a composition is drawn and tinted at all.
    #[serde(default = "default_tint_likelihood")]
    pub tint_likelihood: u8,
}

impl<S> SheetConfig<S> {
    /// Config with the default frame size and likelihood.
    pub fn new(source: S) -> Self {
        Self {
            source,
            frame_size: DEFAULT_FRAME_SIZE,
            tint_likelihood: DEFAULT_TINT_LIKELIHOOD,
        }
    }

    pub fn with_frame_size(mut self, frame_size: u32) -> Self {
        self.frame_size = frame_size;
        self
    }

    pub fn with_tint_likelihood(mut self, tint_likelihood: u8) -> Self {
        self.tint_likelihood = tint_likelihood;
        self
    }

    /// Check the numeric fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_size == 0 {
            return Err(ConfigError::ZeroFrameSize);
        }
        if self.frame_size > MAX_FRAME_SIZE {
            return Err(ConfigError::FrameSizeTooLarge(self.frame_size));
        }
        if self.tint_likelihood > 100 {
            return Err(ConfigError::LikelihoodOutOfRange(self.tint_likelihood));
        }
        Ok(())
    }
}

/// Produces the decoded sheet image.
pub trait SheetSource: Send + Sync {
    /// Human-readable reference used in logs and errors.
    fn describe(&self) -> String;

    /// Fetch and decode the image.
    fn fetch(&self) -> impl Future<Output = Result<Surface, LoadError>> + Send;
}

/// A sheet read from disk and decoded with the `image` crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SheetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Surface, LoadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| LoadError::Io {
                source_ref: self.describe(),
                message: e.to_string(),
            })?;

        decode_sheet(&bytes, &self.describe())
    }
}

/// Decode encoded image bytes into an RGBA surface.
pub fn decode_sheet(bytes: &[u8], source_ref: &str) -> Result<Surface, LoadError> {
    let decode_error = |message: String| LoadError::Decode {
        source_ref: source_ref.to_string(),
        message,
    };

    let rgba = image::load_from_memory(bytes)
        .map_err(|e| decode_error(e.to_string()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();

    Surface::from_rgba(width, height, rgba.into_raw())
        .ok_or_else(|| decode_error("decoded buffer does not match dimensions".to_string()))
}

/// An already-decoded sheet.
#[derive(Debug, Clone)]
pub struct MemorySource {
    pub name: String,
    pub image: Surface,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, image: Surface) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }
}

impl SheetSource for MemorySource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn fetch(&self) -> Result<Surface, LoadError> {
        Ok(self.image.clone())
    }
}

/// A successfully loaded sheet and its derived frame count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSheet {
    image: Surface,
    frame_size: u32,
    frame_count: u32,
}

impl LoadedSheet {
    /// Derive the frame count as `floor(width / frame_size)`.
    ///
    /// Fails when the sheet cannot hold a single frame.
    pub fn new(image: Surface, frame_size: u32) -> Result<Self, LoadError> {
        let frame_count = image.width().checked_div(frame_size).unwrap_or(0);
        if frame_count == 0 {
            return Err(LoadError::SheetTooSmall {
                width: image.width(),
                frame_size,
            });
        }
        Ok(Self {
            image,
            frame_size,
            frame_count,
        })
    }

    pub fn image(&self) -> &Surface {
        &self.image
    }

    pub fn frame_size(&self) -> u32 {
        self.frame_size
    }

    /// Number of whole frames; always at least 1.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Copy frame `index` to the origin of `target`.
    ///
    /// Rows past the bottom of the sheet are left as they are.
    pub fn draw_frame(&self, index: u32, target: &mut Surface) {
        let offset = i64::from(index) * i64::from(self.frame_size);
        target.draw(&self.image, -offset, 0);
    }
}

/// Where a loader is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

/// Loads a sheet exactly once and shares the outcome with every caller.
///
/// Callers arriving while the fetch is in flight wait on that same fetch. If
/// every caller drops its `load` future before the fetch finishes, the loader
/// goes back to [`LoadState::Unloaded`] and the next `load` fetches again.
pub struct SheetLoader<S> {
    source: S,
    frame_size: u32,
    in_flight: AtomicUsize,
    fetches: AtomicUsize,
    outcome: OnceCell<Result<Arc<LoadedSheet>, LoadError>>,
}

impl<S: SheetSource> SheetLoader<S> {
    pub fn new(source: S, frame_size: u32) -> Self {
        Self {
            source,
            frame_size,
            in_flight: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
            outcome: OnceCell::new(),
        }
    }

    /// Load the sheet, or return the outcome of the earlier load.
    ///
    /// A failure is returned again on every later call; it is never retried.
    pub async fn load(&self) -> Result<Arc<LoadedSheet>, LoadError> {
        self.outcome
            .get_or_init(|| self.fetch_sheet())
            .await
            .clone()
    }

    async fn fetch_sheet(&self) -> Result<Arc<LoadedSheet>, LoadError> {
        // Decrements when the fetch finishes or its future is dropped.
        let _in_flight = InFlight::enter(&self.in_flight);
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let source = self.source.describe();
        debug!(%source, frame_size = self.frame_size, "loading sprite sheet");

        let loaded = self
            .source
            .fetch()
            .await
            .and_then(|image| LoadedSheet::new(image, self.frame_size));

        match loaded {
            Ok(sheet) => {
                debug!(
                    %source,
                    width = sheet.image().width(),
                    height = sheet.image().height(),
                    frames = sheet.frame_count(),
                    "sprite sheet ready"
                );
                Ok(Arc::new(sheet))
            }
            Err(err) => {
                warn!(%source, error = %err, "sprite sheet failed to load");
                Err(err)
            }
        }
    }

    /// The loaded sheet, if loading already finished successfully.
    pub fn sheet(&self) -> Option<&Arc<LoadedSheet>> {
        self.outcome.get().and_then(|outcome| outcome.as_ref().ok())
    }

    pub fn state(&self) -> LoadState {
        match self.outcome.get() {
            Some(Ok(_)) => LoadState::Ready,
            Some(Err(_)) => LoadState::Failed,
            None if self.in_flight.load(Ordering::Acquire) > 0 => LoadState::Loading,
            None => LoadState::Unloaded,
        }
    }

    /// How many times the underlying source has been fetched.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn frame_size(&self) -> u32 {
        self.frame_size
    }
}

/// Counts one running fetch for as long as it is alive.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
