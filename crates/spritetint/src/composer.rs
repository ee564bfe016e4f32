//! Seeded frame selection, tinting and per-seed caching.
//!
//! For a cache miss the draws happen in a fixed order:
//!
//! 1. one boolean draw with the configured tint likelihood; on `false` the
//!    blank surface is the result and nothing else is drawn,
//! 2. one integer draw in `[0, frame_count - 1]` picking the frame,
//! 3. whatever draws the [`ColorSource`] makes.
//!
//! Keeping this order fixed is what makes a seed reproduce the same avatar.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use crate::color::{ColorSource, Rgb};
use crate::error::{ComposeError, ConfigError, LoadError};
use crate::rng::{DeterministicRng, SpriteRng};
use crate::sheet::{LoadState, LoadedSheet, SheetConfig, SheetLoader, SheetSource};
use crate::surface::Surface;
use crate::tint::tint;

/// Frame and color chosen for a tinted composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedTint {
    pub frame: u32,
    pub color: Rgb,
}

/// A composed avatar together with the tint decision that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    surface: Surface,
    tint: Option<AppliedTint>,
}

impl Composition {
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The frame and color, or `None` when the tint roll came up false.
    pub fn tint(&self) -> Option<AppliedTint> {
        self.tint
    }

    /// Whether the tint roll succeeded.
    ///
    /// A tinted composition can still have no visible pixels when the chosen
    /// frame is fully transparent.
    pub fn is_tinted(&self) -> bool {
        self.tint.is_some()
    }

    pub fn into_surface(self) -> Surface {
        self.surface
    }
}

/// Builds tinted avatars from a sprite sheet, one cached composition per seed.
pub struct SpriteComposer<S, C> {
    loader: SheetLoader<S>,
    color: C,
    frame_size: u32,
    tint_likelihood: u8,
    cache: Mutex<HashMap<u32, Arc<Composition>>>,
}

impl<S: SheetSource, C: ColorSource> SpriteComposer<S, C> {
    pub fn new(config: SheetConfig<S>, color: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            loader: SheetLoader::new(config.source, config.frame_size),
            color,
            frame_size: config.frame_size,
            tint_likelihood: config.tint_likelihood,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Load the sheet. Idempotent; see [`SheetLoader::load`].
    pub async fn load(&self) -> Result<Arc<LoadedSheet>, LoadError> {
        self.loader.load().await
    }

    pub fn load_state(&self) -> LoadState {
        self.loader.state()
    }

    pub fn loader(&self) -> &SheetLoader<S> {
        &self.loader
    }

    /// Compose the avatar for `seed` using [`DeterministicRng`].
    pub fn compose(&self, seed: u32) -> Result<Arc<Composition>, ComposeError> {
        self.compose_with(seed, DeterministicRng::new(seed))
    }

    /// Compose the avatar for `seed`, drawing from `rng` on a cache miss.
    ///
    /// `rng` must be freshly seeded for `seed`; the cache assumes the same
    /// seed always yields the same draws. On a hit `rng` is not touched.
    pub fn compose_with<R: SpriteRng>(
        &self,
        seed: u32,
        mut rng: R,
    ) -> Result<Arc<Composition>, ComposeError> {
        let sheet = self.loader.sheet().ok_or(ComposeError::NotReady)?;

        // Entries are write-once, so a panic elsewhere cannot leave one half-built.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = cache.get(&seed) {
            trace!(seed, "composition cache hit");
            return Ok(Arc::clone(hit));
        }

        let composition = Arc::new(self.draw(sheet, &mut rng)?);
        cache.insert(seed, Arc::clone(&composition));
        Ok(composition)
    }

    /// Wait for the sheet, then compose.
    pub async fn render(&self, seed: u32) -> Result<Arc<Composition>, ComposeError> {
        self.load().await?;
        self.compose(seed)
    }

    fn draw(
        &self,
        sheet: &LoadedSheet,
        rng: &mut dyn SpriteRng,
    ) -> Result<Composition, ComposeError> {
        let mut surface = Surface::new(self.frame_size, self.frame_size);

        if !rng.boolean(self.tint_likelihood) {
            trace!(likelihood = self.tint_likelihood, "tint skipped, leaving blank");
            return Ok(Composition {
                surface,
                tint: None,
            });
        }

        let last = sheet.frame_count() - 1;
        let frame = rng.integer(0, last).min(last);
        let color = self.color.color(rng);
        trace!(frame, %color, "composing frame");

        sheet.draw_frame(frame, &mut surface);
        tint(&mut surface, color)?;
        Ok(Composition {
            surface,
            tint: Some(AppliedTint { frame, color }),
        })
    }

    /// The cached composition for `seed`, if one was composed.
    pub fn cached(&self, seed: u32) -> Option<Arc<Composition>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&seed)
            .cloned()
    }

    pub fn cache_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::FixedColor;
    use crate::sheet::MemorySource;

    fn composer(likelihood: u8) -> SpriteComposer<MemorySource, FixedColor> {
        let mut image = Surface::new(40, 20);
        for x in 0..40 {
            image.put_pixel(x, 0, [0, 0, 0, 255]);
        }
        let config = SheetConfig::new(MemorySource::new("two-frames", image))
            .with_tint_likelihood(likelihood);
        SpriteComposer::new(config, FixedColor(Rgb::new(10, 20, 30))).unwrap()
    }

    #[test]
    fn test_compose_before_load_is_not_ready() {
        let composer = composer(100);
        assert_eq!(composer.compose(1), Err(ComposeError::NotReady));
        assert_eq!(composer.cache_len(), 0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config =
            SheetConfig::new(MemorySource::new("x", Surface::new(20, 20))).with_frame_size(0);
        assert!(matches!(
            SpriteComposer::new(config, FixedColor(Rgb::default())),
            Err(ConfigError::ZeroFrameSize)
        ));
    }

    #[tokio::test]
    async fn test_black_pixels_take_tint_color() {
        let composer = composer(100);
        composer.load().await.unwrap();

        let composition = composer.compose(5).unwrap();
        assert_eq!(composition.surface().pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(composition.surface().pixel(0, 1), [0, 0, 0, 0]);
        assert_eq!(composition.tint().map(|t| t.color), Some(Rgb::new(10, 20, 30)));
    }

    #[tokio::test]
    async fn test_zero_likelihood_yields_blank() {
        let composer = composer(0);
        composer.load().await.unwrap();

        let composition = composer.compose(5).unwrap();
        assert_eq!(*composition.surface(), Surface::new(20, 20));
        assert!(!composition.is_tinted());
        assert!(Arc::ptr_eq(&composition, &composer.cached(5).unwrap()));
    }

    #[tokio::test]
    async fn test_transparent_frame_still_counts_as_tinted() {
        let config = SheetConfig::new(MemorySource::new("clear", Surface::new(40, 20)));
        let composer = SpriteComposer::new(config, FixedColor(Rgb::new(1, 2, 3))).unwrap();
        composer.load().await.unwrap();

        let composition = composer.compose(11).unwrap();
        assert!(composition.surface().is_blank());
        assert!(composition.is_tinted());
        assert_eq!(composition.tint().map(|t| t.color), Some(Rgb::new(1, 2, 3)));
    }
}
