//! Sheet loading tests: single fetch, cached failures and lifecycle states.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use spritetint::png::{write_png, PngConfig};
use spritetint::{
    FileSource, FixedColor, LoadError, LoadState, Rgb, SheetConfig, SheetLoader, SheetSource,
    SpriteComposer, Surface,
};
use tokio::sync::Notify;

/// Source that counts fetches, optionally fails, and can be held open.
#[derive(Clone)]
struct CountingSource {
    fetches: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
    fail: bool,
}

impl CountingSource {
    fn ok() -> Self {
        Self {
            fetches: Arc::new(AtomicUsize::new(0)),
            gate: None,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }

    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::ok()
        }
    }
}

impl SheetSource for CountingSource {
    fn describe(&self) -> String {
        "counting".to_string()
    }

    async fn fetch(&self) -> Result<Surface, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        } else {
            tokio::task::yield_now().await;
        }
        if self.fail {
            return Err(LoadError::Io {
                source_ref: self.describe(),
                message: "connection reset".to_string(),
            });
        }
        Ok(Surface::new(100, 20))
    }
}

#[tokio::test]
async fn test_repeated_loads_fetch_once() {
    let source = CountingSource::ok();
    let loader = SheetLoader::new(source.clone(), 20);

    let first = loader.load().await.unwrap();
    let second = loader.load().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.frame_count(), 5);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(loader.fetch_count(), 1);
}

#[tokio::test]
async fn test_concurrent_loads_share_one_fetch() {
    let source = CountingSource::ok();
    let loader = SheetLoader::new(source.clone(), 20);

    let (a, b, c) = tokio::join!(loader.load(), loader.load(), loader.load());

    let a = a.unwrap();
    assert!(Arc::ptr_eq(&a, &b.unwrap()));
    assert!(Arc::ptr_eq(&a, &c.unwrap()));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_is_cached_and_not_retried() {
    let source = CountingSource::failing();
    let loader = SheetLoader::new(source.clone(), 20);

    let first = loader.load().await.unwrap_err();
    let second = loader.load().await.unwrap_err();

    assert_eq!(first, second);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(loader.state(), LoadState::Failed);
    assert!(loader.sheet().is_none());
}

#[tokio::test]
async fn test_lifecycle_states() {
    let gate = Arc::new(Notify::new());
    let loader = SheetLoader::new(CountingSource::gated(Arc::clone(&gate)), 20);
    assert_eq!(loader.state(), LoadState::Unloaded);

    let (loaded, ()) = tokio::join!(loader.load(), async {
        tokio::task::yield_now().await;
        assert_eq!(loader.state(), LoadState::Loading);
        assert!(loader.sheet().is_none());
        gate.notify_one();
    });

    assert!(loaded.is_ok());
    assert_eq!(loader.state(), LoadState::Ready);
    assert_eq!(loader.sheet().map(|s| s.frame_count()), Some(5));
}

#[tokio::test]
async fn test_cancelled_load_returns_to_unloaded() {
    let gate = Arc::new(Notify::new());
    let source = CountingSource::gated(Arc::clone(&gate));
    let loader = SheetLoader::new(source.clone(), 20);

    tokio::select! {
        biased;
        _ = loader.load() => panic!("gated load cannot finish"),
        () = async {
            tokio::task::yield_now().await;
            assert_eq!(loader.state(), LoadState::Loading);
        } => {}
    }

    // The only caller went away mid-fetch.
    assert_eq!(loader.state(), LoadState::Unloaded);
    assert_eq!(loader.fetch_count(), 1);

    gate.notify_one();
    assert!(loader.load().await.is_ok());
    assert_eq!(loader.state(), LoadState::Ready);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_load_keeps_composer_not_ready() {
    let config = SheetConfig::new(CountingSource::failing());
    let composer = SpriteComposer::new(config, FixedColor(Rgb::default())).unwrap();

    assert!(composer.load().await.is_err());
    assert_eq!(composer.compose(1), Err(spritetint::ComposeError::NotReady));
    assert!(matches!(
        composer.render(1).await,
        Err(spritetint::ComposeError::Load(LoadError::Io { .. }))
    ));
}

// ============================================================================
// File sources
// ============================================================================

fn write_sheet(dir: &tempfile::TempDir, width: u32) -> PathBuf {
    let mut image = Surface::new(width, 20);
    for y in 0..20 {
        for x in 0..width {
            image.put_pixel(x, y, [(x * 2) as u8, 0, 0, 255]);
        }
    }
    let path = dir.path().join("sheet.png");
    write_png(&image, &path, &PngConfig::default()).unwrap();
    path
}

#[tokio::test]
async fn test_file_source_loads_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sheet(&dir, 100);

    let loader = SheetLoader::new(FileSource::new(&path), 20);
    let sheet = loader.load().await.unwrap();

    assert_eq!(sheet.frame_count(), 5);
    assert_eq!(sheet.image().pixel(42, 3), [84, 0, 0, 255]);
}

#[tokio::test]
async fn test_file_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let loader = SheetLoader::new(FileSource::new(dir.path().join("absent.png")), 20);

    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_file_sheet_narrower_than_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sheet(&dir, 12);

    let loader = SheetLoader::new(FileSource::new(&path), 20);
    assert_eq!(
        loader.load().await.unwrap_err(),
        LoadError::SheetTooSmall {
            width: 12,
            frame_size: 20
        }
    );
}
