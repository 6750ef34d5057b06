use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    #[default]
    Srgb,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mapping {
    #[default]
    Uv,
    Equirectangular,
}

/// Sampling settings fixed when the texture is requested
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureSettings {
    pub wrap: WrapMode,
    pub repeat: [f32; 2],
    pub color_space: ColorSpace,
    pub mapping: Mapping,
}

impl TextureSettings {
    /// Tiled texture repeated `times` in both directions
    pub fn repeating(times: f32) -> Self {
        Self {
            wrap: WrapMode::Repeat,
            repeat: [times, times],
            ..Self::default()
        }
    }

    pub fn equirectangular() -> Self {
        Self {
            mapping: Mapping::Equirectangular,
            ..Self::default()
        }
    }
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            wrap: WrapMode::default(),
            repeat: [1.0, 1.0],
            color_space: ColorSpace::default(),
            mapping: Mapping::default(),
        }
    }
}

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        (width > 0 && height > 0 && rgba.len() == width as usize * height as usize * 4)
            .then_some(Self { width, height, rgba })
    }

    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }
}

#[derive(Debug)]
struct TextureInner {
    id: TextureId,
    source: PathBuf,
    settings: TextureSettings,
    image: OnceLock<TextureImage>,
    failed: AtomicBool,
}

/// Handle to a texture whose pixels may arrive later
///
/// Handles are returned immediately by the loader and filled in once the
/// image is decoded. Until then (or forever, if decoding fails) the renderer
/// draws the material's base color.
#[derive(Debug, Clone)]
pub struct TextureHandle {
    inner: Arc<TextureInner>,
}

impl TextureHandle {
    pub fn pending(source: impl Into<PathBuf>, settings: TextureSettings) -> Self {
        Self {
            inner: Arc::new(TextureInner {
                id: TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed)),
                source: source.into(),
                settings,
                image: OnceLock::new(),
                failed: AtomicBool::new(false),
            }),
        }
    }

    pub fn from_image(image: TextureImage, settings: TextureSettings) -> Self {
        let handle = Self::pending(PathBuf::new(), settings);
        handle.fulfill(image);
        handle
    }

    pub fn id(&self) -> TextureId {
        self.inner.id
    }

    pub fn source(&self) -> &Path {
        &self.inner.source
    }

    pub fn settings(&self) -> &TextureSettings {
        &self.inner.settings
    }

    pub fn image(&self) -> Option<&TextureImage> {
        self.inner.image.get()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.image.get().is_some()
    }

    pub fn is_failed(&self) -> bool {
        self.inner.failed.load(Ordering::Acquire)
    }

    /// Store decoded pixels. Returns false if the handle was already filled.
    pub(crate) fn fulfill(&self, image: TextureImage) -> bool {
        self.inner.image.set(image).is_ok()
    }

    pub(crate) fn mark_failed(&self) {
        self.inner.failed.store(true, Ordering::Release);
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_then_fulfilled() {
        let handle = TextureHandle::pending("moon.jpg", TextureSettings::default());
        assert!(!handle.is_ready());
        assert!(handle.fulfill(TextureImage::solid([255, 0, 0, 255])));
        assert!(handle.is_ready());
        assert!(!handle.fulfill(TextureImage::solid([0, 0, 0, 255])));
        assert_eq!(handle.image().unwrap().rgba, vec![255, 0, 0, 255]);
    }

    #[test]
    fn test_clones_share_pixels() {
        let handle = TextureHandle::pending("a.png", TextureSettings::repeating(100.0));
        let clone = handle.clone();
        handle.fulfill(TextureImage::solid([1, 2, 3, 4]));
        assert!(clone.is_ready());
        assert_eq!(clone, handle);
        assert_eq!(clone.settings().repeat, [100.0, 100.0]);
        assert_eq!(clone.settings().wrap, WrapMode::Repeat);
    }

    #[test]
    fn test_image_size_validation() {
        assert!(TextureImage::new(2, 2, vec![0; 16]).is_some());
        assert!(TextureImage::new(2, 2, vec![0; 15]).is_none());
        assert!(TextureImage::new(0, 2, vec![]).is_none());
    }

    #[test]
    fn test_failed_flag() {
        let handle = TextureHandle::pending("missing.jpg", TextureSettings::default());
        handle.mark_failed();
        assert!(handle.is_failed());
        assert!(!handle.is_ready());
    }
}
