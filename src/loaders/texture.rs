use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info};
use std::path::Path;
use std::thread;

use crate::engine::{TextureHandle, TextureImage, TextureSettings};

/// Decodes textures on a background thread
///
/// `load` returns a handle immediately. The worker fills it in when decoding
/// finishes, or logs the failure and leaves it empty. The worker exits once
/// every clone of the loader is dropped.
#[derive(Debug, Clone)]
pub struct TextureLoader {
    jobs: Sender<TextureHandle>,
}

impl TextureLoader {
    pub fn new() -> Result<Self> {
        let (jobs, queue) = unbounded();
        thread::Builder::new()
            .name("texture-loader".to_string())
            .spawn(move || run_worker(queue))
            .context("failed to spawn texture loader thread")?;
        Ok(Self { jobs })
    }

    pub fn load(&self, path: impl AsRef<Path>, settings: TextureSettings) -> TextureHandle {
        let handle = TextureHandle::pending(path.as_ref(), settings);
        if self.jobs.send(handle.clone()).is_err() {
            error!("texture loader stopped, {:?} will not load", path.as_ref());
            handle.mark_failed();
        }
        handle
    }
}

fn run_worker(queue: Receiver<TextureHandle>) {
    for handle in queue.iter() {
        match decode_file(handle.source()) {
            Ok(image) => {
                info!(
                    "loaded texture {:?} ({}x{})",
                    handle.source(),
                    image.width,
                    image.height
                );
                handle.fulfill(image);
            }
            Err(e) => {
                error!("texture {:?} failed: {:#}", handle.source(), e);
                handle.mark_failed();
            }
        }
    }
    debug!("texture loader thread exiting");
}

/// Read and decode an image file into RGBA8. The format is sniffed from the
/// file contents, so extensions like `.jfif` work.
pub fn decode_file(path: &Path) -> Result<TextureImage> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {:?}", path))?;
    decode_bytes(&bytes).with_context(|| format!("decoding {:?}", path))
}

pub fn decode_bytes(bytes: &[u8]) -> Result<TextureImage> {
    let rgba = image::load_from_memory(bytes)
        .context("unrecognised image data")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    TextureImage::new(width, height, rgba.into_raw()).context("image has no pixels")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn wait_until(done: impl Fn() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(5) {
            if done() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_decode_bytes_png() {
        let image = decode_bytes(&png_bytes()).unwrap();
        assert_eq!((image.width, image.height), (2, 3));
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_bytes(b"not an image").is_err());
    }

    #[test]
    fn test_worker_fills_handle() {
        let path = std::env::temp_dir().join(format!("scene-viewer-{}.png", std::process::id()));
        std::fs::write(&path, png_bytes()).unwrap();

        let loader = TextureLoader::new().unwrap();
        let handle = loader.load(&path, TextureSettings::default());
        assert!(wait_until(|| handle.is_ready()));
        assert_eq!(handle.image().unwrap().width, 2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_marks_failed() {
        let loader = TextureLoader::new().unwrap();
        let handle = loader.load("/nonexistent/bedrock.webp", TextureSettings::repeating(100.0));
        assert!(wait_until(|| handle.is_failed()));
        assert!(!handle.is_ready());
    }
}
