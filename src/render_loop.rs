//! Per-frame driver
//!
//! One `tick` per host frame callback:
//! 1. match the drawing buffer to the window and refresh both cameras' aspect
//! 2. convert the timestamp to seconds
//! 3. run the registry's animation sweep
//! 4. feed input to the active camera's controls
//! 5. set the pixel ratio
//! 6. render through the active camera
//! 7. schedule the next frame

use log::{debug, info};

use crate::error::Result;
use crate::frame::FpsCounter;
use crate::scene_manager::SceneManager;
use crate::traits::{CameraControls, Controller, SceneRenderer, WindowContext};
use crate::view::ViewController;

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub frame: u64,
    pub seconds: f32,
    pub resized: bool,
    pub rendered: bool,
}

#[derive(Debug, Default)]
pub struct RenderLoop {
    frame: u64,
    last_seconds: Option<f32>,
    fps: FpsCounter,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    pub fn tick<W, R, C>(
        &mut self,
        timestamp_ms: f64,
        window: &W,
        renderer: &mut R,
        manager: &mut SceneManager,
        views: &mut ViewController<C>,
        input: &dyn Controller,
    ) -> Result<TickReport>
    where
        W: WindowContext + ?Sized,
        R: SceneRenderer + ?Sized,
        C: CameraControls,
    {
        let (width, height) = window.inner_size();
        let visible = width > 0 && height > 0;

        let resized = visible && resize_to_display(width, height, renderer, views);

        let seconds = (timestamp_ms * 0.001) as f32;
        if let Some(previous) = self.last_seconds {
            if let Some(fps) = self.fps.record(seconds - previous) {
                debug!("fps {:.1}", fps);
            }
        }
        self.last_seconds = Some(seconds);

        manager.update(seconds);
        views.update_controls(input);

        let rendered = if visible {
            renderer.set_pixel_ratio(window.scale_factor());
            let result = renderer.render(manager.scene(), views.active_camera());
            if result.is_err() {
                window.request_redraw();
            }
            result?;
            true
        } else {
            false
        };

        window.request_redraw();

        let report = TickReport {
            frame: self.frame,
            seconds,
            resized,
            rendered,
        };
        self.frame += 1;
        Ok(report)
    }
}

/// Resize the drawing buffer if it differs from the displayed size.
/// Returns true if a resize happened.
fn resize_to_display<R, C>(width: u32, height: u32, renderer: &mut R, views: &mut ViewController<C>) -> bool
where
    R: SceneRenderer + ?Sized,
    C: CameraControls,
{
    if renderer.drawing_buffer_size() == (width, height) {
        return false;
    }
    info!("resizing drawing buffer to {}x{}", width, height);
    renderer.set_size(width, height);
    views.set_aspect(width as f32 / height as f32);
    true
}
