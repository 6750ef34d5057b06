use glam::Vec3;
use scene_viewer::config::CameraConfig;
use scene_viewer::engine::{Material, PerspectiveCamera, SceneGraph};
use scene_viewer::math::Color;
use scene_viewer::traits::{NoInput, SceneRenderer, WindowContext};
use scene_viewer::{RenderLoop, Result, SceneError, SceneManager, SpinAxes, ViewController, ViewMode};
use std::cell::Cell;

struct FakeWindow {
    size: Cell<(u32, u32)>,
    scale: Cell<f64>,
    redraws: Cell<u32>,
}

impl FakeWindow {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: Cell::new((width, height)),
            scale: Cell::new(1.0),
            redraws: Cell::new(0),
        }
    }
}

impl WindowContext for FakeWindow {
    fn request_redraw(&self) {
        self.redraws.set(self.redraws.get() + 1);
    }

    fn inner_size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn scale_factor(&self) -> f64 {
        self.scale.get()
    }
}

/// Records what it was asked to draw
#[derive(Default)]
struct RecordingRenderer {
    size: (u32, u32),
    ratio: f64,
    resizes: u32,
    cameras: Vec<Vec3>,
    object_counts: Vec<usize>,
    fail_next: bool,
}

impl SceneRenderer for RecordingRenderer {
    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.resizes += 1;
    }

    fn pixel_ratio(&self) -> f64 {
        self.ratio
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.ratio = ratio;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<()> {
        if std::mem::take(&mut self.fail_next) {
            return Err(SceneError::Surface(wgpu::SurfaceError::Timeout));
        }
        self.cameras.push(camera.position);
        self.object_counts.push(scene.len());
        Ok(())
    }
}

struct Harness {
    window: FakeWindow,
    renderer: RecordingRenderer,
    manager: SceneManager,
    views: ViewController,
    driver: RenderLoop,
}

impl Harness {
    fn new(width: u32, height: u32) -> Self {
        Self {
            window: FakeWindow::new(width, height),
            renderer: RecordingRenderer::default(),
            manager: SceneManager::new(),
            views: ViewController::from_config(&CameraConfig::default()).unwrap(),
            driver: RenderLoop::new(),
        }
    }

    fn tick(&mut self, ms: f64) -> Result<scene_viewer::TickReport> {
        self.driver.tick(
            ms,
            &self.window,
            &mut self.renderer,
            &mut self.manager,
            &mut self.views,
            &NoInput,
        )
    }
}

#[cfg(test)]
mod render_loop_tests {
    use super::*;

    #[test]
    fn test_resize_reaches_inactive_rig() {
        let mut h = Harness::new(800, 600);
        h.tick(0.0).unwrap();

        h.window.size.set((1000, 250));
        let report = h.tick(16.0).unwrap();
        assert!(report.resized);
        assert_eq!(h.renderer.size, (1000, 250));

        for mode in [ViewMode::Front, ViewMode::Back] {
            assert_eq!(h.views.rig(mode).camera.aspect, 4.0);
        }

        // the back rig was never rendered, yet is already consistent
        h.views.toggle_view();
        h.tick(32.0).unwrap();
        assert_eq!(h.views.active_camera().aspect, 4.0);
        assert_eq!(h.renderer.resizes, 2);
    }

    #[test]
    fn test_unchanged_size_does_not_resize() {
        let mut h = Harness::new(640, 480);
        for frame in 0..5 {
            let report = h.tick(frame as f64 * 16.0).unwrap();
            assert_eq!(report.resized, frame == 0);
        }
        assert_eq!(h.renderer.resizes, 1);
        assert_eq!(h.renderer.cameras.len(), 5);
    }

    #[test]
    fn test_zero_size_skips_render_but_keeps_ticking() {
        let mut h = Harness::new(0, 0);
        h.manager
            .add_cube(1.0, Material::standard(Color::WHITE), Vec3::ZERO, Vec3::ZERO)
            .unwrap()
            .spin(SpinAxes::Y);

        let report = h.tick(2000.0).unwrap();
        assert!(!report.rendered);
        assert!(!report.resized);
        assert_eq!(h.renderer.size, (0, 0));
        assert_eq!(h.window.redraws.get(), 1);

        let (_, cube) = h.manager.objects().next().unwrap();
        assert_eq!(cube.transform.rotation.y, 2.0);
    }

    #[test]
    fn test_timestamp_drives_animation_in_seconds() {
        let mut h = Harness::new(320, 240);
        let id = h
            .manager
            .add_cube(1.0, Material::standard(Color::WHITE), Vec3::ZERO, Vec3::ZERO)
            .unwrap()
            .spin(SpinAxes::X)
            .id();

        let report = h.tick(2500.0).unwrap();
        assert_eq!(report.seconds, 2.5);
        assert_eq!(h.manager.object(id).unwrap().transform.rotation.x, 2.5);
    }

    #[test]
    fn test_renders_through_active_camera() {
        let mut h = Harness::new(320, 240);
        h.tick(0.0).unwrap();
        h.views.toggle_view();
        h.tick(16.0).unwrap();
        h.views.toggle_view();
        h.tick(32.0).unwrap();

        let front = h.views.rig(ViewMode::Front).camera.position;
        let back = h.views.rig(ViewMode::Back).camera.position;
        let expected = [front, back, front];
        assert_eq!(h.renderer.cameras.len(), 3);
        for (drawn, want) in h.renderer.cameras.iter().zip(expected) {
            assert!(drawn.abs_diff_eq(want, 1e-4), "{drawn} != {want}");
        }
    }

    #[test]
    fn test_pixel_ratio_follows_display() {
        let mut h = Harness::new(320, 240);
        h.tick(0.0).unwrap();
        assert_eq!(h.renderer.ratio, 1.0);

        h.window.scale.set(1.75);
        h.tick(16.0).unwrap();
        assert_eq!(h.renderer.ratio, 1.75);
    }

    #[test]
    fn test_render_failure_still_schedules_next_frame() {
        let mut h = Harness::new(320, 240);
        h.renderer.fail_next = true;

        assert!(h.tick(0.0).is_err());
        assert_eq!(h.window.redraws.get(), 1);

        let report = h.tick(16.0).unwrap();
        assert!(report.rendered);
        assert_eq!(h.window.redraws.get(), 2);
    }

    #[test]
    fn test_objects_appearing_between_ticks_are_drawn() {
        let mut h = Harness::new(320, 240);
        h.tick(0.0).unwrap();
        h.manager
            .scene_mut()
            .add(scene_viewer::engine::Object3D::group(Vec::new()));
        h.tick(16.0).unwrap();
        assert_eq!(h.renderer.object_counts, vec![0, 1]);
    }
}
