use winit::event::WindowEvent;
use winit::window::Window as WinitWindow;

use crate::renderer::UiOverlay;
use crate::traits::CameraControls;
use crate::view::ViewController;

/// Figures shown in the scene stats window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelStats {
    pub fps: f32,
    pub objects: usize,
    pub animated: usize,
    pub pending_loads: usize,
    pub resolution: (u32, u32),
}

/// Parameter panel drawn with egui on top of the scene
pub struct ControlPanel {
    ctx: egui::Context,
    state: egui_winit::State,
}

impl ControlPanel {
    pub fn new(window: &WinitWindow) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        Self { ctx, state }
    }

    /// Feed a window event to egui; true if the panel consumed it
    pub fn on_window_event(&mut self, window: &WinitWindow, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run one UI frame and return the overlay for the renderer
    pub fn run<C: CameraControls>(
        &mut self,
        window: &WinitWindow,
        views: &mut ViewController<C>,
        stats: &PanelStats,
    ) -> UiOverlay {
        let raw_input = self.state.take_egui_input(window);
        let full_output = run_panel(&self.ctx, raw_input, views, stats);

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        UiOverlay {
            primitives,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }
}

/// One egui frame of the panel against `views`
///
/// A click on "Switch Camera" toggles the view and discards the pass, so the
/// frame that is shown already reads the new label.
pub fn run_panel<C: CameraControls>(
    ctx: &egui::Context,
    raw_input: egui::RawInput,
    views: &mut ViewController<C>,
    stats: &PanelStats,
) -> egui::FullOutput {
    ctx.run(raw_input, |ctx| {
        let switch = draw_panel(ctx, views.current_label(), stats);
        if switch.is_some_and(|button| button.clicked()) {
            views.toggle_view();
            ctx.request_discard("camera switched");
        }
    })
}

/// Lay out the panel windows. Returns the "Switch Camera" button's response
/// while its window is open.
pub fn draw_panel(ctx: &egui::Context, current_view: &str, stats: &PanelStats) -> Option<egui::Response> {
    let switch = egui::Window::new("Camera Controls")
        .title_bar(true)
        .resizable(false)
        .default_pos(egui::pos2(10.0, 10.0))
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Current View");
                let mut label = current_view;
                ui.add(egui::TextEdit::singleline(&mut label).desired_width(110.0));
            });
            ui.add_space(5.0);
            ui.button("Switch Camera")
        })
        .and_then(|window| window.inner);

    egui::Window::new("Scene")
        .title_bar(true)
        .resizable(false)
        .default_pos(egui::pos2(10.0, 130.0))
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading(
                egui::RichText::new(format!("{:.0} FPS", stats.fps))
                    .size(24.0)
                    .color(egui::Color32::from_rgb(74, 158, 255)),
            );
            let frame_time_ms = if stats.fps > 0.0 { 1000.0 / stats.fps } else { 0.0 };
            ui.label(
                egui::RichText::new(format!("{:.2} ms", frame_time_ms))
                    .size(14.0)
                    .color(egui::Color32::GRAY),
            );

            ui.separator();
            ui.monospace(format!("Objects:   {}", stats.objects));
            ui.monospace(format!("Animated:  {}", stats.animated));
            if stats.pending_loads > 0 {
                ui.monospace(
                    egui::RichText::new(format!("Loading:   {}", stats.pending_loads))
                        .color(egui::Color32::from_rgb(200, 150, 100)),
                );
            }
            ui.monospace(format!(
                "Resolution: {}x{}",
                stats.resolution.0, stats.resolution.1
            ));
        });

    switch
}
