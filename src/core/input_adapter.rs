use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::traits::{Button, Controller};

/// Pixels of trackpad scroll that count as one wheel line
const PIXELS_PER_LINE: f32 = 50.0;

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// Buttons that went down since the last reset
    just_pressed: HashSet<Button>,
    /// Last cursor position, for computing deltas
    cursor: Option<(f32, f32)>,
    /// Mouse movement delta since last reset
    mouse_delta: (f32, f32),
    scroll: f32,
}

impl WinitController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        self.set_button(button, event.state);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    self.set_button(btn, *state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = (position.x as f32, position.y as f32);
                if let Some(old_pos) = self.cursor {
                    self.mouse_delta.0 += new_pos.0 - old_pos.0;
                    self.mouse_delta.1 += new_pos.1 - old_pos.1;
                }
                self.cursor = Some(new_pos);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
            }
            WindowEvent::Focused(false) => {
                self.pressed_keys.clear();
            }
            _ => {}
        }
    }

    fn set_button(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // key repeat arrives as another press while already down
                if self.pressed_keys.insert(button) {
                    self.just_pressed.insert(button);
                }
            }
            ElementState::Released => {
                self.pressed_keys.remove(&button);
            }
        }
    }

    /// Reset per-frame state (press edges, mouse delta and scroll)
    /// Call this at the end of each frame after processing input
    pub fn reset_deltas(&mut self) {
        self.just_pressed.clear();
        self.mouse_delta = (0.0, 0.0);
        self.scroll = 0.0;
    }

    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyV => Some(Button::KeyV),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn was_pressed(&self, button: Button) -> bool {
        self.just_pressed.contains(&button)
    }

    fn pointer_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    fn scroll_delta(&self) -> f32 {
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Winit events with device ids can't be built in tests; exercise the state directly

    #[test]
    fn test_new_controller_empty() {
        let controller = WinitController::new();
        assert!(!controller.is_down(Button::MouseLeft));
        assert!(!controller.was_pressed(Button::KeyV));
        assert_eq!(controller.pointer_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_press_release_bookkeeping() {
        let mut controller = WinitController::new();
        controller.set_button(Button::MouseLeft, ElementState::Pressed);
        controller.set_button(Button::MouseLeft, ElementState::Pressed);
        assert!(controller.is_down(Button::MouseLeft));
        controller.set_button(Button::MouseLeft, ElementState::Released);
        assert!(!controller.is_down(Button::MouseLeft));
    }

    #[test]
    fn test_press_edge_lasts_one_frame() {
        let mut controller = WinitController::new();
        controller.set_button(Button::KeyV, ElementState::Pressed);
        assert!(controller.was_pressed(Button::KeyV));
        assert!(!controller.was_pressed(Button::Escape));

        // held across the frame boundary, then repeated
        controller.reset_deltas();
        controller.set_button(Button::KeyV, ElementState::Pressed);
        assert!(controller.is_down(Button::KeyV));
        assert!(!controller.was_pressed(Button::KeyV));

        controller.set_button(Button::KeyV, ElementState::Released);
        controller.set_button(Button::KeyV, ElementState::Pressed);
        assert!(controller.was_pressed(Button::KeyV));
    }

    #[test]
    fn test_tap_within_one_frame_still_counts() {
        let mut controller = WinitController::new();
        controller.set_button(Button::Escape, ElementState::Pressed);
        controller.set_button(Button::Escape, ElementState::Released);
        assert!(!controller.is_down(Button::Escape));
        assert!(controller.was_pressed(Button::Escape));
    }

    #[test]
    fn test_delta_reset() {
        let mut controller = WinitController::new();
        controller.mouse_delta = (10.0, 5.0);
        controller.scroll = 2.0;
        controller.cursor = Some((100.0, 200.0));

        controller.reset_deltas();
        assert_eq!(controller.pointer_delta(), (0.0, 0.0));
        assert_eq!(controller.scroll_delta(), 0.0);
        assert_eq!(controller.cursor, Some((100.0, 200.0)));
    }

    #[test]
    fn test_focus_loss_releases_buttons() {
        let mut controller = WinitController::new();
        controller.set_button(Button::MouseLeft, ElementState::Pressed);
        controller.process_event(&WindowEvent::Focused(false));
        assert!(!controller.is_down(Button::MouseLeft));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(WinitController::keycode_to_button(KeyCode::KeyV), Some(Button::KeyV));
        assert_eq!(WinitController::keycode_to_button(KeyCode::Escape), Some(Button::Escape));
        assert_eq!(WinitController::keycode_to_button(KeyCode::KeyW), None);
        assert_eq!(WinitController::mouse_button_to_button(MouseButton::Middle), None);
    }
}
