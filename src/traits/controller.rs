/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Switch between the front and back cameras
    KeyV,
    /// Quit
    Escape,
    MouseLeft,
}

/// Controller - per-frame view of pointer and key state
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// True if `button` went down since the last frame. Held keys and
    /// key repeat do not count again.
    fn was_pressed(&self, _button: Button) -> bool {
        false
    }

    /// Pointer movement in physical pixels since the last frame
    fn pointer_delta(&self) -> (f32, f32) {
        (0.0, 0.0)
    }

    /// Wheel movement in lines since the last frame, positive away from the user
    fn scroll_delta(&self) -> f32 {
        0.0
    }
}

/// Controller with nothing pressed, used before input is wired up
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl Controller for NoInput {
    fn is_down(&self, _button: Button) -> bool {
        false
    }
}
