use std::sync::Arc;
use winit::window::Window as WinitWindow;

use crate::traits::WindowContext;

/// Wrapper around winit Window exposing what the render loop needs
#[derive(Debug, Clone)]
pub struct Window {
    inner: Arc<WinitWindow>,
}

impl Window {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { inner: window }
    }

    pub fn inner(&self) -> &Arc<WinitWindow> {
        &self.inner
    }
}

impl WindowContext for Window {
    fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    fn inner_size(&self) -> (u32, u32) {
        let size = self.inner.inner_size();
        (size.width, size.height)
    }

    fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }
}
