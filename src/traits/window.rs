/// Host window seen by the render loop
pub trait WindowContext {
    /// Schedule the next frame
    fn request_redraw(&self);

    /// Get the inner size of the window in physical pixels
    fn inner_size(&self) -> (u32, u32);

    /// Get the scale factor for HiDPI displays
    fn scale_factor(&self) -> f64;
}
