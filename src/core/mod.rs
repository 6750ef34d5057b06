pub mod gpu_context;
pub mod input_adapter;

pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
