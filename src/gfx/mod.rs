//! Graphics layer: device creation, surface lifecycle and the display pass.

pub mod context;
pub mod display;
pub mod shaders;
pub mod surface;

pub use context::GpuContext;
pub use display::DisplayPipeline;
pub use surface::{Acquired, PresentationSurface};
