//! Error types for startup and per-frame failures.

use std::path::PathBuf;

use thiserror::Error;

/// A resource-creation step failed during initialization.
///
/// Initialization short-circuits on the first failure; nothing built after
/// the failing step exists, and whatever was built before it is released by
/// normal drop order.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("event loop creation failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("device limit `{name}` too small: need {required}, adapter supports {supported}")]
    LimitExceeded {
        name: &'static str,
        required: u64,
        supported: u64,
    },

    #[error("executable path is not resolvable: {0}")]
    ExecutablePath(#[source] std::io::Error),

    #[error("failed to read shader `{path}`: {source}")]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A device-level failure observed while producing a frame.
///
/// These are fatal: the frame loop terminates and the process exits with
/// failure. Transient surface staleness is not an error and never surfaces
/// here; it is recovered locally by recreating the surface.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("surface acquisition failed: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Top-level application error, either phase.
#[derive(Debug, Error)]
pub enum SandglassError {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
