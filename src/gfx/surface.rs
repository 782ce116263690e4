//! Presentation surface lifecycle: configure, acquire, recreate, present.

use std::sync::Arc;

use crate::error::FrameError;

/// Result of an acquisition attempt that did not fail fatally.
pub enum Acquired {
    /// A presentable target; present or drop it before the next acquire.
    Frame(wgpu::SurfaceTexture),
    /// The image chain no longer matches the display area and must be
    /// rebuilt before further use.
    Stale,
}

/// Owns the configured window surface and its recreation protocol.
pub struct PresentationSurface {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    device: Arc<wgpu::Device>,
}

impl PresentationSurface {
    pub fn new(
        device: Arc<wgpu::Device>,
        adapter: &wgpu::Adapter,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Self {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        Self {
            surface,
            config,
            device,
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Attempts to acquire the next presentable image.
    ///
    /// Outdated, lost and suboptimal chains are reported as [`Acquired::Stale`]
    /// so the caller can recreate and retry next iteration; only
    /// unrecoverable device conditions become errors.
    pub fn acquire(&mut self) -> Result<Acquired, FrameError> {
        match self.surface.get_current_texture() {
            Ok(frame) if frame.suboptimal => Ok(Acquired::Stale),
            Ok(frame) => Ok(Acquired::Frame(frame)),
            Err(wgpu::SurfaceError::Outdated) | Err(wgpu::SurfaceError::Lost) => {
                Ok(Acquired::Stale)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface acquisition timed out, dropping the frame");
                Ok(Acquired::Stale)
            }
            Err(err) => Err(FrameError::Surface(err)),
        }
    }

    /// Rebuilds the image chain at the given size.
    ///
    /// Waits for all in-flight device work first, so nothing can still be
    /// rendering into the old chain. Safe to call repeatedly while the
    /// surface keeps reporting staleness during an interactive resize.
    /// A zero-sized drawable area (minimized window) leaves the old
    /// configuration in place; acquisition keeps reporting stale until the
    /// window has a usable size again.
    pub fn recreate(&mut self, width: u32, height: u32) {
        let _ = self.device.poll(wgpu::MaintainBase::Wait);

        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        log::debug!("surface recreated at {width}x{height}");
    }
}
