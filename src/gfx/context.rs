//! Instance, adapter and device creation.

use std::sync::Arc;

use crate::config;
use crate::error::InitError;

/// Owning handle for the wgpu device and queue, created once at startup.
pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub adapter: wgpu::Adapter,
}

impl GpuContext {
    /// Creates the instance, a surface for `window`, and a device whose
    /// queue supports both compute and presentation to that surface.
    ///
    /// Construction short-circuits on the first failing step.
    pub async fn new(
        window: Arc<winit::window::Window>,
    ) -> Result<(Self, wgpu::Surface<'static>), InitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        verify_limits(&adapter)?;
        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Sandglass Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok((
            Self {
                device: device.into(),
                queue: queue.into(),
                adapter,
            },
            surface,
        ))
    }
}

fn verify_limits(adapter: &wgpu::Adapter) -> Result<(), InitError> {
    let limits = adapter.limits();

    let checks: [(&'static str, u64, u64); 3] = [
        (
            "max_storage_buffer_binding_size",
            config::GRID_DIM.byte_size(),
            limits.max_storage_buffer_binding_size as u64,
        ),
        (
            "max_compute_workgroups_per_dimension",
            config::DISPATCH_COUNT as u64,
            limits.max_compute_workgroups_per_dimension as u64,
        ),
        (
            "max_compute_workgroup_size_x",
            config::COMPUTE_WORKGROUP_SIZE as u64,
            limits.max_compute_workgroup_size_x as u64,
        ),
    ];

    for (name, required, supported) in checks {
        if supported < required {
            return Err(InitError::LimitExceeded {
                name,
                required,
                supported,
            });
        }
    }

    Ok(())
}
