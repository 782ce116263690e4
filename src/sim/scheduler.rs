//! The per-frame state machine coupling simulation and presentation.
//!
//! Each iteration: wait for the prior frame to retire, acquire a
//! presentation target, optionally advance the simulation by one step, draw
//! the active half of the double buffer, submit, present. A stale surface
//! is recovered locally by recreating it; the iteration then produces no
//! frame. Exactly one frame is ever in flight.

use std::sync::Arc;

use rand::Rng;
use winit::window::Window;

use crate::app::SharedFlags;
use crate::config;
use crate::error::{FrameError, InitError};
use crate::gfx::{shaders, Acquired, DisplayPipeline, GpuContext, PresentationSurface};
use crate::sim::compute::{SimulationCompute, StepRequest};
use crate::sim::double_buffer::CellDoubleBuffer;
use crate::sim::timer::UpdateTimer;

/// What one loop iteration produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame was submitted and presented.
    Presented,
    /// The surface was stale or a resize was pending; it was recreated and
    /// the iteration produced no frame.
    Recreated,
}

pub struct FrameScheduler {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    surface: PresentationSurface,
    compute: SimulationCompute,
    display: DisplayPipeline,
    buffers: CellDoubleBuffer,
    timer: UpdateTimer,
    rng: rand::rngs::ThreadRng,
    // Submission of the frame currently in flight, if any. Waiting on it
    // bounds in-flight frames to exactly one.
    pending_frame: Option<wgpu::SubmissionIndex>,
}

impl FrameScheduler {
    /// Builds the full GPU side of the application: device, surface,
    /// generated initial grid, double buffer, compute and display stages.
    pub async fn new(window: Arc<Window>) -> Result<Self, InitError> {
        let shader_dir = shaders::shader_directory()?;
        let update_source = shaders::load_source(&shader_dir, config::UPDATE_SHADER_NAME)?;
        let display_source = shaders::load_source(&shader_dir, config::DISPLAY_SHADER_NAME)?;

        let size = window.inner_size();
        let (context, surface) = GpuContext::new(window).await?;
        let GpuContext {
            device,
            queue,
            adapter,
        } = context;

        let surface =
            PresentationSurface::new(device.clone(), &adapter, surface, size.width, size.height);

        let cells = config::GENERATION_STRATEGY.generate(config::GRID_DIM);
        let buffers = CellDoubleBuffer::new(&device, config::GRID_DIM, &cells);

        let compute = SimulationCompute::new(&device, &update_source, &buffers);
        let display = DisplayPipeline::new(
            &device,
            &display_source,
            surface.format(),
            &buffers,
            config::GRID_DIM,
        );

        Ok(Self {
            device,
            queue,
            surface,
            compute,
            display,
            buffers,
            timer: UpdateTimer::new(config::CELL_UPDATE_INTERVAL),
            rng: rand::rng(),
            pending_frame: None,
        })
    }

    /// Runs one iteration of the frame state machine.
    ///
    /// `surface_size` is the window's current drawable area, used when the
    /// surface has to be recreated.
    pub fn render_frame(
        &mut self,
        flags: &SharedFlags,
        surface_size: (u32, u32),
    ) -> Result<FrameOutcome, FrameError> {
        if let Some(index) = self.pending_frame.take() {
            let _ = self
                .device
                .poll(wgpu::MaintainBase::WaitForSubmissionIndex(index));
        }

        let acquired = self.surface.acquire()?;
        let resize_pending = flags.take_resize_pending();
        let frame = match acquired {
            Acquired::Frame(frame) if !resize_pending => frame,
            // Either the chain itself is stale or the window notified a
            // resize; rebuild and let the next iteration acquire again.
            _ => {
                self.surface.recreate(surface_size.0, surface_size.1);
                return Ok(FrameOutcome::Recreated);
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        if self.timer.is_due() {
            let request = StepRequest::for_active(self.buffers.active_index(), self.rng.random());
            self.compute.record_step(&self.queue, &mut encoder, request);
            // The step's destination becomes the presentable half. The draw
            // recorded below follows the compute pass in the same command
            // stream, so its reads observe the step's writes.
            self.buffers.flip();
            self.timer.notify_scheduled();
        }

        self.display
            .record(&mut encoder, &view, self.buffers.active_index());

        self.pending_frame = Some(self.queue.submit(std::iter::once(encoder.finish())));
        frame.present();

        Ok(FrameOutcome::Presented)
    }

    /// Blocks until all submitted device work has retired. Called once
    /// before teardown when exit is requested.
    pub fn wait_idle(&self) {
        let _ = self.device.poll(wgpu::MaintainBase::Wait);
    }
}
