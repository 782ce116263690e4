//! Compute stage: one dispatch advances the automaton by one step.

use crate::config;
use crate::grid::GridDim;
use crate::sim::double_buffer::CellDoubleBuffer;

/// Ephemeral per-dispatch record: which half to read, which to write, and
/// the seed feeding the rule's stochastic behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepRequest {
    pub source: usize,
    pub destination: usize,
    pub seed: u32,
}

impl StepRequest {
    /// Builds the request for a step out of the currently active half.
    pub fn for_active(active: usize, seed: u32) -> Self {
        Self {
            source: active,
            destination: active ^ 1,
            seed,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct StepUniforms {
    grid_width: u32,
    grid_height: u32,
    offset: u32,
    seed: u32,
    stuck_probability: f32,
    wrap_horizontal: u32,
    _pad: [u32; 2],
}

/// Owns the update kernel, its per-direction bindings, and the per-step
/// parameter buffer.
pub struct SimulationCompute {
    pipeline: wgpu::ComputePipeline,
    step_uniforms: wgpu::Buffer,
    // Indexed by source buffer: bind_groups[i] reads half i, writes half 1-i.
    bind_groups: [wgpu::BindGroup; 2],
    dim: GridDim,
    dispatch_count: u32,
}

impl SimulationCompute {
    pub fn new(device: &wgpu::Device, shader_source: &str, buffers: &CellDoubleBuffer) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sand Update Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sand Update Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sand Update Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Sand Update Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let step_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Step Uniforms"),
            size: std::mem::size_of::<StepUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = |source: usize| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Sand Update Bind Group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffers.buffer(source).as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: buffers.buffer(source ^ 1).as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: step_uniforms.as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [bind_group(0), bind_group(1)];

        let dim = buffers.dim();
        let blocks = (dim.width / 2) * (dim.height / 2);
        let dispatch_count = blocks.div_ceil(config::COMPUTE_WORKGROUP_SIZE);

        Self {
            pipeline,
            step_uniforms,
            bind_groups,
            dim,
            dispatch_count,
        }
    }

    /// Records one compute dispatch reading `request.source` and writing
    /// `request.destination` into the frame's command stream.
    ///
    /// The work is asynchronous; nothing may read the destination half until
    /// a later pass in the same command stream, which is where wgpu orders
    /// the compute writes before the reads.
    pub fn record_step(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        request: StepRequest,
    ) {
        debug_assert_ne!(request.source, request.destination);

        let uniforms = StepUniforms {
            grid_width: self.dim.width,
            grid_height: self.dim.height,
            offset: request.source as u32,
            seed: request.seed,
            stuck_probability: config::STUCK_PROBABILITY,
            wrap_horizontal: config::ENABLE_HORIZONTAL_WRAPPING as u32,
            _pad: [0; 2],
        };
        queue.write_buffer(&self.step_uniforms, 0, bytemuck::bytes_of(&uniforms));

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Sand Update Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[request.source], &[]);
        pass.dispatch_workgroups(self.dispatch_count, 1, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_request_alternates_the_halves() {
        let first = StepRequest::for_active(0, 7);
        assert_eq!(first.source, 0);
        assert_eq!(first.destination, 1);

        let second = StepRequest::for_active(first.destination, 8);
        assert_eq!(second.source, 1);
        assert_eq!(second.destination, 0);
    }

    #[test]
    fn active_index_follows_step_parity() {
        // After N completed steps starting at 0, the active half is N mod 2.
        let mut active = 0usize;
        for n in 1..=5 {
            let request = StepRequest::for_active(active, 0);
            active = request.destination;
            assert_eq!(active, n % 2);
        }
    }
}
