//! GPU-resident double buffer holding the cell state.

use wgpu::util::DeviceExt;

use crate::grid::{Cell, GridDim};

/// Two equally sized device buffers in ping-pong roles plus the index of the
/// half that holds the state presented this frame.
///
/// Exactly one half is readable at any instant; the other is the write
/// target of the next simulation step. The roles swap after each step. The
/// buffers are allocated once from the generated initial grid and are never
/// resized.
pub struct CellDoubleBuffer {
    buffers: [wgpu::Buffer; 2],
    dim: GridDim,
    active: usize,
}

impl CellDoubleBuffer {
    /// Allocates both halves and uploads the initial grid to each of them.
    pub fn new(device: &wgpu::Device, dim: GridDim, cells: &[Cell]) -> Self {
        debug_assert_eq!(cells.len(), dim.cell_count());

        let contents: &[u8] = bytemuck::cast_slice(cells);
        let create = |label| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            })
        };

        Self {
            buffers: [create("Cell Buffer 0"), create("Cell Buffer 1")],
            dim,
            active: 0,
        }
    }

    pub fn dim(&self) -> GridDim {
        self.dim
    }

    /// Index of the half currently holding the presentable state.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Swaps the presentable and write-target roles after a step.
    pub fn flip(&mut self) {
        self.active ^= 1;
    }

    pub fn buffer(&self, index: usize) -> &wgpu::Buffer {
        &self.buffers[index]
    }
}
