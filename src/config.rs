//! Build-time application configuration.
//!
//! Every tunable of the simulation lives here as a constant. Parameter
//! combinations that cannot work are rejected at compile time by the
//! assertions at the bottom of the module.

use std::time::Duration;

use crate::grid::{GenerationStrategy, GridDim, HourglassParams, RandomCirclesParams};

pub const WINDOW_WIDTH: u32 = 1024;
pub const WINDOW_HEIGHT: u32 = 1024;
pub const WINDOW_TITLE: &str = "Sandglass";

pub const GRID_WIDTH: u32 = 1024;
pub const GRID_HEIGHT: u32 = 1024;
pub const GRID_DIM: GridDim = GridDim::new(GRID_WIDTH, GRID_HEIGHT);

/// Must match the `@workgroup_size` attribute in `shaders/sand_update.wgsl`.
pub const COMPUTE_WORKGROUP_SIZE: u32 = 32;
/// Each compute invocation owns one 2x2 block of cells.
pub const CELLS_PER_BLOCK: u32 = 4;

pub const CELL_UPDATE_INTERVAL: Duration = Duration::from_millis(0);
pub const ENABLE_HORIZONTAL_WRAPPING: bool = false;
pub const STUCK_PROBABILITY: f32 = 0.25;

pub const HOURGLASS: HourglassParams = HourglassParams {
    width: 300,
    height: 1000,
    border_width: 4,
    center_width: 4,
    fill_percentage: 0.8,
};

pub const CENTER_CIRCLE_RADIUS: i32 = 250;

pub const RANDOM_CIRCLES: RandomCirclesParams = RandomCirclesParams {
    min_radius: 10,
    max_radius: 100,
    circle_count: 50,
};

pub const RANDOM_NOISE_PARTICLE_COUNT: usize = 1_000_000;

/// The strategy used to build the initial grid at startup.
pub const GENERATION_STRATEGY: GenerationStrategy = GenerationStrategy::Hourglass(HOURGLASS);

pub const SHADER_DIR: &str = "shaders";
pub const UPDATE_SHADER_NAME: &str = "sand_update.wgsl";
pub const DISPLAY_SHADER_NAME: &str = "display.wgsl";

pub const GRID_SIZE: u32 = GRID_WIDTH * GRID_HEIGHT;
pub const DISPATCH_COUNT: u32 = GRID_SIZE / CELLS_PER_BLOCK / COMPUTE_WORKGROUP_SIZE;

const _: () = assert!(GRID_WIDTH >= 2 && GRID_HEIGHT >= 2);
const _: () = assert!(GRID_WIDTH % 2 == 0 && GRID_HEIGHT % 2 == 0);
// The grid byte size is carried in u32 fields on the GPU side.
const _: () = assert!(GRID_SIZE < u32::MAX / 4);
const _: () = assert!((GRID_SIZE / CELLS_PER_BLOCK) % COMPUTE_WORKGROUP_SIZE == 0);

const _: () = assert!(HOURGLASS.width % 2 == 0 && HOURGLASS.height % 2 == 0);
const _: () = assert!(HOURGLASS.center_width >= 2);
const _: () = assert!(GRID_WIDTH >= HOURGLASS.width + 2 * HOURGLASS.border_width);
const _: () = assert!(GRID_WIDTH >= HOURGLASS.center_width + 2 * HOURGLASS.border_width);
const _: () = assert!(GRID_HEIGHT >= HOURGLASS.height);

const _: () = assert!(RANDOM_CIRCLES.min_radius <= RANDOM_CIRCLES.max_radius);
const _: () = assert!(CENTER_CIRCLE_RADIUS >= 0);
