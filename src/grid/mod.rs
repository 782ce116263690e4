//! Cell grid model and procedural generation.
//!
//! Generation is pure CPU work: each strategy produces a row-major cell
//! array that is later uploaded to both halves of the GPU double buffer.
//! All strategies start from an all-Air grid and end with the edge fix
//! pass, so their output always satisfies the boundary constraint of the
//! update rule.

/// One lattice site. Stored as `u32` to match the storage buffer layout
/// expected by the compute and fragment stages.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::NoUninit)]
pub enum Cell {
    Air = 0,
    Sand = 1,
    Wall = 2,
}

/// Fixed grid dimensions, addressed as `index = y * width + x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDim {
    pub width: u32,
    pub height: u32,
}

impl GridDim {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub const fn byte_size(&self) -> u64 {
        self.cell_count() as u64 * std::mem::size_of::<u32>() as u64
    }

    pub const fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HourglassParams {
    pub width: u32,
    pub height: u32,
    pub border_width: u32,
    pub center_width: u32,
    pub fill_percentage: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct RandomCirclesParams {
    pub min_radius: i32,
    pub max_radius: i32,
    pub circle_count: usize,
}

/// A named generation strategy with its parameters.
#[derive(Clone, Copy, Debug)]
pub enum GenerationStrategy {
    Hourglass(HourglassParams),
    CenterCircle { radius: i32 },
    RandomCircles(RandomCirclesParams),
    RandomNoise { particle_count: usize },
}

impl GenerationStrategy {
    pub fn generate(&self, dim: GridDim) -> Vec<Cell> {
        match self {
            Self::Hourglass(params) => generate_hourglass(dim, params),
            Self::CenterCircle { radius } => generate_center_circle(dim, *radius),
            Self::RandomCircles(params) => generate_random_circles(dim, params),
            Self::RandomNoise { particle_count } => generate_random_noise(dim, *particle_count),
        }
    }
}

// Under double buffering with a Margolus neighborhood, the first row and the
// first column of the second and third rows are only revisited every other
// step; sand left there would spawn new grains without bound. Force those
// cells to Air after any procedural placement.
fn fix_edge_cells(dim: GridDim, grid: &mut [Cell]) {
    let width = dim.width as usize;
    grid[..width].fill(Cell::Air);
    grid[width] = Cell::Air;
    if dim.height > 2 {
        grid[2 * width] = Cell::Air;
    }
}

/// Draws a symmetric hourglass: wall caps at top and bottom, wall sides that
/// narrow toward the center in lock-step, and sand filling the configured
/// fraction of the upper bulb.
///
/// The silhouette is drawn from the center row pair outward, one row pair
/// per iteration, widening the interior from `center_width` by one cell per
/// pair until the full width is reached.
pub fn generate_hourglass(dim: GridDim, params: &HourglassParams) -> Vec<Cell> {
    debug_assert!(dim.height >= params.height);
    debug_assert!(dim.width >= params.width + 2 * params.border_width);
    debug_assert!(params.width % 2 == 0 && params.height % 2 == 0);
    debug_assert!((0.0..=1.0).contains(&params.fill_percentage));

    let mut grid = vec![Cell::Air; dim.cell_count()];

    let start_row = (dim.height - params.height) / 2;
    let end_row = start_row + params.height;
    let half_height = params.height / 2;
    let upper_center_row = start_row + half_height - 1;
    let lower_center_row = start_row + half_height;

    let center_column = dim.width / 2;
    let fill_threshold = start_row + (half_height as f32 * params.fill_percentage) as u32;

    let mut current_width = params.center_width;
    for i in 0..half_height {
        let y_up = upper_center_row - i;
        let y_down = lower_center_row + i;

        let half_width = current_width / 2;
        let interior_start = center_column - half_width;
        let interior_end = center_column + half_width;
        let border_start = interior_start - params.border_width;
        let border_end = interior_end + params.border_width;

        // Cap rows mirror each other: the top cap is reached on exactly the
        // iterations where the bottom cap is.
        let is_cap = y_up < start_row + params.border_width;
        let is_filled = y_up <= fill_threshold;

        for x in border_start..border_end {
            let idx_up = dim.index(x, y_up);
            let idx_down = dim.index(x, y_down);

            let is_border = is_cap || x < interior_start || x >= interior_end;
            if is_border {
                grid[idx_up] = Cell::Wall;
                grid[idx_down] = Cell::Wall;
            } else {
                grid[idx_up] = if is_filled { Cell::Sand } else { Cell::Air };
                grid[idx_down] = Cell::Air;
            }
        }

        current_width = (current_width + 1).min(params.width);
    }

    fix_edge_cells(dim, &mut grid);
    grid
}

fn rasterize_circle(dim: GridDim, grid: &mut [Cell], center_x: i32, center_y: i32, radius: i32) {
    for y in (center_y - radius)..=(center_y + radius) {
        for x in (center_x - radius)..=(center_x + radius) {
            if x < 0 || x >= dim.width as i32 || y < 0 || y >= dim.height as i32 {
                continue;
            }

            let dx = x - center_x;
            let dy = y - center_y;
            if dx * dx + dy * dy < radius * radius {
                grid[dim.index(x as u32, y as u32)] = Cell::Sand;
            }
        }
    }
}

/// A single sand circle in the middle of the grid.
pub fn generate_center_circle(dim: GridDim, radius: i32) -> Vec<Cell> {
    let mut grid = vec![Cell::Air; dim.cell_count()];

    rasterize_circle(
        dim,
        &mut grid,
        dim.width as i32 / 2,
        dim.height as i32 / 2,
        radius,
    );

    fix_edge_cells(dim, &mut grid);
    grid
}

/// Sand circles with independently sampled centers and radii. Later circles
/// overwrite earlier ones; circles may extend past the grid and are clipped.
pub fn generate_random_circles(dim: GridDim, params: &RandomCirclesParams) -> Vec<Cell> {
    use rand::Rng;

    let mut grid = vec![Cell::Air; dim.cell_count()];
    let mut rng = rand::rng();

    for _ in 0..params.circle_count {
        let center_x = rng.random_range(0..=dim.width as i32);
        let center_y = rng.random_range(0..=dim.height as i32);
        let radius = rng.random_range(params.min_radius..=params.max_radius);

        rasterize_circle(dim, &mut grid, center_x, center_y, radius);
    }

    fix_edge_cells(dim, &mut grid);
    grid
}

/// Individual sand grains at uniformly sampled indices. Duplicate indices
/// simply overwrite.
pub fn generate_random_noise(dim: GridDim, particle_count: usize) -> Vec<Cell> {
    use rand::Rng;

    let mut grid = vec![Cell::Air; dim.cell_count()];
    let mut rng = rand::rng();

    for _ in 0..particle_count {
        let idx = rng.random_range(0..grid.len());
        grid[idx] = Cell::Sand;
    }

    fix_edge_cells(dim, &mut grid);
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIM: GridDim = GridDim::new(8, 8);

    fn assert_edge_cells_are_air(dim: GridDim, grid: &[Cell]) {
        let width = dim.width as usize;
        for x in 0..width {
            assert_eq!(grid[x], Cell::Air, "first row must stay Air (x = {x})");
        }
        assert_eq!(grid[width], Cell::Air);
        if dim.height > 2 {
            assert_eq!(grid[2 * width], Cell::Air);
        }
    }

    #[test]
    fn generators_fill_the_whole_grid() {
        let strategies = [
            GenerationStrategy::Hourglass(HourglassParams {
                width: 4,
                height: 6,
                border_width: 1,
                center_width: 2,
                fill_percentage: 1.0,
            }),
            GenerationStrategy::CenterCircle { radius: 2 },
            GenerationStrategy::RandomCircles(RandomCirclesParams {
                min_radius: 1,
                max_radius: 3,
                circle_count: 5,
            }),
            GenerationStrategy::RandomNoise { particle_count: 16 },
        ];

        for strategy in &strategies {
            let grid = strategy.generate(DIM);
            assert_eq!(grid.len(), DIM.cell_count());
            assert_edge_cells_are_air(DIM, &grid);
        }
    }

    #[test]
    fn center_circle_sets_exactly_the_inclusion_set() {
        let grid = generate_center_circle(DIM, 2);

        for y in 0..8i32 {
            for x in 0..8i32 {
                let dx = x - 4;
                let dy = y - 4;
                let inside = dx * dx + dy * dy < 4;
                // Row 0 and the first cell of row 1 are cleared by the edge
                // fix even if the circle covered them.
                let forced_air = y == 0 || (y == 1 && x == 0) || (y == 2 && x == 0);
                let expected = if inside && !forced_air {
                    Cell::Sand
                } else {
                    Cell::Air
                };
                assert_eq!(grid[DIM.index(x as u32, y as u32)], expected, "at ({x},{y})");
            }
        }
    }

    #[test]
    fn circle_touching_the_origin_is_clipped_and_edge_fixed() {
        let mut grid = vec![Cell::Air; DIM.cell_count()];
        rasterize_circle(DIM, &mut grid, 0, 0, 2);

        // Out-of-bounds points were skipped without touching anything.
        assert_eq!(grid[DIM.index(0, 0)], Cell::Sand);
        assert_eq!(grid[DIM.index(1, 1)], Cell::Sand);
        assert_eq!(grid[DIM.index(2, 2)], Cell::Air);

        fix_edge_cells(DIM, &mut grid);
        assert_eq!(grid[DIM.index(0, 0)], Cell::Air);
        assert_eq!(grid[DIM.index(1, 0)], Cell::Air);
        assert_eq!(grid[DIM.index(0, 1)], Cell::Air);
        assert_eq!(grid[DIM.index(1, 1)], Cell::Sand);
    }

    #[test]
    fn hourglass_is_mirror_symmetric() {
        let dim = GridDim::new(16, 16);
        let grid = generate_hourglass(
            dim,
            &HourglassParams {
                width: 8,
                height: 12,
                border_width: 2,
                center_width: 2,
                fill_percentage: 0.5,
            },
        );

        for y in 0..dim.height {
            for x in 0..dim.width {
                let mirrored = dim.width - 1 - x;
                assert_eq!(
                    grid[dim.index(x, y)],
                    grid[dim.index(mirrored, y)],
                    "asymmetry at ({x},{y})"
                );
            }
        }
    }

    #[test]
    fn hourglass_border_walls_match_top_and_bottom() {
        let dim = GridDim::new(16, 16);
        let params = HourglassParams {
            width: 8,
            height: 12,
            border_width: 2,
            center_width: 2,
            fill_percentage: 0.5,
        };
        let grid = generate_hourglass(dim, &params);

        let start_row = (dim.height - params.height) / 2;
        let end_row = start_row + params.height;

        let wall_count = |rows: std::ops::Range<u32>| {
            rows.flat_map(|y| (0..dim.width).map(move |x| (x, y)))
                .filter(|&(x, y)| grid[dim.index(x, y)] == Cell::Wall)
                .count()
        };

        let top = wall_count(start_row..start_row + params.border_width);
        let bottom = wall_count(end_row - params.border_width..end_row);
        assert!(top > 0);
        assert_eq!(top, bottom);
    }

    #[test]
    fn hourglass_without_border_still_satisfies_the_edge_constraint() {
        let dim = GridDim::new(8, 8);
        let grid = generate_hourglass(
            dim,
            &HourglassParams {
                width: 8,
                height: 8,
                border_width: 0,
                center_width: 2,
                fill_percentage: 1.0,
            },
        );

        assert_edge_cells_are_air(dim, &grid);
    }

    #[test]
    fn noise_places_only_air_and_sand() {
        let grid = generate_random_noise(DIM, 32);
        assert!(grid.iter().all(|&c| c == Cell::Air || c == Cell::Sand));
    }

    #[test]
    fn cells_cast_to_their_wire_values() {
        let cells = [Cell::Air, Cell::Sand, Cell::Wall];
        let words: &[u32] = bytemuck::cast_slice(&cells);
        assert_eq!(words, &[0, 1, 2]);
    }
}
