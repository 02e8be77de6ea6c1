// =============================================================================
// WORLD.RS: the static background grid
//
// A fixed 48 × 64 array of 10 px squares tiling the top-left 640 × 480 of the
// window. Built once at start-up; each frame one cell is picked at random and
// filled.
// =============================================================================

/// Number of grid rows.
pub const GRID_ROWS: usize = 48;
/// Number of grid columns.
pub const GRID_COLS: usize = 64;
/// Edge length of one cell in pixels.
pub const CELL_SIZE: u32 = 10;

/// Axis-aligned rectangle in screen pixels (Y down).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Centre point as `[x, y]`.
    pub fn center(&self) -> [f32; 2] {
        [self.x as f32 + self.w as f32 * 0.5, self.y as f32 + self.h as f32 * 0.5]
    }
}

/// Row-major grid: `grid[row][col]`.
pub type RectGrid = [[Rect; GRID_COLS]; GRID_ROWS];

/// Build the background grid. Cell `(row, col)` has its top-left corner at
/// `(col * CELL_SIZE, row * CELL_SIZE)`.
pub fn create_rect_grid() -> RectGrid {
    let mut grid = [[Rect::default(); GRID_COLS]; GRID_ROWS];
    for (row, cells) in grid.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().enumerate() {
            *cell = Rect::new(
                col as i32 * CELL_SIZE as i32,
                row as i32 * CELL_SIZE as i32,
                CELL_SIZE,
                CELL_SIZE,
            );
        }
    }
    grid
}

// ── CellPicker ────────────────────────────────────────────────────────────────

/// Seeded LCG that picks grid cells. Same seed, same sequence.
#[derive(Clone, Debug)]
pub struct CellPicker {
    state: u64,
}

impl CellPicker {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 33) as u32
    }

    /// Next `(row, col)`, always inside the grid.
    pub fn pick(&mut self) -> (usize, usize) {
        let col = self.next_u32() as usize % GRID_COLS;
        let row = self.next_u32() as usize % GRID_ROWS;
        (row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcg_is_not_stuck() {
        let mut p = CellPicker::new(0);
        let a = p.next_u32();
        let b = p.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn rect_center() {
        assert_eq!(Rect::new(10, 20, 30, 40).center(), [25.0, 40.0]);
    }
}
