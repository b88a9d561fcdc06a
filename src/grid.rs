use rand::Rng;
use std::fmt;

/// Moore neighborhood offsets as (dx, dy)
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Fixed-size Game of Life board.
///
/// Cells are stored row-major and addressed as `(x, y)`, where `x` is the
/// column and `y` the row. Dimensions never change for the lifetime of a grid;
/// advancing produces a new grid instead of mutating this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create a grid with every cell dead
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width >= 1 && height >= 1, "grid dimensions must be positive");
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Cell state at (x, y); positions outside the grid read as dead
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && self.cells[self.index(x, y)]
    }

    /// Set a cell; out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.cells[idx] = alive;
        }
    }

    /// Flip a cell in place. Returns false if (x, y) is outside the grid.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = !self.cells[idx];
        true
    }

    /// Number of alive cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// True when no cell is alive
    pub fn is_empty(&self) -> bool {
        !self.cells.contains(&true)
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width)
    }

    /// Resample every cell: alive with probability `percentage / 100`.
    ///
    /// Percentages below 0 leave everything dead and percentages above 100
    /// make everything alive; nothing outside that range is an error.
    pub fn populate_randomly<R: Rng>(&mut self, percentage: f64, rng: &mut R) {
        let threshold = percentage / 100.0;
        for cell in self.cells.iter_mut() {
            *cell = rng.gen::<f64>() < threshold;
        }
    }

    /// Count alive cells in the Moore neighborhood of (x, y).
    ///
    /// The boundary is closed: neighbors past an edge count as dead, so corner
    /// cells have 3 candidates and edge cells 5.
    pub fn count_alive_neighbors(&self, x: usize, y: usize) -> u8 {
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|&&(dx, dy)| {
                match (x.checked_add_signed(dx), y.checked_add_signed(dy)) {
                    (Some(nx), Some(ny)) => self.get(nx, ny),
                    _ => false,
                }
            })
            .count() as u8
    }

    /// Apply the B3/S23 rule to every cell and return the resulting grid
    pub fn next_generation(&self) -> Grid {
        let mut next = Grid::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                next.cells[idx] = next_state(self.cells[idx], self.count_alive_neighbors(x, y));
            }
        }
        next
    }

    /// Copy this grid into a new one of different dimensions.
    /// Cells in the overlapping top-left region are kept, the rest start dead.
    pub fn resized(&self, width: usize, height: usize) -> Grid {
        let mut resized = Grid::new(width, height);
        for y in 0..self.height.min(height) {
            for x in 0..self.width.min(width) {
                resized.set(x, y, self.get(x, y));
            }
        }
        resized
    }
}

/// Game of Life transition for a single cell
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Text form: one line per row, `#` alive and `.` dead
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&alive| if alive { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
