use crate::grid::Grid;
use crate::settings::{self, MAX_DENSITY, MAX_SPEED};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Generations advanced by the multi-step action
pub const MULTI_STEP: usize = 23;

/// Whether generations advance on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

impl RunState {
    pub fn name(&self) -> &'static str {
        match self {
            RunState::Idle => "PAUSED",
            RunState::Running => "RUNNING",
        }
    }
}

/// A Game of Life session: the live grid plus everything needed to advance it
pub struct Simulation {
    grid: Grid,
    state: RunState,
    generation: u64,
    density: u8,
    speed: u32,
    last_advance: Instant,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Create a randomly populated session.
    /// `seed` makes population reproducible; `None` draws from OS entropy.
    pub fn new(width: usize, height: usize, density: u8, speed: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(x) => ChaCha8Rng::seed_from_u64(x),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut sim = Self {
            grid: Grid::new(width, height),
            state: RunState::Idle,
            generation: 0,
            density: density.min(MAX_DENSITY),
            speed: speed.min(MAX_SPEED),
            last_advance: Instant::now(),
            rng,
        };
        sim.grid.populate_randomly(f64::from(sim.density), &mut sim.rng);
        sim
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.grid.population()
    }

    pub fn density(&self) -> u8 {
        self.density
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Current interval between generations while running
    pub fn interval(&self) -> Duration {
        settings::interval_for_speed(self.speed)
    }

    pub fn start(&mut self) {
        if self.state == RunState::Idle {
            self.state = RunState::Running;
            self.last_advance = Instant::now();
        }
    }

    pub fn pause(&mut self) {
        self.state = RunState::Idle;
    }

    pub fn toggle_run(&mut self) {
        match self.state {
            RunState::Idle => self.start(),
            RunState::Running => self.pause(),
        }
    }

    /// Advance one generation, pausing first if running
    pub fn step(&mut self) {
        self.pause();
        self.advance();
    }

    /// Advance `n` generations, pausing first if running
    pub fn step_many(&mut self, n: usize) {
        self.pause();
        for _ in 0..n {
            self.advance();
        }
        debug!(generations = n, generation = self.generation, "multi-step");
    }

    fn advance(&mut self) {
        self.grid = self.grid.next_generation();
        self.generation += 1;
    }

    /// Timer hook for the event loop.
    /// Returns true if a generation was produced.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        if now.saturating_duration_since(self.last_advance) < self.interval() {
            return false;
        }
        self.advance();
        self.last_advance = now;
        true
    }

    /// Pause and start over with a freshly populated grid of the same size
    pub fn reset(&mut self) {
        self.pause();
        self.grid = Grid::new(self.grid.width(), self.grid.height());
        self.grid.populate_randomly(f64::from(self.density), &mut self.rng);
        self.generation = 0;
        info!(
            width = self.grid.width(),
            height = self.grid.height(),
            density = self.density,
            population = self.grid.population(),
            "reset"
        );
    }

    /// Change the density and resample every cell.
    ///
    /// The new grid does not depend on the current generation. Running or
    /// idle state is kept; the generation counter starts over. An unchanged
    /// density leaves the grid alone.
    pub fn set_density(&mut self, density: u8) {
        let density = density.min(MAX_DENSITY);
        if density == self.density {
            return;
        }
        self.density = density;
        self.grid.populate_randomly(f64::from(self.density), &mut self.rng);
        self.generation = 0;
        debug!(density = self.density, population = self.grid.population(), "resampled");
    }

    pub fn adjust_density(&mut self, delta: i32) {
        self.set_density(settings::adjust_density(self.density, delta));
    }

    /// Change the speed. A running session restarts its cadence right away.
    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.min(MAX_SPEED);
        if self.is_running() {
            self.last_advance = Instant::now();
        }
    }

    pub fn adjust_speed(&mut self, delta: i32) {
        self.set_speed(settings::adjust_speed(self.speed, delta));
    }

    /// Flip one cell in place. Returns false if (x, y) is off the grid.
    pub fn toggle_cell(&mut self, x: usize, y: usize) -> bool {
        self.grid.toggle(x, y)
    }

    /// Replace the grid with one of new dimensions, keeping the overlap
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.grid.width() && height == self.grid.height() {
            return;
        }
        debug!(
            from_width = self.grid.width(),
            from_height = self.grid.height(),
            width,
            height,
            "resize"
        );
        self.grid = self.grid.resized(width, height);
    }
}
