use crate::config::AppConfig;
use crate::render::{self, Palette};
use crate::settings::{
    Background, CellColor, CellStyle, LifeSettings, DENSITY_STEP, SPEED_STEP,
};
use crate::simulation::{Simulation, MULTI_STEP};
use ratatui::layout::Rect;
use ratatui::style::Color;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

const CURSOR_COLOR: Color = Color::Yellow;

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    /// Arrow keys move the edit cursor on the canvas
    #[default]
    Canvas,
    Density,
    Speed,
    CellColor,
    Background,
    Style,
}

impl Focus {
    /// Tab cycles through parameters in sidebar order
    pub fn next(&self) -> Focus {
        match self {
            Focus::Canvas => Focus::Density,
            Focus::Density => Focus::Speed,
            Focus::Speed => Focus::CellColor,
            Focus::CellColor => Focus::Background,
            Focus::Background => Focus::Style,
            Focus::Style => Focus::Density, // Loop back
        }
    }

    /// Shift+Tab cycles through parameters in reverse order
    pub fn prev(&self) -> Focus {
        match self {
            Focus::Canvas => Focus::Style,
            Focus::Density => Focus::Style, // Loop back
            Focus::Speed => Focus::Density,
            Focus::CellColor => Focus::Speed,
            Focus::Background => Focus::CellColor,
            Focus::Style => Focus::Background,
        }
    }

    /// Check if focus is on a parameter (not the canvas)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::Canvas)
    }
}

/// Main application state
pub struct App {
    pub simulation: Simulation,
    pub cell_color: CellColor,
    pub background: Background,
    pub cell_style: CellStyle,
    pub focus: Focus,
    /// Sidebar hidden
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    /// Edit cursor in grid coordinates
    pub cursor: (usize, usize),
    /// One-line feedback shown in the status box
    pub status_message: Option<String>,
    pub config_path: Option<PathBuf>,
    canvas_size: (u16, u16),
}

impl App {
    pub fn new(canvas_width: u16, canvas_height: u16, settings: &LifeSettings, seed: Option<u64>) -> Self {
        let (grid_width, grid_height) =
            render::calculate_grid_size(settings.cell_style, canvas_width, canvas_height);
        Self {
            simulation: Simulation::new(grid_width, grid_height, settings.density, settings.speed, seed),
            cell_color: settings.cell_color,
            background: settings.background,
            cell_style: settings.cell_style,
            focus: Focus::Canvas,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            cursor: (grid_width / 2, grid_height / 2),
            status_message: None,
            config_path: None,
            canvas_size: (canvas_width, canvas_height),
        }
    }

    /// Advance the running simulation if its interval has elapsed
    pub fn tick(&mut self, now: Instant) -> bool {
        self.simulation.tick(now)
    }

    /// Current settings, for saving
    pub fn settings(&self) -> LifeSettings {
        LifeSettings {
            density: self.simulation.density(),
            speed: self.simulation.speed(),
            cell_color: self.cell_color,
            background: self.background,
            cell_style: self.cell_style,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette {
            alive: self.cell_color.color(),
            background: self.background.color(),
            cursor: CURSOR_COLOR,
        }
    }

    /// Cursor to draw on the canvas; hidden while running
    pub fn visible_cursor(&self) -> Option<(usize, usize)> {
        if self.simulation.is_running() {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::Canvas => {}
            Focus::Density => self.simulation.adjust_density(DENSITY_STEP),
            Focus::Speed => self.simulation.adjust_speed(SPEED_STEP),
            Focus::CellColor => self.cell_color = self.cell_color.next(),
            Focus::Background => self.background = self.background.next(),
            Focus::Style => self.set_cell_style(self.cell_style.next()),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::Canvas => {}
            Focus::Density => self.simulation.adjust_density(-DENSITY_STEP),
            Focus::Speed => self.simulation.adjust_speed(-SPEED_STEP),
            Focus::CellColor => self.cell_color = self.cell_color.prev(),
            Focus::Background => self.background = self.background.prev(),
            Focus::Style => self.set_cell_style(self.cell_style.prev()),
        }
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn toggle_run(&mut self) {
        self.simulation.toggle_run();
    }

    pub fn step(&mut self) {
        self.simulation.step();
    }

    /// Advance the fixed multi-step count
    pub fn step_many(&mut self) {
        self.simulation.step_many(MULTI_STEP);
    }

    pub fn reset(&mut self) {
        self.simulation.reset();
        self.status_message = None;
    }

    pub fn adjust_density(&mut self, delta: i32) {
        self.simulation.adjust_density(delta);
    }

    pub fn increase_speed(&mut self) {
        self.simulation.adjust_speed(SPEED_STEP);
    }

    pub fn decrease_speed(&mut self) {
        self.simulation.adjust_speed(-SPEED_STEP);
    }

    pub fn cycle_cell_color(&mut self) {
        self.cell_color = self.cell_color.next();
    }

    pub fn cycle_background(&mut self) {
        self.background = self.background.next();
    }

    pub fn cycle_cell_style(&mut self) {
        self.set_cell_style(self.cell_style.next());
    }

    /// Switching style changes how many cells fit on the canvas
    fn set_cell_style(&mut self, style: CellStyle) {
        if style == self.cell_style {
            return;
        }
        self.cell_style = style;
        let (width, height) = self.canvas_size;
        self.resize(width, height);
    }

    /// Move the edit cursor, staying on the grid
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let grid = self.simulation.grid();
        let max_x = grid.width() - 1;
        let max_y = grid.height() - 1;
        let (x, y) = self.cursor;
        self.cursor = (
            x.saturating_add_signed(dx).min(max_x),
            y.saturating_add_signed(dy).min(max_y),
        );
    }

    /// Toggle the cell under the edit cursor
    pub fn toggle_at_cursor(&mut self) {
        let (x, y) = self.cursor;
        self.simulation.toggle_cell(x, y);
    }

    /// Toggle the cell under a mouse click.
    /// `canvas` is the inner canvas area in screen coordinates.
    pub fn click(&mut self, column: u16, row: u16, canvas: Rect) -> bool {
        if column < canvas.x
            || row < canvas.y
            || column >= canvas.x + canvas.width
            || row >= canvas.y + canvas.height
        {
            return false;
        }
        let (x, y) = render::canvas_to_grid(self.cell_style, column - canvas.x, row - canvas.y);
        if self.simulation.toggle_cell(x, y) {
            self.cursor = (x, y);
            true
        } else {
            false
        }
    }

    /// Toggle sidebar visibility. The grid keeps its size; the canvas clips it.
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    /// Resize the grid to match a new canvas size
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        self.canvas_size = (canvas_width, canvas_height);
        let (width, height) = render::calculate_grid_size(self.cell_style, canvas_width, canvas_height);
        self.simulation.resize(width, height);
        self.move_cursor(0, 0);
    }

    /// Write current settings to the config file
    pub fn save_config(&mut self) {
        let Some(path) = self.config_path.clone().or_else(AppConfig::default_path) else {
            self.status_message = Some("No config directory".to_string());
            return;
        };
        match AppConfig::new(self.settings()).save_to_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "saved config");
                self.status_message = Some("Settings saved".to_string());
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "config save failed");
                self.status_message = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let settings = LifeSettings {
            density: 0,
            ..LifeSettings::default()
        };
        App::new(40, 20, &settings, Some(7))
    }

    #[test]
    fn test_grid_fills_canvas() {
        let app = app();
        assert_eq!(app.simulation.grid().width(), 20);
        assert_eq!(app.simulation.grid().height(), 20);
        assert_eq!(app.cursor, (10, 10));
    }

    #[test]
    fn test_focus_cycle() {
        let mut app = app();
        app.next_focus();
        assert_eq!(app.focus, Focus::Density);
        app.prev_focus();
        assert_eq!(app.focus, Focus::Style);
        app.next_focus();
        assert_eq!(app.focus, Focus::Density);
        assert!(app.focus.is_param());
        assert!(!Focus::Canvas.is_param());
    }

    #[test]
    fn test_adjust_focused_density_and_speed() {
        let mut app = app();
        app.focus = Focus::Density;
        app.adjust_focused_up();
        assert_eq!(app.simulation.density(), 5);
        app.adjust_focused_down();
        app.adjust_focused_down();
        assert_eq!(app.simulation.density(), 0);

        app.focus = Focus::Speed;
        app.adjust_focused_up();
        assert_eq!(app.simulation.speed(), 910);
    }

    #[test]
    fn test_cursor_stays_on_grid() {
        let mut app = app();
        app.move_cursor(-100, -100);
        assert_eq!(app.cursor, (0, 0));
        app.move_cursor(100, 100);
        assert_eq!(app.cursor, (19, 19));
    }

    #[test]
    fn test_toggle_at_cursor() {
        let mut app = app();
        app.cursor = (3, 4);
        app.toggle_at_cursor();
        assert!(app.simulation.grid().get(3, 4));
        app.toggle_at_cursor();
        assert!(!app.simulation.grid().get(3, 4));
    }

    #[test]
    fn test_click_maps_to_grid() {
        let mut app = app();
        let canvas = Rect::new(10, 1, 40, 20);

        // Column 15 is canvas column 5, which is block cell 2
        assert!(app.click(15, 4, canvas));
        assert!(app.simulation.grid().get(2, 3));
        assert_eq!(app.cursor, (2, 3));

        // Outside the canvas
        assert!(!app.click(5, 4, canvas));
        assert!(!app.click(15, 21, canvas));
        assert_eq!(app.simulation.population(), 1);
    }

    #[test]
    fn test_style_change_resizes_grid() {
        let mut app = app();
        app.cycle_cell_style();
        assert_eq!(app.cell_style, CellStyle::Braille);
        assert_eq!(app.simulation.grid().width(), 80);
        assert_eq!(app.simulation.grid().height(), 80);
    }

    #[test]
    fn test_resize_clamps_cursor() {
        let mut app = app();
        app.cursor = (19, 19);
        app.resize(10, 5);
        assert_eq!(app.simulation.grid().width(), 5);
        assert_eq!(app.cursor, (4, 4));
    }

    #[test]
    fn test_sidebar_toggle_keeps_pattern() {
        let settings = LifeSettings {
            density: 100,
            ..LifeSettings::default()
        };
        let mut app = App::new(98, 28, &settings, Some(7));
        let before = app.simulation.population();
        app.toggle_fullscreen();
        assert!(app.fullscreen_mode);
        app.toggle_fullscreen();
        assert!(!app.fullscreen_mode);
        assert_eq!(app.simulation.population(), before);
        assert_eq!(app.simulation.grid().width(), 49);
        assert_eq!(app.simulation.grid().height(), 28);
    }

    #[test]
    fn test_density_key_at_limit_keeps_edits() {
        let mut app = app();
        app.cursor = (5, 6);
        app.toggle_at_cursor();

        app.adjust_density(-DENSITY_STEP);
        app.focus = Focus::Density;
        app.adjust_focused_down();
        assert_eq!(app.simulation.density(), 0);
        assert_eq!(app.simulation.population(), 1);
        assert!(app.simulation.grid().get(5, 6));
    }

    #[test]
    fn test_settings_snapshot() {
        let mut app = app();
        app.cycle_cell_color();
        app.cycle_background();
        app.increase_speed();
        let settings = app.settings();
        assert_eq!(settings.cell_color, CellColor::Cyan);
        assert_eq!(settings.background, Background::Black);
        assert_eq!(settings.speed, 910);
        assert_eq!(settings.density, 0);
    }

    #[test]
    fn test_save_config_to_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("life.json");
        let mut app = app();
        app.config_path = Some(path.clone());
        app.save_config();
        assert_eq!(app.status_message.as_deref(), Some("Settings saved"));
        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.settings, app.settings());
    }
}
