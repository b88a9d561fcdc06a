mod app;
mod config;
mod grid;
mod render;
mod settings;
mod simulation;
mod ui;

use app::{App, Focus};
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use settings::{Background, CellColor, CellStyle, LifeSettings, MAX_DENSITY, MAX_SPEED};
use simulation::Simulation;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "life-simulation")]
#[command(about = "Conway's Game of Life in the terminal")]
struct Args {
    /// Percentage of cells alive after a reset (0-100)
    #[arg(short = 'd', long)]
    density: Option<u8>,

    /// Simulation speed (0-990); generations are 1000 - speed milliseconds apart
    #[arg(short = 's', long)]
    speed: Option<u32>,

    /// Alive cell color (green, cyan, yellow, magenta, orange, red, blue, white)
    #[arg(long = "cell-color")]
    cell_color: Option<String>,

    /// Canvas background (terminal, black, charcoal, navy, forest, plum)
    #[arg(long)]
    background: Option<String>,

    /// Cell style (block, braille)
    #[arg(long)]
    style: Option<String>,

    /// Random seed for reproducible grids
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file to load and save (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write debug logs to this file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Run this many generations without the UI and print the final grid
    #[arg(long)]
    headless: Option<usize>,

    /// Grid width in headless mode
    #[arg(long, default_value = "64")]
    width: usize,

    /// Grid height in headless mode
    #[arg(long, default_value = "32")]
    height: usize,
}

fn parse_cell_color(s: &str) -> CellColor {
    match s.to_lowercase().as_str() {
        "cyan" => CellColor::Cyan,
        "yellow" => CellColor::Yellow,
        "magenta" | "pink" => CellColor::Magenta,
        "orange" => CellColor::Orange,
        "red" => CellColor::Red,
        "blue" => CellColor::Blue,
        "white" => CellColor::White,
        _ => CellColor::Green,
    }
}

fn parse_background(s: &str) -> Background {
    match s.to_lowercase().as_str() {
        "black" => Background::Black,
        "charcoal" | "gray" | "grey" => Background::Charcoal,
        "navy" | "blue" => Background::Navy,
        "forest" | "green" => Background::Forest,
        "plum" | "purple" => Background::Plum,
        _ => Background::Terminal,
    }
}

fn parse_cell_style(s: &str) -> CellStyle {
    match s.to_lowercase().as_str() {
        "braille" | "dots" => CellStyle::Braille,
        _ => CellStyle::Block,
    }
}

/// Send tracing output to a file; the terminal belongs to the UI
fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

/// Settings from the config file (if any), overridden by CLI flags
fn load_settings(args: &Args) -> Result<LifeSettings, String> {
    let mut settings = match &args.config {
        // An explicit config must load
        Some(path) if path.exists() => AppConfig::load_from_file(path)?.settings,
        Some(_) => LifeSettings::default(),
        None => match AppConfig::default_path().filter(|p| p.exists()) {
            Some(path) => match AppConfig::load_from_file(&path) {
                Ok(config) => config.settings,
                Err(err) => {
                    warn!(path = %path.display(), %err, "ignoring unreadable config");
                    LifeSettings::default()
                }
            },
            None => LifeSettings::default(),
        },
    };

    if let Some(density) = args.density {
        settings.density = density.min(MAX_DENSITY);
    }
    if let Some(speed) = args.speed {
        settings.speed = speed.min(MAX_SPEED);
    }
    if let Some(color) = &args.cell_color {
        settings.cell_color = parse_cell_color(color);
    }
    if let Some(background) = &args.background {
        settings.background = parse_background(background);
    }
    if let Some(style) = &args.style {
        settings.cell_style = parse_cell_style(style);
    }
    Ok(settings)
}

fn run_headless(args: &Args, settings: &LifeSettings, generations: usize) {
    let mut sim = Simulation::new(
        args.width.max(1),
        args.height.max(1),
        settings.density,
        settings.speed,
        args.seed,
    );
    sim.step_many(generations);
    print!("{}", sim.grid());
    println!(
        "generation {} population {} ({}x{})",
        sim.generation(),
        sim.population(),
        sim.grid().width(),
        sim.grid().height()
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let settings = load_settings(&args)?;
    info!(?settings, seed = ?args.seed, "starting");

    if let Some(generations) = args.headless {
        run_headless(&args, &settings, generations);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let (canvas_width, canvas_height) =
        ui::get_canvas_size(Rect::new(0, 0, size.width, size.height), false);
    let mut app = App::new(canvas_width, canvas_height, &settings, args.seed);
    app.config_path = args.config.clone();

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Recompute the grid size after the canvas area changed
fn sync_canvas(app: &mut App, width: u16, height: u16) {
    let (canvas_width, canvas_height) =
        ui::get_canvas_size(Rect::new(0, 0, width, height), app.fullscreen_mode);
    app.resize(canvas_width, canvas_height);
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Redraw cadence; generation cadence is the simulation's own interval
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                // Only process Press events
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                        KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                        KeyCode::Char('w') | KeyCode::Char('W') => app.save_config(),

                        // Simulation
                        KeyCode::Char(' ') => app.toggle_run(),
                        KeyCode::Char('n') | KeyCode::Char('N') => app.step(),
                        KeyCode::Char('m') | KeyCode::Char('M') => app.step_many(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                        KeyCode::Enter | KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_at_cursor(),

                        // Parameters
                        KeyCode::Char('+') | KeyCode::Char('=') => {
                            app.increase_speed();
                            app.focus = Focus::Speed;
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            app.decrease_speed();
                            app.focus = Focus::Speed;
                        }
                        KeyCode::Char('[') => {
                            app.adjust_density(-settings::DENSITY_STEP);
                            app.focus = Focus::Density;
                        }
                        KeyCode::Char(']') => {
                            app.adjust_density(settings::DENSITY_STEP);
                            app.focus = Focus::Density;
                        }
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            app.cycle_cell_color();
                            app.focus = Focus::CellColor;
                        }
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            app.cycle_background();
                            app.focus = Focus::Background;
                        }
                        KeyCode::Char('s') | KeyCode::Char('S') => {
                            app.cycle_cell_style();
                            app.focus = Focus::Style;
                        }

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if app.focus.is_param() {
                                app.adjust_focused_up();
                            } else {
                                app.move_cursor(0, -1);
                            }
                        }
                        KeyCode::Down => {
                            if app.focus.is_param() {
                                app.adjust_focused_down();
                            } else {
                                app.move_cursor(0, 1);
                            }
                        }
                        KeyCode::Right => {
                            if app.focus.is_param() {
                                app.adjust_focused_up();
                            } else {
                                app.move_cursor(1, 0);
                            }
                        }
                        KeyCode::Left => {
                            if app.focus.is_param() {
                                app.adjust_focused_down();
                            } else {
                                app.move_cursor(-1, 0);
                            }
                        }
                        KeyCode::PageUp => app.scroll_controls_up(),
                        KeyCode::PageDown => {
                            let term_size = terminal.size()?;
                            let visible = ui::get_controls_visible_lines(term_size.height);
                            app.scroll_controls_down(ui::CONTROLS_CONTENT_LINES.saturating_sub(visible));
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else {
                                app.focus = Focus::Canvas;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                let size = terminal.size()?;
                                let area = Rect::new(0, 0, size.width, size.height);
                                app.scroll_help_down(ui::get_help_max_scroll(area, app.fullscreen_mode));
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left) && !app.show_help {
                        let size = terminal.size()?;
                        let canvas = ui::get_canvas_area(
                            Rect::new(0, 0, size.width, size.height),
                            app.fullscreen_mode,
                        );
                        if app.click(mouse.column, mouse.row, canvas) {
                            app.focus = Focus::Canvas;
                        }
                    }
                }
                Event::Resize(width, height) => sync_canvas(app, width, height),
                _ => {}
            }
        }

        app.tick(Instant::now());
    }
}
