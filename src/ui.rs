use crate::app::{App, Focus};
use crate::render;
use crate::settings;
use crate::simulation::{RunState, MULTI_STEP};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;
const STATUS_HEIGHT: u16 = 6;
const PARAMS_HEIGHT: u16 = 7;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 17;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Inner canvas area (excluding borders) in screen coordinates
pub fn get_canvas_area(frame_area: Rect, fullscreen: bool) -> Rect {
    let left = if fullscreen { 0 } else { SIDEBAR_WIDTH.min(frame_area.width) };
    Rect {
        x: frame_area.x + left + 1,
        y: frame_area.y + 1,
        width: frame_area.width.saturating_sub(left + 2),
        height: frame_area.height.saturating_sub(2),
    }
}

/// Calculate the canvas size (excluding borders)
pub fn get_canvas_size(frame_area: Rect, fullscreen: bool) -> (u16, u16) {
    let canvas = get_canvas_area(frame_area, fullscreen);
    (canvas.width, canvas.height)
}

/// Lines of the controls box visible for a given terminal height
pub fn get_controls_visible_lines(terminal_height: u16) -> u16 {
    terminal_height
        .saturating_sub(STATUS_HEIGHT + PARAMS_HEIGHT)
        .saturating_sub(2)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Length(PARAMS_HEIGHT),
            Constraint::Min(5), // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Game of Life ");
    let sim = &app.simulation;
    let grid = sim.grid();

    let status_color = match sim.state() {
        RunState::Idle => HIGHLIGHT_COLOR,
        RunState::Running => Color::Green,
    };

    let mut content = vec![
        Line::from(Span::styled(
            format!("Gen: {}", sim.generation()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("Alive: {} / {}", sim.population(), grid.width() * grid.height()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(sim.state().name(), Style::default().fg(status_color))),
    ];
    if grid.is_empty() {
        content.push(Line::from(Span::styled(
            "Extinct (R to reseed)",
            Style::default().fg(DIM_TEXT_COLOR),
        )));
    } else if let Some(message) = &app.status_message {
        content.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(DIM_TEXT_COLOR),
        )));
    }

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let sim = &app.simulation;
    let content = vec![
        make_line(
            "Density",
            format!("{}%", sim.density()),
            app.focus == Focus::Density,
        ),
        make_line(
            "Speed",
            format!("{}ms", sim.interval().as_millis()),
            app.focus == Focus::Speed,
        ),
        make_line(
            "Cells",
            app.cell_color.name().to_string(),
            app.focus == Focus::CellColor,
        ),
        make_line(
            "Bg",
            app.background.name().to_string(),
            app.focus == Focus::Background,
        ),
        make_line(
            "Style",
            app.cell_style.name().to_string(),
            app.focus == Focus::Style,
        ),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: String| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let run_label = if app.simulation.is_running() { "pause" } else { "run" };

    let content = vec![
        make_control("Space", run_label.to_string()),
        make_control("N", "next generation".to_string()),
        make_control("M", format!("next {}", MULTI_STEP)),
        make_control("R", "reset".to_string()),
        make_control("Enter", "toggle cell".to_string()),
        make_control("Arrow", "move cursor".to_string()),
        make_control("Click", "toggle cell".to_string()),
        make_control("[/]", "density".to_string()),
        make_control("+/-", "speed".to_string()),
        make_control("C", "cell color".to_string()),
        make_control("B", "background".to_string()),
        make_control("S", "cell style".to_string()),
        make_control("Tab", "parameters".to_string()),
        make_control("V", "hide sidebar".to_string()),
        make_control("W", "save settings".to_string()),
        make_control("H/?", "help".to_string()),
        make_control("Q", "quit".to_string()),
    ];

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);

    let title = if max_scroll > 0 {
        " Controls (PgUp/PgDn) "
    } else {
        " Controls "
    };

    let paragraph = Paragraph::new(content)
        .block(styled_block(title))
        .scroll((app.controls_scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let title = if app.fullscreen_mode {
        format!(" Gen {} · {} ", app.simulation.generation(), app.simulation.state().name())
    } else {
        String::new()
    };
    let block = styled_block(&title);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let palette = app.palette();
    let lines = render::render_lines(
        app.simulation.grid(),
        app.cell_style,
        inner.width,
        inner.height,
        &palette,
        app.visible_cursor(),
    );

    let paragraph = Paragraph::new(lines).style(Style::default().bg(palette.background));
    frame.render_widget(paragraph, inner);
}

const HELP_MAX_WIDTH: u16 = 56;
const HELP_MAX_HEIGHT: u16 = 30;

/// Help dialog rectangle, centered over the canvas
fn help_area(frame_area: Rect, fullscreen: bool) -> Rect {
    let canvas = get_canvas_area(frame_area, fullscreen);
    let width = HELP_MAX_WIDTH.min(canvas.width.saturating_sub(2));
    let height = HELP_MAX_HEIGHT.min(frame_area.height.saturating_sub(4));
    Rect {
        x: canvas.x + canvas.width.saturating_sub(width) / 2,
        y: frame_area.y + frame_area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn help_lines() -> Vec<Line<'static>> {
    let heading = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(HIGHLIGHT_COLOR)));
    let key = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(TEXT_COLOR)));

    vec![
        Line::from(""),
        Line::from(Span::styled("CONWAY'S GAME OF LIFE", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Each generation, a live cell with 2 or 3 live neighbors survives and a dead cell with exactly 3 comes alive. Everything else dies or stays empty. Cells past the edge count as dead."),
        Line::from(""),
        heading("RUNNING:"),
        Line::from(format!(
            "Space=Run/Pause, N=Next generation, M=Next {} generations, R=Reset with a new random grid",
            MULTI_STEP
        )),
        Line::from("Stepping while running pauses first."),
        Line::from(""),
        heading("EDITING:"),
        Line::from("Arrows move the cursor, Enter or T toggles the cell under it. Left click toggles the cell under the mouse."),
        Line::from(""),
        heading("PARAMETERS:"),
        key("[/] - Density"),
        Line::from(format!(
            "Share of live cells (0-{}%). Changing it resamples the whole grid.",
            settings::MAX_DENSITY
        )),
        key("+/- - Speed"),
        Line::from("Delay between generations, 10ms to 1000ms."),
        key("S - Cell Style"),
        Line::from("Block (one cell per two columns) or Braille (8 cells per character)."),
        Line::from(""),
        heading("OTHER:"),
        Line::from("C=Cell color, B=Background, Tab=Parameters, V=Hide sidebar, W=Save settings, Q=Quit"),
        Line::from(""),
    ]
}

/// Rows a line takes once word-wrapped to `width` columns
fn wrapped_rows(line: &Line, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
    let mut rows = 1usize;
    let mut used = 0usize;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        if used > 0 && used + 1 + len <= width {
            used += 1 + len;
            continue;
        }
        if used > 0 {
            rows += 1;
        }
        // Words wider than the dialog spill over whole rows
        rows += (len - 1) / width;
        used = (len - 1) % width + 1;
    }
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn help_scroll_limit(lines: &[Line], dialog: Rect) -> u16 {
    let inner_width = dialog.width.saturating_sub(2);
    let visible = dialog.height.saturating_sub(2);
    lines
        .iter()
        .map(|line| wrapped_rows(line, inner_width))
        .fold(0u16, u16::saturating_add)
        .saturating_sub(visible)
}

/// Furthest the help text scrolls before its last line reaches the bottom border
pub fn get_help_max_scroll(frame_area: Rect, fullscreen: bool) -> u16 {
    help_scroll_limit(&help_lines(), help_area(frame_area, fullscreen))
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let dialog = help_area(area, app.fullscreen_mode);
    let lines = help_lines();
    let max_scroll = help_scroll_limit(&lines, dialog);

    let title = if max_scroll > 0 {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };
    let block = Block::bordered()
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    frame.render_widget(Clear, dialog);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .scroll((app.help_scroll.min(max_scroll), 0)),
        dialog,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LifeSettings;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_canvas_area_with_sidebar() {
        let frame = Rect::new(0, 0, 100, 30);
        assert_eq!(get_canvas_area(frame, false), Rect::new(25, 1, 74, 28));
        assert_eq!(get_canvas_size(frame, true), (98, 28));
    }

    #[test]
    fn test_canvas_area_tiny_terminal() {
        let frame = Rect::new(0, 0, 10, 1);
        let canvas = get_canvas_area(frame, false);
        assert_eq!((canvas.width, canvas.height), (0, 0));
    }

    #[test]
    fn test_render_smoke() {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let (width, height) = get_canvas_size(Rect::new(0, 0, 80, 30), false);
        let mut app = App::new(width, height, &LifeSettings::default(), Some(3));
        app.show_help = true;

        terminal.draw(|frame| render(frame, &app)).unwrap();
        let buffer = terminal.backend().buffer();
        let top_row: String = (0..80u16).map(|x| buffer[(x, 0u16)].symbol()).collect();
        assert!(top_row.contains("Game of Life"));
    }

    #[test]
    fn test_help_area_centered_over_canvas() {
        let frame = Rect::new(0, 0, 100, 30);
        assert_eq!(help_area(frame, false), Rect::new(34, 2, 56, 26));
        assert_eq!(help_area(frame, true), Rect::new(22, 2, 56, 26));

        // Never wider than the canvas
        let narrow = help_area(Rect::new(0, 0, 40, 30), false);
        assert_eq!(narrow.width, 12);
    }

    #[test]
    fn test_wrapped_rows() {
        assert_eq!(wrapped_rows(&Line::from(""), 10), 1);
        assert_eq!(wrapped_rows(&Line::from("aaa bbb ccc"), 7), 2);
        assert_eq!(wrapped_rows(&Line::from("aaa bbb ccc"), 3), 3);
        assert_eq!(wrapped_rows(&Line::from("abcdefgh"), 3), 3);
    }

    #[test]
    fn test_help_scroll_limit() {
        let lines = help_lines();
        assert_eq!(help_scroll_limit(&lines, Rect::new(0, 0, 200, 100)), 0);
        assert!(get_help_max_scroll(Rect::new(0, 0, 100, 12), false) > 0);
    }

    #[test]
    fn test_help_scroll_clamped_when_rendering() {
        let backend = TestBackend::new(80, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        let (width, height) = get_canvas_size(Rect::new(0, 0, 80, 14), false);
        let mut app = App::new(width, height, &LifeSettings::default(), Some(3));
        app.show_help = true;
        app.help_scroll = 500;

        terminal.draw(|frame| render(frame, &app)).unwrap();
        let buffer = terminal.backend().buffer();
        let screen: String = (0..14u16)
            .flat_map(|y| (0..80u16).map(move |x| (x, y)))
            .map(|(x, y)| buffer[(x, y)].symbol().to_string())
            .collect();
        assert!(screen.contains("Q=Quit"));
    }
}
