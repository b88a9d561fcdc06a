use crate::grid::Grid;
use crate::settings::CellStyle;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

const BLOCK_ALIVE: &str = "██";
const BLOCK_DEAD: &str = "  ";
const BLOCK_CURSOR: &str = "[]";

/// Colors used to paint the canvas
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub alive: Color,
    pub background: Color,
    pub cursor: Color,
}

/// Grid dimensions that fill a canvas of the given size (in terminal cells)
pub fn calculate_grid_size(style: CellStyle, canvas_width: u16, canvas_height: u16) -> (usize, usize) {
    let (width, height) = match style {
        CellStyle::Block => (canvas_width as usize / 2, canvas_height as usize),
        CellStyle::Braille => (canvas_width as usize * 2, canvas_height as usize * 4),
    };
    (width.max(1), height.max(1))
}

/// Grid cell under a canvas-relative terminal position.
/// For Braille this is the top-left dot of the character.
pub fn canvas_to_grid(style: CellStyle, column: u16, row: u16) -> (usize, usize) {
    match style {
        CellStyle::Block => (column as usize / 2, row as usize),
        CellStyle::Braille => (column as usize * 2, row as usize * 4),
    }
}

/// Canvas-relative terminal position that draws grid cell (x, y)
pub fn grid_to_canvas(style: CellStyle, x: usize, y: usize) -> (usize, usize) {
    match style {
        CellStyle::Block => (x * 2, y),
        CellStyle::Braille => (x / 2, y / 4),
    }
}

/// Accumulates styled text for one canvas row, merging runs of equal style
struct RowBuilder {
    runs: Vec<(String, Style)>,
}

impl RowBuilder {
    fn new() -> Self {
        Self { runs: Vec::new() }
    }

    fn push(&mut self, text: &str, style: Style) {
        match self.runs.last_mut() {
            Some((run, run_style)) if *run_style == style => run.push_str(text),
            _ => self.runs.push((text.to_string(), style)),
        }
    }

    fn into_line(self) -> Line<'static> {
        Line::from(
            self.runs
                .into_iter()
                .map(|(text, style)| Span::styled(text, style))
                .collect::<Vec<_>>(),
        )
    }
}

/// Render the grid into canvas lines, clipped to the canvas size
pub fn render_lines(
    grid: &Grid,
    style: CellStyle,
    canvas_width: u16,
    canvas_height: u16,
    palette: &Palette,
    cursor: Option<(usize, usize)>,
) -> Vec<Line<'static>> {
    match style {
        CellStyle::Block => render_blocks(grid, canvas_width, canvas_height, palette, cursor),
        CellStyle::Braille => render_braille(grid, canvas_width, canvas_height, palette, cursor),
    }
}

fn render_blocks(
    grid: &Grid,
    canvas_width: u16,
    canvas_height: u16,
    palette: &Palette,
    cursor: Option<(usize, usize)>,
) -> Vec<Line<'static>> {
    let rows = grid.height().min(canvas_height as usize);
    let cols = grid.width().min(canvas_width as usize / 2);
    let alive_style = Style::default().fg(palette.alive).bg(palette.background);
    let dead_style = Style::default().bg(palette.background);

    let mut lines = Vec::with_capacity(rows);
    for y in 0..rows {
        let mut row = RowBuilder::new();
        for x in 0..cols {
            let alive = grid.get(x, y);
            if cursor == Some((x, y)) {
                let bg = if alive { palette.alive } else { palette.background };
                row.push(BLOCK_CURSOR, Style::default().fg(palette.cursor).bg(bg));
            } else if alive {
                row.push(BLOCK_ALIVE, alive_style);
            } else {
                row.push(BLOCK_DEAD, dead_style);
            }
        }
        lines.push(row.into_line());
    }
    lines
}

fn render_braille(
    grid: &Grid,
    canvas_width: u16,
    canvas_height: u16,
    palette: &Palette,
    cursor: Option<(usize, usize)>,
) -> Vec<Line<'static>> {
    let rows = grid.height().div_ceil(4).min(canvas_height as usize);
    let cols = grid.width().div_ceil(2).min(canvas_width as usize);
    let cursor_char = cursor.map(|(x, y)| grid_to_canvas(CellStyle::Braille, x, y));
    let normal = Style::default().fg(palette.alive).bg(palette.background);
    let highlighted = Style::default().fg(palette.alive).bg(palette.cursor);

    let mut lines = Vec::with_capacity(rows);
    for cy in 0..rows {
        let mut row = RowBuilder::new();
        for cx in 0..cols {
            let mut pattern: u8 = 0;
            let base_x = cx * 2;
            let base_y = cy * 4;
            for (dx, column) in BRAILLE_DOTS.iter().enumerate() {
                for (dy, bit) in column.iter().enumerate() {
                    if grid.get(base_x + dx, base_y + dy) {
                        pattern |= bit;
                    }
                }
            }

            let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
            let style = if cursor_char == Some((cx, cy)) { highlighted } else { normal };
            let mut buf = [0u8; 4];
            row.push(braille_char.encode_utf8(&mut buf), style);
        }
        lines.push(row.into_line());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALETTE: Palette = Palette {
        alive: Color::Green,
        background: Color::Black,
        cursor: Color::Yellow,
    };

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_braille_pattern() {
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_grid_size_for_canvas() {
        assert_eq!(calculate_grid_size(CellStyle::Block, 80, 24), (40, 24));
        assert_eq!(calculate_grid_size(CellStyle::Braille, 80, 24), (160, 96));
        assert_eq!(calculate_grid_size(CellStyle::Block, 1, 0), (1, 1));
    }

    #[test]
    fn test_canvas_grid_mapping() {
        assert_eq!(canvas_to_grid(CellStyle::Block, 7, 3), (3, 3));
        assert_eq!(canvas_to_grid(CellStyle::Braille, 7, 3), (14, 12));
        assert_eq!(grid_to_canvas(CellStyle::Block, 3, 3), (6, 3));
        assert_eq!(grid_to_canvas(CellStyle::Braille, 15, 13), (7, 3));
    }

    #[test]
    fn test_full_braille_char() {
        let mut grid = Grid::new(2, 4);
        for y in 0..4 {
            for x in 0..2 {
                grid.set(x, y, true);
            }
        }
        let lines = render_lines(&grid, CellStyle::Braille, 10, 10, &PALETTE, None);
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "\u{28FF}");
    }

    #[test]
    fn test_braille_partial_cells() {
        let mut grid = Grid::new(3, 5);
        grid.set(0, 0, true);
        grid.set(2, 4, true);
        let lines = render_lines(&grid, CellStyle::Braille, 10, 10, &PALETTE, None);
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines[0]), "\u{2801}\u{2800}");
        assert_eq!(text(&lines[1]), "\u{2800}\u{2801}");
    }

    #[test]
    fn test_block_rows() {
        let mut grid = Grid::new(3, 2);
        grid.set(1, 0, true);
        let lines = render_lines(&grid, CellStyle::Block, 6, 2, &PALETTE, None);
        assert_eq!(text(&lines[0]), "  ██  ");
        assert_eq!(text(&lines[1]), "      ");
    }

    #[test]
    fn test_block_cursor_and_clipping() {
        let grid = Grid::new(10, 10);
        let lines = render_lines(&grid, CellStyle::Block, 4, 3, &PALETTE, Some((1, 2)));
        assert_eq!(lines.len(), 3);
        assert_eq!(text(&lines[2]), "  []");
    }
}
