use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Initial share of alive cells, in percent
pub const DEFAULT_DENSITY: u8 = 30;
pub const MAX_DENSITY: u8 = 100;
pub const DENSITY_STEP: i32 = 5;

/// Speed slider: the generation interval is `1000 - speed` milliseconds
pub const DEFAULT_SPEED: u32 = 900;
pub const MAX_SPEED: u32 = 990;
pub const SPEED_STEP: i32 = 10;
const SLOWEST_INTERVAL_MS: u32 = 1000;

/// Interval between generations while running
pub fn interval_for_speed(speed: u32) -> Duration {
    let speed = speed.min(MAX_SPEED);
    Duration::from_millis(u64::from(SLOWEST_INTERVAL_MS - speed))
}

/// Color of alive cells
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CellColor {
    #[default]
    Green,
    Cyan,
    Yellow,
    Magenta,
    Orange,
    Red,
    Blue,
    White,
}

impl CellColor {
    pub fn name(&self) -> &str {
        match self {
            CellColor::Green => "Green",
            CellColor::Cyan => "Cyan",
            CellColor::Yellow => "Yellow",
            CellColor::Magenta => "Magenta",
            CellColor::Orange => "Orange",
            CellColor::Red => "Red",
            CellColor::Blue => "Blue",
            CellColor::White => "White",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            CellColor::Green => CellColor::Cyan,
            CellColor::Cyan => CellColor::Yellow,
            CellColor::Yellow => CellColor::Magenta,
            CellColor::Magenta => CellColor::Orange,
            CellColor::Orange => CellColor::Red,
            CellColor::Red => CellColor::Blue,
            CellColor::Blue => CellColor::White,
            CellColor::White => CellColor::Green,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            CellColor::Green => CellColor::White,
            CellColor::Cyan => CellColor::Green,
            CellColor::Yellow => CellColor::Cyan,
            CellColor::Magenta => CellColor::Yellow,
            CellColor::Orange => CellColor::Magenta,
            CellColor::Red => CellColor::Orange,
            CellColor::Blue => CellColor::Red,
            CellColor::White => CellColor::Blue,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            CellColor::Green => Color::Rgb(80, 220, 100),
            CellColor::Cyan => Color::Rgb(0, 200, 220),
            CellColor::Yellow => Color::Rgb(240, 220, 60),
            CellColor::Magenta => Color::Rgb(220, 80, 220),
            CellColor::Orange => Color::Rgb(255, 150, 40),
            CellColor::Red => Color::Rgb(230, 60, 60),
            CellColor::Blue => Color::Rgb(70, 120, 240),
            CellColor::White => Color::Rgb(240, 240, 240),
        }
    }
}

/// Canvas background
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Background {
    /// Leave the terminal's own background
    #[default]
    Terminal,
    Black,
    Charcoal,
    Navy,
    Forest,
    Plum,
}

impl Background {
    pub fn name(&self) -> &str {
        match self {
            Background::Terminal => "Terminal",
            Background::Black => "Black",
            Background::Charcoal => "Charcoal",
            Background::Navy => "Navy",
            Background::Forest => "Forest",
            Background::Plum => "Plum",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Background::Terminal => Background::Black,
            Background::Black => Background::Charcoal,
            Background::Charcoal => Background::Navy,
            Background::Navy => Background::Forest,
            Background::Forest => Background::Plum,
            Background::Plum => Background::Terminal,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Background::Terminal => Background::Plum,
            Background::Black => Background::Terminal,
            Background::Charcoal => Background::Black,
            Background::Navy => Background::Charcoal,
            Background::Forest => Background::Navy,
            Background::Plum => Background::Forest,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Background::Terminal => Color::Reset,
            Background::Black => Color::Rgb(0, 0, 0),
            Background::Charcoal => Color::Rgb(36, 36, 40),
            Background::Navy => Color::Rgb(10, 20, 60),
            Background::Forest => Color::Rgb(12, 40, 20),
            Background::Plum => Color::Rgb(45, 15, 45),
        }
    }
}

/// How grid cells map onto terminal characters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CellStyle {
    /// One cell per two terminal columns ("██")
    #[default]
    Block,
    /// 2x4 cells packed into one Braille character
    Braille,
}

impl CellStyle {
    pub fn name(&self) -> &str {
        match self {
            CellStyle::Block => "Block",
            CellStyle::Braille => "Braille",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            CellStyle::Block => CellStyle::Braille,
            CellStyle::Braille => CellStyle::Block,
        }
    }

    pub fn prev(&self) -> Self {
        self.next()
    }
}

/// User-adjustable settings, as stored in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeSettings {
    /// Share of cells alive after a reset (0-100)
    pub density: u8,
    /// Speed slider (0-990)
    pub speed: u32,
    pub cell_color: CellColor,
    pub background: Background,
    pub cell_style: CellStyle,
}

impl Default for LifeSettings {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            speed: DEFAULT_SPEED,
            cell_color: CellColor::default(),
            background: Background::default(),
            cell_style: CellStyle::default(),
        }
    }
}

impl LifeSettings {
    /// Pull hand-edited values back into range
    pub fn clamped(mut self) -> Self {
        self.density = self.density.min(MAX_DENSITY);
        self.speed = self.speed.min(MAX_SPEED);
        self
    }
}

/// Add a signed delta to the density, staying within 0-100
pub fn adjust_density(density: u8, delta: i32) -> u8 {
    (i32::from(density) + delta).clamp(0, i32::from(MAX_DENSITY)) as u8
}

/// Add a signed delta to the speed, staying within 0-990
pub fn adjust_speed(speed: u32, delta: i32) -> u32 {
    (i64::from(speed) + i64::from(delta)).clamp(0, i64::from(MAX_SPEED)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_formula() {
        assert_eq!(interval_for_speed(0), Duration::from_millis(1000));
        assert_eq!(interval_for_speed(DEFAULT_SPEED), Duration::from_millis(100));
        assert_eq!(interval_for_speed(MAX_SPEED), Duration::from_millis(10));
        // Never reaches a zero interval
        assert_eq!(interval_for_speed(5000), Duration::from_millis(10));
    }

    #[test]
    fn test_adjust_density_clamps() {
        assert_eq!(adjust_density(30, DENSITY_STEP), 35);
        assert_eq!(adjust_density(98, DENSITY_STEP), 100);
        assert_eq!(adjust_density(3, -DENSITY_STEP), 0);
    }

    #[test]
    fn test_adjust_speed_clamps() {
        assert_eq!(adjust_speed(900, SPEED_STEP), 910);
        assert_eq!(adjust_speed(985, SPEED_STEP), 990);
        assert_eq!(adjust_speed(5, -SPEED_STEP), 0);
    }

    #[test]
    fn test_cycles_return_to_start() {
        let mut color = CellColor::default();
        for _ in 0..8 {
            color = color.next();
        }
        assert_eq!(color, CellColor::default());
        assert_eq!(CellColor::Green.prev().next(), CellColor::Green);

        let mut background = Background::default();
        for _ in 0..6 {
            background = background.next();
        }
        assert_eq!(background, Background::default());
        assert_eq!(Background::Navy.next().prev(), Background::Navy);

        assert_eq!(CellStyle::Block.next(), CellStyle::Braille);
        assert_eq!(CellStyle::Braille.prev(), CellStyle::Block);
    }

    #[test]
    fn test_clamped_settings() {
        let settings = LifeSettings {
            density: 250,
            speed: 4000,
            ..LifeSettings::default()
        }
        .clamped();
        assert_eq!(settings.density, 100);
        assert_eq!(settings.speed, 990);
    }
}
