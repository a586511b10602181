//! tetrotui: classic falling-block puzzle game in the terminal.

mod app;
mod board;
mod game;
mod input;
mod random;
mod tetromino;
mod theme;
mod timer;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use random::{PieceSource, UniformSource};
use thiserror::Error;

pub const BOARD_WIDTH: u16 = 10;
pub const BOARD_HEIGHT: u16 = 20;
/// Gravity period at level 1.
pub const INITIAL_SPEED_MS: u64 = 1000;

/// Widest base shape is the I (4 cells); it must fit at column `width / 2 - 1`.
const MIN_WIDTH: u16 = 5;
const MIN_HEIGHT: u16 = 4;
const MAX_SIDE: u16 = 100;
const MIN_SPEED_MS: u64 = 100;

/// Validated options the engine is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub initial_speed_ms: u64,
    pub seed: Option<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board width must be between 5 and 100, got {0}")]
    Width(u16),
    #[error("board height must be between 4 and 100, got {0}")]
    Height(u16),
    #[error("initial speed must be at least 100 ms, got {0}")]
    Speed(u64),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            initial_speed_ms: INITIAL_SPEED_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let config = Self {
            width: args.width,
            height: args.height,
            initial_speed_ms: args.initial_speed_ms,
            seed: args.seed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_WIDTH..=MAX_SIDE).contains(&self.width) {
            return Err(ConfigError::Width(self.width));
        }
        if !(MIN_HEIGHT..=MAX_SIDE).contains(&self.height) {
            return Err(ConfigError::Height(self.height));
        }
        if self.initial_speed_ms < MIN_SPEED_MS {
            return Err(ConfigError::Speed(self.initial_speed_ms));
        }
        Ok(())
    }

    /// Seeded source if a seed was given, otherwise OS entropy.
    pub fn piece_source(&self) -> Box<dyn PieceSource> {
        match self.seed {
            Some(seed) => Box::new(UniformSource::seeded(seed)),
            None => Box::new(UniformSource::from_os_rng()),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = GameConfig::from_args(&args)?;
    let theme = load_theme(&args);
    let mut app = App::new(&config, theme);
    app.run()?;
    Ok(())
}

/// Theme from `--theme`, or the built-in one if the file cannot be used. The warning goes
/// to stderr as well as the log, since raw mode has not started yet and no logger is set.
fn load_theme(args: &Args) -> theme::Theme {
    theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|err| {
        eprintln!("tetrotui: theme not loaded, using defaults: {err}");
        log::warn!("theme not loaded, using defaults: {err}");
        let mut theme = theme::Theme::default();
        theme.apply_palette(args.palette);
        theme
    })
}

/// Classic falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tetrotui",
    version,
    about = "Classic falling-block puzzle in the terminal. Clear full rows to score.",
    long_about = "tetrotui is a terminal falling-block puzzle game.\n\n\
        Steer the falling piece, rotate it and fill complete rows to clear them. \
        Every 1000 points raises the level and speeds up gravity.\n\n\
        CONTROLS:\n  Left/Right  Move    Up        Rotate    Down    Soft drop\n  \
        Space/P     Pause   R/N       New game  Q / Esc Quit\n\n\
        Vim keys h/j/k/l work as arrows."
)]
pub struct Args {
    /// Board width in columns.
    #[arg(long, default_value_t = BOARD_WIDTH, value_name = "COLS")]
    pub width: u16,

    /// Board height in rows.
    #[arg(long, default_value_t = BOARD_HEIGHT, value_name = "ROWS")]
    pub height: u16,

    /// Gravity period at level 1 in milliseconds; each level is 100 ms faster, down to 100 ms.
    #[arg(long, default_value_t = INITIAL_SPEED_MS, value_name = "MS")]
    pub initial_speed_ms: u64,

    /// Seed for the piece sequence (reproducible games).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]="value"). Built-in colours if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["tetrotui"]).unwrap();
        let config = GameConfig::from_args(&args).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(args.palette, Palette::Normal);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "tetrotui",
            "--width",
            "12",
            "--height",
            "24",
            "--initial-speed-ms",
            "800",
            "--seed",
            "9",
            "--palette",
            "contrast",
        ])
        .unwrap();
        let config = GameConfig::from_args(&args).unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.height, 24);
        assert_eq!(config.initial_speed_ms, 800);
        assert_eq!(config.seed, Some(9));
        assert_eq!(args.palette, Palette::HighContrast);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let narrow = GameConfig {
            width: 4,
            ..GameConfig::default()
        };
        assert_eq!(narrow.validate(), Err(ConfigError::Width(4)));
        let short = GameConfig {
            height: 3,
            ..GameConfig::default()
        };
        assert_eq!(short.validate(), Err(ConfigError::Height(3)));
        let fast = GameConfig {
            initial_speed_ms: 50,
            ..GameConfig::default()
        };
        assert_eq!(fast.validate(), Err(ConfigError::Speed(50)));
    }

    #[test]
    fn test_unreadable_theme_falls_back_with_palette() {
        let args = Args::try_parse_from([
            "tetrotui",
            "--theme",
            "/nonexistent/tetrotui.theme",
            "--palette",
            "colorblind",
        ])
        .unwrap();
        let mut expected = theme::Theme::default();
        expected.apply_palette(Palette::Colorblind);
        assert_eq!(load_theme(&args), expected);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::Width(2).to_string(),
            "board width must be between 5 and 100, got 2"
        );
    }
}
