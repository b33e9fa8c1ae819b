//! Sentrixtui: rebuild sentences from falling fragments in the terminal.

mod app;
mod arena;
mod highscores;
mod input;
mod levels;
mod score;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use arena::{ArenaConfig, Geometry, SourceGroup};
use clap::{Parser, ValueEnum};
use levels::Level;
use ratatui::style::Color;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Options resolved from the CLI and the level set; fixed for the whole run.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub levels: Vec<Level>,
    pub start_level: usize,
    /// Overrides every level's own difficulty when set.
    pub difficulty: Option<Difficulty>,
    pub columns: usize,
    pub tick_ms: u64,
    pub fall_speed: Option<u32>,
    pub spawn_ms: Option<u64>,
    pub seed: u64,
    /// Mix fragments from the other levels into the spawn stream.
    pub decoys: bool,
    pub no_menu: bool,
    pub no_animation: bool,
}

impl GameConfig {
    /// Arena parameters for level `index`. Each level gets its own seed stream.
    pub fn arena_config(&self, index: usize) -> ArenaConfig {
        let level = &self.levels[index.min(self.levels.len() - 1)];
        let (speed, spawn) = levels::pace(self.difficulty.unwrap_or(level.difficulty));
        let groups = self
            .levels
            .iter()
            .enumerate()
            .filter(|(i, _)| self.decoys || *i == index)
            .map(|(id, l)| SourceGroup {
                id,
                fragments: l.fragments.clone(),
            })
            .collect();
        ArenaConfig {
            target: level.fragments.clone(),
            groups,
            fall_speed: self.fall_speed.unwrap_or(speed),
            tick_ms: self.tick_ms,
            spawn_interval_ms: self.spawn_ms.unwrap_or(spawn),
            columns: self.columns,
            geometry: Geometry::default(),
            seed: self.seed.wrapping_add(index as u64),
            ..ArenaConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    match init_logging(args.log_file.as_deref()) {
        Ok(path) => log::info!("sentrixtui {} logging to {}", env!("CARGO_PKG_VERSION"), path.display()),
        Err(e) => eprintln!("warning: logging disabled: {e:#}"),
    }

    let levels = match &args.levels {
        Some(path) => levels::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => levels::builtin(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed {seed}");

    let mut theme = theme::Theme::for_palette(args.palette);
    if let Some(accent) = args.accent {
        theme.div_line = accent;
    }
    let config = GameConfig {
        start_level: args.level.saturating_sub(1).min(levels.len() - 1),
        levels,
        difficulty: args.difficulty,
        columns: args.columns.clamp(1, 24),
        tick_ms: args.tick_ms.max(10),
        fall_speed: args.fall_speed,
        spawn_ms: args.spawn_ms,
        seed,
        decoys: !args.no_decoys,
        no_menu: args.no_menu,
        no_animation: args.no_animation,
    };
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Logs go to a file; the terminal belongs to the game.
fn init_logging(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map_or_else(|| highscores::config_dir().join("sentrixtui.log"), Path::to_path_buf);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = std::fs::File::create(&path).with_context(|| format!("opening {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    Ok(path)
}

fn parse_accent(s: &str) -> Result<Color, theme::ThemeError> {
    theme::parse_hex(s)
}

/// Sentence-reconstruction puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "sentrixtui",
    version,
    about = "Rebuild sentences from falling fragments before the pile reaches the top.",
    long_about = "Sentrixtui drops sentence fragments into the arena. Drag them with the mouse \
        into the slot row at the bottom in the right order, then submit.\n\n\
        A correct sentence clears the row and advances the level; a wrong one flashes red and \
        the fragments fall back onto the pile. If any column piles too high, the game is over.\n\n\
        CONTROLS:\n  Mouse drag   Move a fragment   Enter/Space  Submit\n  \
        Esc          Cancel drag       P            Pause   Q  Quit"
)]
pub struct Args {
    /// JSON level file: {\"levels\":[{\"sentence\",\"fragments\",\"kind\",\"difficulty\"}]}. Built-in levels if not set.
    #[arg(long, value_name = "FILE")]
    pub levels: Option<PathBuf>,

    /// Level to start at (1-based).
    #[arg(short, long, default_value = "1", value_name = "N")]
    pub level: usize,

    /// Force one difficulty for every level instead of each level's own.
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Number of pile columns.
    #[arg(long, default_value = "6", value_name = "N")]
    pub columns: usize,

    /// Descent tick interval in ms.
    #[arg(long, default_value = "50", value_name = "MS")]
    pub tick_ms: u64,

    /// Fall speed in arena units per second (arena is 600 units tall). Overrides difficulty.
    #[arg(long, value_name = "UNITS")]
    pub fall_speed: Option<u32>,

    /// Spawn interval in ms. Overrides difficulty.
    #[arg(long, value_name = "MS")]
    pub spawn_ms: Option<u64>,

    /// RNG seed for reproducible spawns.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only spawn fragments of the current level.
    #[arg(long)]
    pub no_decoys: bool,

    /// Colour palette: normal, high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Border accent colour as #RRGGBB or #RGB.
    #[arg(long, value_name = "HEX", value_parser = parse_accent)]
    pub accent: Option<Color>,

    /// Skip the main menu and start immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Disable clear / reject flash effects.
    #[arg(long)]
    pub no_animation: bool,

    /// Log file. Defaults to sentrixtui.log in the config directory. Level via RUST_LOG.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}
