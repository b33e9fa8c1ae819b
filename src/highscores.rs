//! Best score on disk (XDG config or ~/.config/sentrixtui).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const FILENAME: &str = "best";

/// `$XDG_CONFIG_HOME/sentrixtui`, falling back to `~/.config/sentrixtui`, then `./sentrixtui`.
pub fn config_dir() -> PathBuf {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join("sentrixtui")
}

/// Best score stored in `dir`; 0 when missing or unreadable.
pub fn load_best(dir: &Path) -> u32 {
    let path = dir.join(FILENAME);
    match fs::read_to_string(&path) {
        Ok(s) => s.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring unreadable best score in {}", path.display());
            0
        }),
        Err(_) => 0,
    }
}

pub fn save_best(dir: &Path, score: u32) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(FILENAME);
    fs::write(&path, format!("{score}\n")).with_context(|| format!("writing {}", path.display()))?;
    log::info!("best score {score} saved");
    Ok(())
}
