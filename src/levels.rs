//! Level set: sentences, their fragment decomposition, and difficulty parameters.

use crate::Difficulty;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid level file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level file has no levels")]
    Empty,
    #[error("level {index}: fragments do not join into the sentence {sentence:?}")]
    Mismatch { index: usize, sentence: String },
    #[error("level {index}: empty fragment")]
    EmptyFragment { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Level {
    pub sentence: String,
    pub fragments: Vec<String>,
    /// Sentence-type label shown in the header.
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    levels: Vec<Level>,
}

/// Fall speed (units/s) and spawn interval (ms) for a difficulty.
pub fn pace(difficulty: Difficulty) -> (u32, u64) {
    match difficulty {
        Difficulty::Easy => (60, 4000),
        Difficulty::Medium => (80, 3200),
        Difficulty::Hard => (100, 2500),
    }
}

fn level(sentence: &str, fragments: &[&str], kind: &str, difficulty: Difficulty) -> Level {
    Level {
        sentence: sentence.to_string(),
        fragments: fragments.iter().map(|f| (*f).to_string()).collect(),
        kind: kind.to_string(),
        difficulty,
    }
}

/// Compound-sentence drills shipped with the game.
pub fn builtin() -> Vec<Level> {
    vec![
        level(
            "雖然今天下著大雨，但是他依然準時上學。",
            &["雖然", "今天下著大雨，", "但是", "他依然", "準時上學。"],
            "轉折複句",
            Difficulty::Easy,
        ),
        level(
            "與其在家無所事事，不如到圖書館看書。",
            &["與其", "在家無所事事，", "不如", "到圖書館看書。"],
            "選擇複句",
            Difficulty::Easy,
        ),
        level(
            "他不但學習成績優秀，而且樂於助人。",
            &["他不但", "學習成績優秀，", "而且", "樂於助人。"],
            "遞進複句",
            Difficulty::Hard,
        ),
    ]
}

/// Reads `{"levels": [...]}` from a JSON file and checks every level.
pub fn load(path: &Path) -> Result<Vec<Level>, LevelError> {
    let s = std::fs::read_to_string(path)?;
    let levels = parse(&s)?;
    log::info!("loaded {} levels from {}", levels.len(), path.display());
    Ok(levels)
}

fn parse(s: &str) -> Result<Vec<Level>, LevelError> {
    let file: LevelFile = serde_json::from_str(s)?;
    validate(&file.levels)?;
    Ok(file.levels)
}

pub fn validate(levels: &[Level]) -> Result<(), LevelError> {
    if levels.is_empty() {
        return Err(LevelError::Empty);
    }
    for (index, l) in levels.iter().enumerate() {
        if l.fragments.is_empty() || l.fragments.iter().any(String::is_empty) {
            return Err(LevelError::EmptyFragment { index });
        }
        if l.fragments.concat() != l.sentence {
            return Err(LevelError::Mismatch {
                index,
                sentence: l.sentence.clone(),
            });
        }
    }
    Ok(())
}
