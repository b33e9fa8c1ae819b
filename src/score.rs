//! Score, combo and level progression for one run.

use crate::arena::Signal;

const CLEAR_POINTS: u32 = 1000;
const COMBO_POINTS: u32 = 100;
const LEVEL_POINTS: u32 = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u32,
    pub combo: u32,
    /// Index into the level set.
    pub level: usize,
    pub sentences_cleared: u32,
    /// Points from the most recent clear, for the interstitial.
    pub last_award: u32,
}

impl Scoreboard {
    pub fn new(start_level: usize) -> Self {
        Self {
            level: start_level,
            ..Self::default()
        }
    }

    /// Applies an arena signal; returns the points awarded, if any.
    pub fn on_signal(&mut self, signal: Signal) -> Option<u32> {
        match signal {
            Signal::LevelAdvance => {
                let award = CLEAR_POINTS
                    + self.combo * COMBO_POINTS
                    + (self.level as u32 + 1) * LEVEL_POINTS;
                self.score = self.score.saturating_add(award);
                self.combo += 1;
                self.sentences_cleared += 1;
                self.last_award = award;
                Some(award)
            }
            Signal::Rejected => {
                self.combo = 0;
                None
            }
            Signal::Landed(_) | Signal::NotReady | Signal::ArenaFailed => None,
        }
    }

    /// Moves to the next level and resets the combo. Returns false once past the last one.
    pub fn advance(&mut self, level_count: usize) -> bool {
        self.level += 1;
        self.combo = 0;
        self.level < level_count
    }
}
