//! Descent: fixed-step gravity for falling fragments.

use super::fragment::{FragmentId, FragmentStore, Geometry};

#[derive(Debug, Clone, Copy)]
pub struct DescentSimulator {
    /// Units per tick. Never scaled by wall-clock time.
    step: u32,
    landing_line: u32,
}

impl DescentSimulator {
    /// `fall_speed` in units per second, `tick_ms` the tick interval.
    pub fn new(fall_speed: u32, tick_ms: u64, geometry: &Geometry) -> Self {
        let step = (u64::from(fall_speed) * tick_ms / 1000).max(1) as u32;
        Self {
            step,
            landing_line: geometry.landing_line(),
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Moves every id in `falling` down one step. Ids that reach the landing line are
    /// removed from `falling` and returned in their original order.
    pub fn advance(&self, store: &mut FragmentStore, falling: &mut Vec<FragmentId>) -> Vec<FragmentId> {
        let mut landed = Vec::new();
        falling.retain(|&id| {
            let Some(f) = store.get_mut(id) else {
                return false;
            };
            if !f.state.is_falling() {
                return false;
            }
            f.y = f.y.saturating_add(self.step);
            if f.y >= self.landing_line {
                f.y = self.landing_line;
                landed.push(id);
                false
            } else {
                true
            }
        });
        landed
    }
}
