//! Loss monitor: fires once when any column stacks past the threshold.

use super::fragment::Geometry;
use super::pile::Pile;

#[derive(Debug, Clone)]
pub struct LossMonitor {
    threshold: u32,
    fired: bool,
}

impl LossMonitor {
    /// Threshold is `ratio` of the stacking room between floor and spawn line.
    pub fn new(ratio: f32, geometry: &Geometry) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        Self {
            threshold: (geometry.height as f32 * ratio) as u32,
            fired: false,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    #[cfg(test)]
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// True only on the first check that sees a column above the threshold.
    pub fn check(&mut self, pile: &Pile) -> bool {
        if self.fired {
            return false;
        }
        if pile.max_height() > self.threshold {
            self.fired = true;
            return true;
        }
        false
    }
}
