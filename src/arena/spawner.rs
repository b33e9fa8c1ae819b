//! Fragment spawner: one new falling fragment per spawn tick.

use super::fragment::{FragmentId, FragmentStore, Geometry};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Fragments of one target sentence; the group index drives colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    pub id: usize,
    pub fragments: Vec<String>,
}

#[derive(Debug)]
pub struct Spawner {
    groups: Vec<SourceGroup>,
    rng: Pcg32,
    margin: f32,
}

impl Spawner {
    pub fn new(groups: Vec<SourceGroup>, seed: u64, geometry: &Geometry) -> Self {
        let groups = groups
            .into_iter()
            .filter(|g| !g.fragments.is_empty())
            .collect();
        Self {
            groups,
            rng: Pcg32::seed_from_u64(seed),
            margin: geometry.margin.clamp(0.0, 49.0),
        }
    }

    /// Inserts a `Falling` fragment at a random x within the margins. `None` if no groups.
    pub fn spawn(&mut self, store: &mut FragmentStore) -> Option<FragmentId> {
        if self.groups.is_empty() {
            return None;
        }
        let group = &self.groups[self.rng.random_range(0..self.groups.len())];
        let text = group.fragments[self.rng.random_range(0..group.fragments.len())].clone();
        let x = self.rng.random_range(self.margin..=100.0 - self.margin);
        let id = store.insert(text, group.id, x);
        log::debug!("spawned fragment {} from group {} at x={x:.1}", id.0, group.id);
        Some(id)
    }
}
