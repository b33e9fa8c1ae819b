//! Fragment records, the id-addressed record store, and arena geometry.

use std::collections::BTreeMap;

/// Stable handle for a fragment. Containers hold these, never copies of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FragmentId(pub u32);

/// Where a fragment was picked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Column(usize),
    Slot(usize),
}

/// Lifecycle state. `Held` only exists between a pick-up and its release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentState {
    Falling,
    Piled { column: usize, offset: u32 },
    Slotted { slot: usize },
    Held { origin: Origin },
}

impl FragmentState {
    pub fn is_falling(&self) -> bool {
        matches!(self, Self::Falling)
    }

    #[cfg(test)]
    pub fn is_piled(&self) -> bool {
        matches!(self, Self::Piled { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub id: FragmentId,
    pub text: String,
    /// Source group (level index); drives colour.
    pub group: usize,
    pub state: FragmentState,
    /// Horizontal centre, percent of arena width. Fixed at spawn.
    pub x: f32,
    /// Top edge in arena units, 0 at the spawn line.
    pub y: u32,
}

/// Point in arena space: `x` in percent of width, `y` in units from the spawn line.
/// Values past `Geometry::height` fall in the slot band below the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Fixed dimensions of one arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Distance from the spawn line down to the floor.
    pub height: u32,
    pub fragment_height: u32,
    /// Height of the slot band directly under the floor.
    pub slot_band: u32,
    /// Spawn margin on each side, percent of width.
    pub margin: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            height: 600,
            fragment_height: 60,
            slot_band: 60,
            margin: 10.0,
        }
    }
}

impl Geometry {
    /// Vertical coordinate at which a falling fragment is considered landed.
    pub fn landing_line(&self) -> u32 {
        self.height.saturating_sub(self.fragment_height)
    }

    pub fn in_slot_band(&self, point: Point) -> bool {
        let top = self.height as f32;
        point.y >= top && point.y < top + self.slot_band as f32
    }

    /// Top edge of a piled fragment whose stack offset is `offset`.
    pub fn piled_top(&self, offset: u32) -> u32 {
        self.height
            .saturating_sub(offset)
            .saturating_sub(self.fragment_height)
    }
}

/// Owns every live fragment record. Ids are never reused within one arena.
#[derive(Debug, Default)]
pub struct FragmentStore {
    records: BTreeMap<FragmentId, Fragment>,
    next_id: u32,
}

impl FragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, text: String, group: usize, x: f32) -> FragmentId {
        let id = FragmentId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.records.insert(
            id,
            Fragment {
                id,
                text,
                group,
                state: FragmentState::Falling,
                x,
                y: 0,
            },
        );
        id
    }

    pub fn get(&self, id: FragmentId) -> Option<&Fragment> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: FragmentId) -> Option<&mut Fragment> {
        self.records.get_mut(&id)
    }

    pub fn remove(&mut self, id: FragmentId) -> Option<Fragment> {
        self.records.remove(&id)
    }

    pub fn set_state(&mut self, id: FragmentId, state: FragmentState) {
        if let Some(f) = self.records.get_mut(&id) {
            f.state = state;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
