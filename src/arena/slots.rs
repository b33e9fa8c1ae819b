//! Slot Sequence: the ordered row of target positions under the floor.

use super::fragment::FragmentId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSequence {
    slots: Vec<Option<FragmentId>>,
}

impl SlotSequence {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len.max(1)],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn as_slice(&self) -> &[Option<FragmentId>] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<FragmentId> {
        self.slots.get(slot).copied().flatten()
    }

    /// Slot under horizontal position `x` (percent), slots spread evenly across the width.
    pub fn index_at(&self, x: f32) -> usize {
        let last = self.slots.len() - 1;
        if !x.is_finite() || x <= 0.0 {
            return 0;
        }
        ((x / 100.0 * self.slots.len() as f32) as usize).min(last)
    }

    /// Puts `id` into `slot`, returning the previous occupant.
    pub fn put(&mut self, slot: usize, id: FragmentId) -> Option<FragmentId> {
        self.slots.get_mut(slot).and_then(|s| s.replace(id))
    }

    pub fn take(&mut self, slot: usize) -> Option<FragmentId> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    #[cfg(test)]
    pub fn occupied(&self) -> impl Iterator<Item = (usize, FragmentId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|id| (i, id)))
    }

    /// Empties every slot, returning the occupants in slot order.
    pub fn drain(&mut self) -> Vec<FragmentId> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }

    #[cfg(test)]
    pub fn position(&self, id: FragmentId) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(id))
    }
}
