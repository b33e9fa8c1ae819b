//! Placement: pick-up / drag / release gestures moving fragments between pile and slots.

use super::fragment::{FragmentId, FragmentState, FragmentStore, Geometry, Origin, Point};
use super::pile::Pile;
use super::slots::SlotSequence;

/// Mutable view over the containers a gesture may touch.
pub struct Containers<'a> {
    pub store: &'a mut FragmentStore,
    pub pile: &'a mut Pile,
    pub slots: &'a mut SlotSequence,
    pub geometry: &'a Geometry,
}

/// The fragment currently in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Held {
    pub id: FragmentId,
    pub origin: Origin,
    /// Last gesture point, for drawing the fragment under the pointer.
    pub at: Point,
}

/// Where a released fragment ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Slotted {
        slot: usize,
        /// Previous occupant and the container it was moved to.
        displaced: Option<(FragmentId, Origin)>,
    },
    Piled {
        column: usize,
    },
}

#[derive(Debug, Default)]
pub struct PlacementController {
    held: Option<Held>,
}

impl PlacementController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<&Held> {
        self.held.as_ref()
    }

    /// Detaches the piled or slotted fragment under `point`. Ignored while another
    /// fragment is held, when nothing is there, or for slots while `slots_locked`.
    pub fn pick_up(&mut self, c: Containers<'_>, point: Point, slots_locked: bool) -> Option<FragmentId> {
        if self.held.is_some() {
            return None;
        }
        let (id, origin) = if c.geometry.in_slot_band(point) {
            if slots_locked {
                return None;
            }
            let slot = c.slots.index_at(point.x);
            (c.slots.take(slot)?, Origin::Slot(slot))
        } else {
            let within = (0.0..=100.0).contains(&point.x)
                && point.y >= 0.0
                && point.y < c.geometry.height as f32;
            if !within {
                return None;
            }
            let column = c.pile.natural_column(point.x);
            let level = ((c.geometry.height as f32 - point.y) / c.geometry.fragment_height as f32) as usize;
            let id = c.pile.at(column, level)?;
            c.pile.remove_fragment(c.store, id)?;
            (id, Origin::Column(column))
        };
        c.store.set_state(id, FragmentState::Held { origin });
        self.held = Some(Held { id, origin, at: point });
        log::debug!("picked up fragment {} from {origin:?}", id.0);
        Some(id)
    }

    pub fn drag(&mut self, point: Point) {
        if let Some(held) = self.held.as_mut() {
            held.at = point;
        }
    }

    /// Drops the held fragment at `point`. Over the slot band it fills the slot under the
    /// pointer, swapping any occupant into the held fragment's previous container;
    /// anywhere else it lands on the pile at the release x.
    pub fn release(&mut self, c: Containers<'_>, point: Point, slots_locked: bool) -> Option<Placement> {
        let Held { id, origin, .. } = self.held.take()?;

        if !slots_locked && c.geometry.in_slot_band(point) {
            let slot = c.slots.index_at(point.x);
            let displaced = c.slots.put(slot, id).map(|other| {
                let to = match origin {
                    Origin::Slot(prev) => {
                        c.slots.put(prev, other);
                        c.store.set_state(other, FragmentState::Slotted { slot: prev });
                        Origin::Slot(prev)
                    }
                    Origin::Column(col) => {
                        let center = c.pile.columns()[col].center;
                        Origin::Column(c.pile.land_fragment(c.store, other, center))
                    }
                };
                log::debug!("fragment {} displaced to {to:?}", other.0);
                (other, to)
            });
            c.store.set_state(id, FragmentState::Slotted { slot });
            return Some(Placement::Slotted { slot, displaced });
        }

        let x = if point.x.is_finite() { point.x.clamp(0.0, 100.0) } else { 50.0 };
        let column = c.pile.land_fragment(c.store, id, x);
        Some(Placement::Piled { column })
    }

    /// Puts the held fragment back where it came from.
    pub fn cancel(&mut self, c: Containers<'_>) -> Option<FragmentId> {
        let Held { id, origin, .. } = self.held.take()?;
        match origin {
            Origin::Slot(slot) if c.slots.get(slot).is_none() => {
                c.slots.put(slot, id);
                c.store.set_state(id, FragmentState::Slotted { slot });
            }
            Origin::Slot(_) => {
                let x = c.store.get(id).map_or(50.0, |f| f.x);
                c.pile.land_fragment(c.store, id, x);
            }
            Origin::Column(col) => {
                let center = c.pile.columns()[col].center;
                c.pile.land_fragment(c.store, id, center);
            }
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rig {
        store: FragmentStore,
        pile: Pile,
        slots: SlotSequence,
        geometry: Geometry,
        placement: PlacementController,
    }

    impl Rig {
        fn new(columns: usize, slots: usize) -> Self {
            let geometry = Geometry::default();
            Self {
                store: FragmentStore::new(),
                pile: Pile::new(columns, 1, geometry),
                slots: SlotSequence::new(slots),
                geometry,
                placement: PlacementController::new(),
            }
        }

        fn containers(&mut self) -> Containers<'_> {
            Containers {
                store: &mut self.store,
                pile: &mut self.pile,
                slots: &mut self.slots,
                geometry: &self.geometry,
            }
        }

        fn piled(&mut self, text: &str, x: f32) -> FragmentId {
            let id = self.store.insert(text.into(), 0, x);
            self.pile.land_fragment(&mut self.store, id, x);
            id
        }

        fn pick(&mut self, p: Point) -> Option<FragmentId> {
            let mut pl = std::mem::take(&mut self.placement);
            let r = pl.pick_up(self.containers(), p, false);
            self.placement = pl;
            r
        }

        fn drop_at(&mut self, p: Point) -> Option<Placement> {
            let mut pl = std::mem::take(&mut self.placement);
            let r = pl.release(self.containers(), p, false);
            self.placement = pl;
            r
        }

        fn cancel(&mut self) -> Option<FragmentId> {
            let mut pl = std::mem::take(&mut self.placement);
            let r = pl.cancel(self.containers());
            self.placement = pl;
            r
        }
    }

    /// Point over slot `i` of `n`.
    fn slot_point(i: usize, n: usize) -> Point {
        Point::new((i as f32 + 0.5) * 100.0 / n as f32, 630.0)
    }

    /// Point over stack level `level` of the column centred at `x`.
    fn pile_point(x: f32, level: u32) -> Point {
        Point::new(x, 600.0 - level as f32 * 60.0 - 30.0)
    }

    #[test]
    fn test_pick_from_pile_and_slot() {
        let mut rig = Rig::new(2, 2);
        let a = rig.piled("A", 25.0);
        assert_eq!(rig.pick(pile_point(25.0, 0)), Some(a));
        assert!(matches!(
            rig.store.get(a).unwrap().state,
            FragmentState::Held { origin: Origin::Column(0) }
        ));
        assert!(!rig.pile.contains(a));

        assert_eq!(
            rig.drop_at(slot_point(1, 2)),
            Some(Placement::Slotted { slot: 1, displaced: None })
        );
        assert_eq!(rig.slots.get(1), Some(a));
        assert_eq!(rig.store.get(a).unwrap().state, FragmentState::Slotted { slot: 1 });
    }

    #[test]
    fn test_pick_on_empty_space_is_ignored() {
        let mut rig = Rig::new(2, 2);
        rig.piled("A", 25.0);
        assert_eq!(rig.pick(pile_point(25.0, 3)), None);
        assert_eq!(rig.pick(pile_point(75.0, 0)), None);
        assert_eq!(rig.pick(slot_point(0, 2)), None);
        assert_eq!(rig.pick(Point::new(130.0, 570.0)), None);
        assert!(rig.placement.held().is_none());
    }

    #[test]
    fn test_second_pick_is_ignored_while_holding() {
        let mut rig = Rig::new(2, 2);
        let a = rig.piled("A", 25.0);
        let b = rig.piled("B", 75.0);
        assert_eq!(rig.pick(pile_point(25.0, 0)), Some(a));
        assert_eq!(rig.pick(pile_point(75.0, 0)), None);
        assert_eq!(rig.placement.held().map(|h| h.id), Some(a));
        assert!(rig.pile.contains(b));
    }

    #[test]
    fn test_swap_between_slots() {
        let mut rig = Rig::new(2, 2);
        let a = rig.piled("A", 25.0);
        let b = rig.piled("B", 75.0);
        rig.pick(pile_point(25.0, 0));
        rig.drop_at(slot_point(0, 2));
        rig.pick(pile_point(75.0, 0));
        rig.drop_at(slot_point(1, 2));

        // Drag A from slot 0 onto B in slot 1.
        assert_eq!(rig.pick(slot_point(0, 2)), Some(a));
        assert_eq!(
            rig.drop_at(slot_point(1, 2)),
            Some(Placement::Slotted {
                slot: 1,
                displaced: Some((b, Origin::Slot(0)))
            })
        );
        assert_eq!(rig.slots.as_slice(), &[Some(b), Some(a)]);
        assert_eq!(rig.store.get(b).unwrap().state, FragmentState::Slotted { slot: 0 });
    }

    #[test]
    fn test_swap_from_pile_sends_occupant_to_pile() {
        let mut rig = Rig::new(2, 2);
        let a = rig.piled("A", 25.0);
        let b = rig.piled("B", 75.0);
        rig.pick(pile_point(75.0, 0));
        rig.drop_at(slot_point(0, 2));

        assert_eq!(rig.pick(pile_point(25.0, 0)), Some(a));
        let placed = rig.drop_at(slot_point(0, 2));
        assert_eq!(
            placed,
            Some(Placement::Slotted {
                slot: 0,
                displaced: Some((b, Origin::Column(0)))
            })
        );
        assert_eq!(rig.slots.get(0), Some(a));
        assert!(rig.pile.contains(b));
        assert_eq!(rig.store.len(), 2);
    }

    #[test]
    fn test_release_outside_slots_lands_at_release_x() {
        let mut rig = Rig::new(4, 2);
        let a = rig.piled("A", 10.0);
        rig.pick(pile_point(10.0, 0));
        assert_eq!(rig.drop_at(Point::new(90.0, 100.0)), Some(Placement::Piled { column: 3 }));
        assert_eq!(rig.store.get(a).unwrap().state, FragmentState::Piled { column: 3, offset: 0 });

        rig.pick(pile_point(90.0, 0));
        // Far off to the left and below the slot band: clamped into column 0.
        assert_eq!(rig.drop_at(Point::new(-40.0, 900.0)), Some(Placement::Piled { column: 0 }));
    }

    #[test]
    fn test_drop_back_on_own_slot() {
        let mut rig = Rig::new(2, 3);
        let a = rig.piled("A", 25.0);
        rig.pick(pile_point(25.0, 0));
        rig.drop_at(slot_point(2, 3));
        rig.pick(slot_point(2, 3));
        assert_eq!(
            rig.drop_at(slot_point(2, 3)),
            Some(Placement::Slotted { slot: 2, displaced: None })
        );
        assert_eq!(rig.slots.get(2), Some(a));
    }

    #[test]
    fn test_locked_slots_refuse_pick_and_drop() {
        let mut rig = Rig::new(2, 2);
        let a = rig.piled("A", 25.0);
        rig.pick(pile_point(25.0, 0));
        rig.drop_at(slot_point(0, 2));

        let mut pl = std::mem::take(&mut rig.placement);
        assert_eq!(pl.pick_up(rig.containers(), slot_point(0, 2), true), None);
        let b = rig.piled("B", 75.0);
        assert_eq!(pl.pick_up(rig.containers(), pile_point(75.0, 0), true), Some(b));
        assert!(matches!(
            pl.release(rig.containers(), slot_point(1, 2), true),
            Some(Placement::Piled { .. })
        ));
        assert_eq!(rig.slots.get(0), Some(a));
        assert_eq!(rig.slots.get(1), None);
    }

    #[test]
    fn test_cancel_restores_slot() {
        let mut rig = Rig::new(2, 2);
        let a = rig.piled("A", 25.0);
        rig.pick(pile_point(25.0, 0));
        rig.drop_at(slot_point(1, 2));
        rig.pick(slot_point(1, 2));
        rig.placement.drag(Point::new(50.0, 200.0));
        assert_eq!(rig.placement.held().map(|h| h.at), Some(Point::new(50.0, 200.0)));
        assert_eq!(rig.cancel(), Some(a));
        assert_eq!(rig.slots.get(1), Some(a));
        assert_eq!(rig.store.get(a).unwrap().state, FragmentState::Slotted { slot: 1 });
        assert_eq!(rig.cancel(), None);
    }

    #[test]
    fn test_cancel_relands_in_origin_column() {
        let mut rig = Rig::new(1, 2);
        let a = rig.piled("A", 50.0);
        let b = rig.piled("B", 50.0);
        assert_eq!(rig.pick(pile_point(50.0, 0)), Some(a));
        assert_eq!(rig.store.get(b).unwrap().state, FragmentState::Piled { column: 0, offset: 0 });

        rig.placement.drag(slot_point(1, 2));
        assert_eq!(rig.cancel(), Some(a));
        assert_eq!(rig.store.get(a).unwrap().state, FragmentState::Piled { column: 0, offset: 60 });
        assert!(rig.slots.get(1).is_none());
        assert!(rig.placement.held().is_none());
    }

    #[test]
    fn test_cancel_falls_back_to_pile_when_slot_taken() {
        let mut rig = Rig::new(2, 2);
        let a = rig.piled("A", 25.0);
        let b = rig.piled("B", 75.0);
        rig.pick(pile_point(25.0, 0));
        rig.drop_at(slot_point(0, 2));
        assert_eq!(rig.pick(slot_point(0, 2)), Some(a));

        // Slot 0 is refilled behind the held fragment's back.
        rig.pile.remove_fragment(&mut rig.store, b);
        rig.slots.put(0, b);
        rig.store.set_state(b, FragmentState::Slotted { slot: 0 });

        assert_eq!(rig.cancel(), Some(a));
        assert_eq!(rig.slots.get(0), Some(b));
        assert_eq!(rig.store.get(a).unwrap().state, FragmentState::Piled { column: 0, offset: 0 });
        assert!(rig.pile.contains(a));
    }
}
