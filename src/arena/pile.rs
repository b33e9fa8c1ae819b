//! Pile: fixed columns of stacked fragments and the landing algorithm.

use super::fragment::{FragmentId, FragmentState, FragmentStore, Geometry};

/// One vertical lane. `stack[0]` is the bottom fragment.
#[derive(Debug, Clone)]
pub struct Column {
    /// Horizontal centre, percent of arena width.
    pub center: f32,
    pub stack: Vec<FragmentId>,
}

#[derive(Debug)]
pub struct Pile {
    columns: Vec<Column>,
    geometry: Geometry,
    /// Columns inspected on each side of the natural column.
    neighborhood: usize,
}

impl Pile {
    pub fn new(columns: usize, neighborhood: usize, geometry: Geometry) -> Self {
        let n = columns.max(1);
        let width = 100.0 / n as f32;
        let columns = (0..n)
            .map(|index| Column {
                center: (index as f32 + 0.5) * width,
                stack: Vec::new(),
            })
            .collect();
        Self {
            columns,
            geometry,
            neighborhood,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_width(&self) -> f32 {
        100.0 / self.columns.len() as f32
    }

    /// Column whose horizontal span contains `x`; out-of-range values clamp to the edges.
    pub fn natural_column(&self, x: f32) -> usize {
        let last = self.columns.len() - 1;
        if !x.is_finite() || x <= 0.0 {
            return 0;
        }
        ((x / self.column_width()) as usize).min(last)
    }

    pub fn height(&self, column: usize) -> u32 {
        self.columns
            .get(column)
            .map_or(0, |c| c.stack.len() as u32 * self.geometry.fragment_height)
    }

    pub fn heights(&self) -> Vec<u32> {
        (0..self.columns.len()).map(|i| self.height(i)).collect()
    }

    pub fn max_height(&self) -> u32 {
        (0..self.columns.len())
            .map(|i| self.height(i))
            .max()
            .unwrap_or(0)
    }

    /// Least-loaded column in the neighbourhood of `x`'s natural column.
    /// Ties go to the column whose centre is closest to `x`, then to the lower index.
    pub fn select_column(&self, x: f32) -> usize {
        let natural = self.natural_column(x);
        let lo = natural.saturating_sub(self.neighborhood);
        let hi = (natural + self.neighborhood).min(self.columns.len() - 1);
        let mut best = natural;
        let mut best_key = (self.height(natural), (self.columns[natural].center - x).abs());
        for i in lo..=hi {
            let key = (self.height(i), (self.columns[i].center - x).abs());
            let better = key.0 < best_key.0
                || (key.0 == best_key.0 && key.1 < best_key.1)
                || (key.0 == best_key.0 && key.1 == best_key.1 && i < best);
            if better {
                best = i;
                best_key = key;
            }
        }
        best
    }

    /// Stack `id` onto the column chosen for `x`. Returns the column index.
    pub fn land_fragment(&mut self, store: &mut FragmentStore, id: FragmentId, x: f32) -> usize {
        let column = self.select_column(x);
        let offset = self.height(column);
        self.columns[column].stack.push(id);
        if let Some(f) = store.get_mut(id) {
            f.state = FragmentState::Piled { column, offset };
            f.y = self.geometry.piled_top(offset);
        }
        log::debug!("fragment {} piled in column {column} at offset {offset}", id.0);
        column
    }

    /// Take `id` out of its column and drop everything above it by one fragment height.
    /// Returns the column it was in, or `None` if it was not piled.
    pub fn remove_fragment(&mut self, store: &mut FragmentStore, id: FragmentId) -> Option<usize> {
        let column = match store.get(id).map(|f| f.state) {
            Some(FragmentState::Piled { column, .. }) => column,
            _ => return None,
        };
        let stack = &mut self.columns.get_mut(column)?.stack;
        let pos = stack.iter().position(|&s| s == id)?;
        stack.remove(pos);
        for (level, &above) in stack.iter().enumerate().skip(pos) {
            let offset = level as u32 * self.geometry.fragment_height;
            if let Some(f) = store.get_mut(above) {
                f.state = FragmentState::Piled { column, offset };
                f.y = self.geometry.piled_top(offset);
            }
        }
        Some(column)
    }

    /// Piled fragment at stack position `level` in `column`, if any.
    pub fn at(&self, column: usize, level: usize) -> Option<FragmentId> {
        self.columns.get(column)?.stack.get(level).copied()
    }

    #[cfg(test)]
    pub fn contains(&self, id: FragmentId) -> bool {
        self.columns.iter().any(|c| c.stack.contains(&id))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.stack.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pile_with(columns: usize) -> (Pile, FragmentStore) {
        (Pile::new(columns, 1, Geometry::default()), FragmentStore::new())
    }

    fn drop_at(pile: &mut Pile, store: &mut FragmentStore, x: f32) -> FragmentId {
        let id = store.insert("x".into(), 0, x);
        pile.land_fragment(store, id, x);
        id
    }

    fn offset_of(store: &FragmentStore, id: FragmentId) -> Option<(usize, u32)> {
        match store.get(id)?.state {
            FragmentState::Piled { column, offset } => Some((column, offset)),
            _ => None,
        }
    }

    #[test]
    fn test_natural_column_clamps() {
        let (pile, _) = pile_with(4);
        assert_eq!(pile.natural_column(-20.0), 0);
        assert_eq!(pile.natural_column(0.0), 0);
        assert_eq!(pile.natural_column(26.0), 1);
        assert_eq!(pile.natural_column(100.0), 3);
        assert_eq!(pile.natural_column(f32::NAN), 0);
    }

    #[test]
    fn test_empty_pile_uses_natural_column() {
        let (mut pile, mut store) = pile_with(5);
        let id = drop_at(&mut pile, &mut store, 55.0);
        assert_eq!(offset_of(&store, id), Some((2, 0)));
        assert_eq!(store.get(id).map(|f| f.y), Some(540));
    }

    #[test]
    fn test_busy_natural_column_diverts_to_closer_neighbour() {
        let (mut pile, mut store) = pile_with(3);
        // Column 1 spans 33.3..66.6; fill it to four fragments.
        for _ in 0..4 {
            let id = store.insert("x".into(), 0, 50.0);
            pile.columns[1].stack.push(id);
        }
        assert_eq!(pile.height(1), 240);

        // 40% is closer to column 0's centre (16.7) than column 2's (83.3).
        let left = drop_at(&mut pile, &mut store, 40.0);
        assert_eq!(offset_of(&store, left), Some((0, 0)));

        // Column 0 now has one; 60% prefers column 2 (height 0) anyway.
        let right = drop_at(&mut pile, &mut store, 60.0);
        assert_eq!(offset_of(&store, right), Some((2, 0)));
    }

    #[test]
    fn test_equal_heights_prefer_natural_column() {
        let (mut pile, mut store) = pile_with(3);
        let id = drop_at(&mut pile, &mut store, 66.0);
        assert_eq!(offset_of(&store, id), Some((1, 0)));
    }

    #[test]
    fn test_neighbourhood_is_bounded() {
        let (mut pile, mut store) = pile_with(5);
        // Column 0 and 1 busy, column 3 empty but two columns away from 0.
        for col in [0usize, 1] {
            let id = store.insert("x".into(), 0, 0.0);
            pile.columns[col].stack.push(id);
        }
        let id = drop_at(&mut pile, &mut store, 5.0);
        // Neighbourhood of column 0 is {0, 1}; both height 60, so natural wins.
        assert_eq!(offset_of(&store, id), Some((0, 60)));
    }

    #[test]
    fn test_stack_offsets_are_contiguous() {
        let (mut pile, mut store) = pile_with(1);
        let ids: Vec<_> = (0..4).map(|_| drop_at(&mut pile, &mut store, 50.0)).collect();
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(offset_of(&store, *id), Some((0, i as u32 * 60)));
        }
        assert_eq!(pile.max_height(), 240);
    }

    #[test]
    fn test_removal_drops_fragments_above() {
        let (mut pile, mut store) = pile_with(1);
        let ids: Vec<_> = (0..4).map(|_| drop_at(&mut pile, &mut store, 50.0)).collect();

        assert_eq!(pile.remove_fragment(&mut store, ids[2]), Some(0));
        assert_eq!(offset_of(&store, ids[1]), Some((0, 60)));
        assert_eq!(offset_of(&store, ids[3]), Some((0, 120)));
        assert_eq!(store.get(ids[3]).map(|f| f.y), Some(420));
        assert!(!pile.contains(ids[2]));
        assert_eq!(pile.height(0), 180);
    }

    #[test]
    fn test_remove_unpiled_is_none() {
        let (mut pile, mut store) = pile_with(2);
        let id = store.insert("x".into(), 0, 10.0);
        assert_eq!(pile.remove_fragment(&mut store, id), None);
    }
}
