//! Sequence validator: exact comparison of the assembled slots against the target.

use super::fragment::FragmentStore;
use super::slots::SlotSequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// At least one slot is empty; nothing happens.
    NotReady,
    Match,
    Mismatch,
}

#[derive(Debug, Clone)]
pub struct SequenceValidator {
    target: Vec<String>,
    joined: String,
}

impl SequenceValidator {
    pub fn new(target: Vec<String>) -> Self {
        let joined = target.concat();
        Self { target, joined }
    }

    pub fn target(&self) -> &[String] {
        &self.target
    }

    /// Slot texts joined in order, or `None` if any slot is empty.
    pub fn assembled(&self, store: &FragmentStore, slots: &SlotSequence) -> Option<String> {
        slots
            .as_slice()
            .iter()
            .map(|s| s.and_then(|id| store.get(id)).map(|f| f.text.as_str()))
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.concat())
    }

    pub fn evaluate(&self, store: &FragmentStore, slots: &SlotSequence) -> Verdict {
        match self.assembled(store, slots) {
            None => Verdict::NotReady,
            Some(s) if s == self.joined => Verdict::Match,
            Some(_) => Verdict::Mismatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(store: &mut FragmentStore, slots: &mut SlotSequence, texts: &[&str]) {
        for (i, t) in texts.iter().enumerate() {
            let id = store.insert((*t).to_string(), 0, 50.0);
            slots.put(i, id);
        }
    }

    #[test]
    fn test_not_ready_with_gap() {
        let v = SequenceValidator::new(vec!["AAA".into(), "BBB".into()]);
        let mut store = FragmentStore::new();
        let mut slots = SlotSequence::new(2);
        let id = store.insert("AAA".into(), 0, 50.0);
        slots.put(0, id);
        assert_eq!(v.evaluate(&store, &slots), Verdict::NotReady);
    }

    #[test]
    fn test_exact_match() {
        let v = SequenceValidator::new(vec!["AAA".into(), "BBB".into()]);
        let mut store = FragmentStore::new();
        let mut slots = SlotSequence::new(2);
        fill(&mut store, &mut slots, &["AAA", "BBB"]);
        assert_eq!(v.evaluate(&store, &slots), Verdict::Match);
    }

    #[test]
    fn test_one_character_off_is_mismatch() {
        let v = SequenceValidator::new(vec!["AAA".into(), "BBB".into()]);
        let mut store = FragmentStore::new();
        let mut slots = SlotSequence::new(2);
        fill(&mut store, &mut slots, &["AAA", "BBC"]);
        assert_eq!(v.evaluate(&store, &slots), Verdict::Mismatch);
    }

    #[test]
    fn test_compares_joined_text_not_pieces() {
        // Different split, same sentence: still a match.
        let v = SequenceValidator::new(vec!["AB".into(), "CD".into()]);
        let mut store = FragmentStore::new();
        let mut slots = SlotSequence::new(2);
        fill(&mut store, &mut slots, &["ABC", "D"]);
        assert_eq!(v.evaluate(&store, &slots), Verdict::Match);
    }
}
