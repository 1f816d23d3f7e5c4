//! Per-slot candidate sets with trail-based undo.
//!
//! Each slot owns a bit set of word ids that are still possible for it.
//! Every removal is recorded on a trail, so the search can checkpoint before
//! a tentative assignment and roll back to that mark on failure without
//! copying the whole store.

use bit_set::BitSet;

use crate::grid::{Grid, SlotId};
use crate::words::{WordId, WordList};

/// An opaque mark into the removal trail, taken before speculative pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// The mutable state of a solve: one candidate set per slot.
#[derive(Debug, Clone)]
pub struct DomainStore {
    domains: Vec<BitSet>,
    trail: Vec<(SlotId, WordId)>,
}

/// Initialize every slot's domain to the full vocabulary.
pub fn build_domains(words: &WordList, grid: &Grid) -> DomainStore {
    let full: BitSet = (0..words.len()).collect();
    DomainStore {
        domains: vec![full; grid.slot_count()],
        trail: Vec::new(),
    }
}

impl DomainStore {
    pub fn slot_count(&self) -> usize {
        self.domains.len()
    }

    /// Number of words still possible for `slot`.
    pub fn size(&self, slot: SlotId) -> usize {
        self.domains[slot].len()
    }

    pub fn is_empty(&self, slot: SlotId) -> bool {
        self.domains[slot].is_empty()
    }

    pub fn contains(&self, slot: SlotId, word: WordId) -> bool {
        self.domains[slot].contains(word)
    }

    /// Words still possible for `slot`, in ascending id order.
    pub fn iter(&self, slot: SlotId) -> impl Iterator<Item = WordId> + '_ {
        self.domains[slot].iter()
    }

    /// Snapshot of `slot`'s domain, for iterating while mutating the store.
    pub fn to_vec(&self, slot: SlotId) -> Vec<WordId> {
        self.domains[slot].iter().collect()
    }

    /// Remove `word` from `slot`'s domain, recording the edit on the trail.
    /// Returns whether the word was present.
    pub fn remove(&mut self, slot: SlotId, word: WordId) -> bool {
        if self.domains[slot].remove(word) {
            self.trail.push((slot, word));
            true
        } else {
            false
        }
    }

    /// Shrink `slot`'s domain to the single word `word`.
    pub fn restrict_to(&mut self, slot: SlotId, word: WordId) {
        for other in self.to_vec(slot) {
            if other != word {
                self.remove(slot, other);
            }
        }
    }

    /// Mark the current trail position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.trail.len())
    }

    /// Reinsert every word removed since `mark`, newest first.
    pub fn rollback_to(&mut self, mark: Checkpoint) {
        while self.trail.len() > mark.0 {
            if let Some((slot, word)) = self.trail.pop() {
                self.domains[slot].insert(word);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Direction, Slot};

    fn two_slot_store() -> (Grid, WordList, DomainStore) {
        let grid = Grid::from_slots(
            3,
            3,
            vec![
                Slot::new(0, 0, Direction::Across, 3),
                Slot::new(0, 0, Direction::Down, 3),
            ],
        )
        .unwrap();
        let words = WordList::new(["CAT", "DOG", "OAK"]);
        let domains = build_domains(&words, &grid);
        (grid, words, domains)
    }

    #[test]
    fn test_build_starts_full() {
        let (_, words, domains) = two_slot_store();
        assert_eq!(domains.slot_count(), 2);
        for slot in 0..2 {
            assert_eq!(domains.size(slot), words.len());
        }
    }

    #[test]
    fn test_remove_and_rollback() {
        let (_, _, mut domains) = two_slot_store();
        let mark = domains.checkpoint();
        assert!(domains.remove(0, 1));
        assert!(!domains.remove(0, 1));
        assert_eq!(domains.size(0), 2);

        domains.rollback_to(mark);
        assert_eq!(domains.size(0), 3);
        assert!(domains.contains(0, 1));
    }

    #[test]
    fn test_restrict_to_single_word() {
        let (_, _, mut domains) = two_slot_store();
        domains.restrict_to(0, 2);
        assert_eq!(domains.to_vec(0), vec![2]);
        // Other slots are untouched.
        assert_eq!(domains.size(1), 3);
    }

    #[test]
    fn test_nested_checkpoints_restore_in_order() {
        let (_, _, mut domains) = two_slot_store();
        let outer = domains.checkpoint();
        domains.remove(0, 0);
        let inner = domains.checkpoint();
        domains.remove(1, 1);
        domains.remove(0, 2);

        domains.rollback_to(inner);
        assert_eq!(domains.to_vec(0), vec![1, 2]);
        assert_eq!(domains.size(1), 3);

        domains.rollback_to(outer);
        assert_eq!(domains.size(0), 3);
    }
}
