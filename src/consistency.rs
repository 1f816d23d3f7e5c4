//! Consistency enforcement: the unary length filter and AC-3 propagation.
//!
//! Node consistency runs once and permanently removes words of the wrong
//! length. Arc consistency is the classic AC-3 worklist algorithm over
//! ordered slot pairs; the search also re-enters it with a restricted seed
//! after each tentative assignment for incremental forward checking.

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};
use thiserror::Error;

use crate::domains::DomainStore;
use crate::grid::{Grid, SlotId};
use crate::words::WordList;

/// Raised when enforcement empties a slot's domain. Speculative callers
/// (forward checking) catch this and treat the branch as dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PropagationFailure {
    #[error("domain of slot {slot} became empty")]
    EmptyDomain { slot: SlotId },
}

/// Remove from each slot's domain every word whose length does not match the
/// slot. Length is a unary property, so no propagation is needed.
pub fn enforce_node_consistency(domains: &mut DomainStore, words: &WordList, grid: &Grid) {
    for (id, slot) in grid.slots().iter().enumerate() {
        for word in domains.to_vec(id) {
            if words.word(word).len() != slot.length {
                domains.remove(id, word);
            }
        }
    }
}

/// Make slot `x` arc-consistent with slot `y`: drop every word of `x` that
/// has no agreeing partner in `y`'s domain at the shared cell. A no-op
/// returning `false` when the slots do not cross.
pub fn revise(
    domains: &mut DomainStore,
    words: &WordList,
    grid: &Grid,
    x: SlotId,
    y: SlotId,
) -> bool {
    let Some((ix, iy)) = grid.overlap(x, y) else {
        return false;
    };

    // Letters that y's remaining words can place in the shared cell.
    let supported: HashSet<char> = domains.iter(y).map(|w| words.word(w).letter(iy)).collect();

    let mut changed = false;
    for word in domains.to_vec(x) {
        if !supported.contains(&words.word(word).letter(ix)) {
            domains.remove(x, word);
            changed = true;
        }
    }
    if changed {
        trace!("revise({x}, {y}) shrank slot {x} to {} words", domains.size(x));
    }
    changed
}

/// AC-3 propagation to a fixed point.
///
/// With `seed = None` the worklist starts with both orderings of every
/// crossing pair; a caller doing incremental forward checking passes just
/// the arcs invalidated by its latest assignment. Whenever a revision
/// shrinks slot `x`, the arcs `(z, x)` for every other neighbor `z` are
/// re-enqueued. Fails as soon as any domain empties.
pub fn ac3(
    domains: &mut DomainStore,
    words: &WordList,
    grid: &Grid,
    seed: Option<Vec<(SlotId, SlotId)>>,
) -> Result<(), PropagationFailure> {
    let mut queue: VecDeque<(SlotId, SlotId)> = match seed {
        Some(arcs) => arcs.into(),
        None => {
            let mut arcs = VecDeque::new();
            for x in 0..grid.slot_count() {
                for &y in grid.neighbors(x) {
                    arcs.push_back((x, y));
                }
            }
            arcs
        }
    };

    while let Some((x, y)) = queue.pop_front() {
        if revise(domains, words, grid, x, y) {
            if domains.is_empty(x) {
                debug!("propagation emptied slot {x}");
                return Err(PropagationFailure::EmptyDomain { slot: x });
            }
            for &z in grid.neighbors(x) {
                if z != y {
                    queue.push_back((z, x));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::build_domains;
    use crate::grid::{Direction, Slot};

    /// Across at (0,0) and down at (0, `col`), both length 3. The overlap is
    /// (col, 0): letter `col` of the across equals letter 0 of the down.
    fn crossing_pair(col: usize) -> Grid {
        Grid::from_slots(
            3,
            3,
            vec![
                Slot::new(0, 0, Direction::Across, 3),
                Slot::new(0, col, Direction::Down, 3),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_node_consistency_filters_lengths() {
        let grid = Grid::from_slots(3, 1, vec![Slot::new(0, 0, Direction::Across, 3)]).unwrap();
        let words = WordList::new(["CAT", "AB", "HOUSE", "DOG"]);
        let mut domains = build_domains(&words, &grid);

        enforce_node_consistency(&mut domains, &words, &grid);
        assert_eq!(domains.to_vec(0), vec![0, 3]);
    }

    #[test]
    fn test_node_consistency_is_idempotent() {
        let grid = crossing_pair(0);
        let words = WordList::new(["CAT", "AB", "DOG"]);
        let mut domains = build_domains(&words, &grid);

        enforce_node_consistency(&mut domains, &words, &grid);
        let before: Vec<Vec<_>> = (0..2).map(|s| domains.to_vec(s)).collect();
        enforce_node_consistency(&mut domains, &words, &grid);
        let after: Vec<Vec<_>> = (0..2).map(|s| domains.to_vec(s)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_revise_removes_unsupported_words() {
        // Overlap (1, 0): the across word's middle letter must start some
        // down word. Down letters at 0 are {C, D, O}; CAT and OAK have 'A'
        // in the middle, so only DOG ('O') survives.
        let grid = crossing_pair(1);
        let words = WordList::new(["CAT", "DOG", "OAK"]);
        let mut domains = build_domains(&words, &grid);

        assert!(revise(&mut domains, &words, &grid, 0, 1));
        assert_eq!(domains.to_vec(0), vec![1]);
        // Domain of y is untouched by revising x.
        assert_eq!(domains.size(1), 3);
    }

    #[test]
    fn test_revise_without_overlap_is_noop() {
        let grid = Grid::from_slots(
            3,
            3,
            vec![
                Slot::new(0, 0, Direction::Across, 3),
                Slot::new(2, 0, Direction::Across, 3),
            ],
        )
        .unwrap();
        let words = WordList::new(["CAT", "DOG"]);
        let mut domains = build_domains(&words, &grid);

        assert!(!revise(&mut domains, &words, &grid, 0, 1));
        assert_eq!(domains.size(0), 2);
    }

    #[test]
    fn test_ac3_reaches_fixed_point() {
        let grid = crossing_pair(1);
        let words = WordList::new(["CAT", "DOG", "OAK", "GEM"]);
        let mut domains = build_domains(&words, &grid);

        enforce_node_consistency(&mut domains, &words, &grid);
        ac3(&mut domains, &words, &grid, None).unwrap();

        // Every remaining across word has a partner among the remaining
        // down words and vice versa.
        for word in domains.to_vec(0) {
            let letter = words.word(word).letter(1);
            assert!(domains.iter(1).any(|w| words.word(w).letter(0) == letter));
        }
    }

    #[test]
    fn test_ac3_is_idempotent() {
        let grid = crossing_pair(1);
        let words = WordList::new(["CAT", "DOG", "OAK", "GEM"]);
        let mut domains = build_domains(&words, &grid);

        enforce_node_consistency(&mut domains, &words, &grid);
        ac3(&mut domains, &words, &grid, None).unwrap();
        let before: Vec<Vec<_>> = (0..2).map(|s| domains.to_vec(s)).collect();
        ac3(&mut domains, &words, &grid, None).unwrap();
        let after: Vec<Vec<_>> = (0..2).map(|s| domains.to_vec(s)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_ac3_fails_on_domain_wipeout() {
        // Overlap (1, 0): across middle letters are {A, O}, down initial
        // letters are {C, B}. Nothing agrees, so propagation must fail.
        let grid = crossing_pair(1);
        let words = WordList::new(["CAT", "BOG"]);
        let mut domains = build_domains(&words, &grid);

        enforce_node_consistency(&mut domains, &words, &grid);
        let err = ac3(&mut domains, &words, &grid, None).unwrap_err();
        assert!(matches!(err, PropagationFailure::EmptyDomain { .. }));
    }

    #[test]
    fn test_ac3_with_seed_arcs_prunes_neighbor() {
        // Pin the across slot to TWO, then propagate only the (down, across)
        // arc: the down slot must start with 'O'.
        let grid = crossing_pair(2);
        let words = WordList::new(["TWO", "OWE", "EAR"]);
        let mut domains = build_domains(&words, &grid);

        enforce_node_consistency(&mut domains, &words, &grid);
        domains.restrict_to(0, 0);
        ac3(&mut domains, &words, &grid, Some(vec![(1, 0)])).unwrap();
        assert_eq!(domains.to_vec(1), vec![1]);
    }

    #[test]
    fn test_ac3_never_prunes_a_solution_word() {
        // TWO across, OWE down is a complete solution; both must survive.
        let grid = crossing_pair(2);
        let words = WordList::new(["TWO", "OWE", "EAR"]);
        let mut domains = build_domains(&words, &grid);

        enforce_node_consistency(&mut domains, &words, &grid);
        ac3(&mut domains, &words, &grid, None).unwrap();
        assert!(domains.contains(0, 0));
        assert!(domains.contains(1, 1));
    }
}
