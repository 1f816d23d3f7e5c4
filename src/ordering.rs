//! Branching heuristics: which slot to assign next, and in what order to
//! try its candidate words.
//!
//! Slot selection is minimum-remaining-values with a degree tie-break.
//! Value ordering is least-constraining-value. Both are deterministic by
//! default (ties fall to the lowest id); a caller can hand slot selection a
//! seeded rng to randomize exact ties reproducibly.

use std::cmp::Reverse;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::domains::DomainStore;
use crate::grid::{Grid, SlotId};
use crate::solver::Assignment;
use crate::words::{WordId, WordList};

/// Pick the unassigned slot with the fewest remaining candidates, breaking
/// ties by highest degree, then by lowest id — or by a draw from `rng` when
/// one is supplied. Returns `None` once every slot is assigned.
pub fn select_unassigned_slot(
    grid: &Grid,
    domains: &DomainStore,
    assignment: &Assignment,
    rng: Option<&mut SmallRng>,
) -> Option<SlotId> {
    let mut best: Option<(usize, Reverse<usize>)> = None;
    let mut ties: Vec<SlotId> = Vec::new();

    for id in 0..grid.slot_count() {
        if assignment.get(id).is_some() {
            continue;
        }
        let key = (domains.size(id), Reverse(grid.degree(id)));
        match best {
            Some(current) if key > current => {}
            Some(current) if key == current => ties.push(id),
            _ => {
                best = Some(key);
                ties.clear();
                ties.push(id);
            }
        }
    }

    match rng {
        Some(rng) if ties.len() > 1 => Some(ties[rng.gen_range(0..ties.len())]),
        _ => ties.first().copied(),
    }
}

/// Order `slot`'s candidates by ascending damage: the number of words each
/// one would eliminate from the domains of unassigned neighbors. Assigned
/// neighbors are fixed and contribute nothing. The sort is stable, so equal
/// damage keeps ascending word-id order.
pub fn order_domain_values(
    grid: &Grid,
    domains: &DomainStore,
    words: &WordList,
    assignment: &Assignment,
    slot: SlotId,
) -> Vec<WordId> {
    let mut scored: Vec<(usize, WordId)> = domains
        .iter(slot)
        .map(|word| (damage(grid, domains, words, assignment, slot, word), word))
        .collect();
    scored.sort_by_key(|&(damage, _)| damage);
    scored.into_iter().map(|(_, word)| word).collect()
}

/// How many neighbor candidates choosing `word` for `slot` would rule out.
fn damage(
    grid: &Grid,
    domains: &DomainStore,
    words: &WordList,
    assignment: &Assignment,
    slot: SlotId,
    word: WordId,
) -> usize {
    let chosen = words.word(word);
    let mut eliminated = 0;

    for &neighbor in grid.neighbors(slot) {
        if assignment.get(neighbor).is_some() {
            continue;
        }
        let Some((ours, theirs)) = grid.overlap(slot, neighbor) else {
            continue;
        };
        let letter = chosen.letter(ours);
        eliminated += domains
            .iter(neighbor)
            .filter(|&w| words.word(w).letter(theirs) != letter)
            .count();
    }
    eliminated
}
