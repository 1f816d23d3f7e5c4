//! Backtracking search over slot assignments.
//!
//! The solver enforces node and arc consistency once, then runs a
//! depth-first search guided by the ordering heuristics, with trail
//! checkpoints around each tentative assignment so failed branches leave no
//! pruning behind. The first complete assignment wins; exhausting the space
//! is the "no solution" outcome, not an error.

use std::time::{Duration, Instant};

use bit_set::BitSet;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::consistency::{ac3, enforce_node_consistency, PropagationFailure};
use crate::domains::{build_domains, DomainStore};
use crate::grid::{Grid, SlotId};
use crate::ordering::{order_domain_values, select_unassigned_slot};
use crate::words::{WordId, WordList};

/// A partial mapping from slot to chosen word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    entries: Vec<Option<WordId>>,
}

impl Assignment {
    pub fn new(slot_count: usize) -> Self {
        Self {
            entries: vec![None; slot_count],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, slot: SlotId) -> Option<WordId> {
        self.entries[slot]
    }

    pub fn set(&mut self, slot: SlotId, word: WordId) {
        self.entries[slot] = Some(word);
    }

    pub fn clear(&mut self, slot: SlotId) {
        self.entries[slot] = None;
    }

    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|entry| entry.is_some())
    }

    pub fn assigned_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Assigned (slot, word) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, WordId)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.map(|word| (slot, word)))
    }
}

/// Configuration for the search.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Seed for heuristic tie-breaking; `None` breaks ties by slot id.
    pub seed: Option<u64>,
    /// Propagate arc consistency from each tentative assignment.
    pub forward_check: bool,
    /// Maximum time to search, checked between candidate attempts.
    pub timeout: Option<Duration>,
    /// Maximum number of assignments to explore.
    pub node_limit: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: None,
            forward_check: true,
            timeout: None,
            node_limit: None,
        }
    }
}

/// Result of a search.
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// The first complete assignment found, if any.
    pub assignment: Option<Assignment>,
    /// Whether the search space was fully explored. `false` when the
    /// timeout or node limit interrupted the search, and when a solution
    /// was found before exhaustion.
    pub search_exhausted: bool,
    /// Number of tentative assignments made.
    pub nodes_expanded: usize,
    /// Number of assignments undone.
    pub backtracks: usize,
    /// Time elapsed in milliseconds.
    pub time_elapsed_ms: u64,
}

/// Solve with the default configuration, keeping only the assignment.
pub fn solve(grid: &Grid, words: &WordList) -> Option<Assignment> {
    solve_with_config(grid, words, &SolverConfig::default()).assignment
}

/// Enforce node and arc consistency, then search for a complete assignment.
pub fn solve_with_config(grid: &Grid, words: &WordList, config: &SolverConfig) -> SolverResult {
    let start = Instant::now();
    info!(
        "solving {} slots against {} words",
        grid.slot_count(),
        words.len()
    );

    let mut domains = build_domains(words, grid);
    enforce_node_consistency(&mut domains, words, grid);
    if let Err(failure) = ac3(&mut domains, words, grid, None) {
        debug!("unsolvable before search: {failure}");
        return SolverResult {
            assignment: None,
            search_exhausted: true,
            nodes_expanded: 0,
            backtracks: 0,
            time_elapsed_ms: start.elapsed().as_millis() as u64,
        };
    }

    let mut search = Search {
        grid,
        words,
        domains,
        assignment: Assignment::new(grid.slot_count()),
        used: BitSet::new(),
        rng: config.seed.map(SmallRng::seed_from_u64),
        forward_check: config.forward_check,
        deadline: config.timeout.map(|timeout| start + timeout),
        node_limit: config.node_limit,
        nodes_expanded: 0,
        backtracks: 0,
    };
    let status = search.backtrack();

    let solved = status == SearchStatus::Solved;
    info!(
        "search finished: solved={solved}, {} nodes, {} backtracks",
        search.nodes_expanded, search.backtracks
    );
    SolverResult {
        assignment: solved.then_some(search.assignment),
        search_exhausted: status == SearchStatus::Exhausted,
        nodes_expanded: search.nodes_expanded,
        backtracks: search.backtracks,
        time_elapsed_ms: start.elapsed().as_millis() as u64,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchStatus {
    /// A complete assignment was found.
    Solved,
    /// Every branch was tried without success.
    Exhausted,
    /// The timeout or node limit cut the search short.
    Interrupted,
}

struct Search<'a> {
    grid: &'a Grid,
    words: &'a WordList,
    domains: DomainStore,
    assignment: Assignment,
    /// Words already assigned somewhere, for the global distinctness check.
    used: BitSet,
    rng: Option<SmallRng>,
    forward_check: bool,
    deadline: Option<Instant>,
    node_limit: Option<usize>,
    nodes_expanded: usize,
    backtracks: usize,
}

impl Search<'_> {
    fn backtrack(&mut self) -> SearchStatus {
        let slot = match select_unassigned_slot(
            self.grid,
            &self.domains,
            &self.assignment,
            self.rng.as_mut(),
        ) {
            Some(slot) => slot,
            None => return SearchStatus::Solved,
        };

        let candidates =
            order_domain_values(self.grid, &self.domains, self.words, &self.assignment, slot);
        for word in candidates {
            if self.out_of_budget() {
                return SearchStatus::Interrupted;
            }
            if !self.consistent(slot, word) {
                continue;
            }

            self.assignment.set(slot, word);
            self.used.insert(word);
            self.nodes_expanded += 1;
            debug!(
                "assign slot {slot} = {} ({}/{})",
                self.words.word(word).text,
                self.assignment.assigned_count(),
                self.grid.slot_count()
            );

            let mark = self.domains.checkpoint();
            let viable = if self.forward_check {
                self.forward_check_from(slot, word).is_ok()
            } else {
                true
            };
            if viable {
                match self.backtrack() {
                    SearchStatus::Solved => return SearchStatus::Solved,
                    SearchStatus::Interrupted => return SearchStatus::Interrupted,
                    SearchStatus::Exhausted => {}
                }
            }

            self.domains.rollback_to(mark);
            self.assignment.clear(slot);
            self.used.remove(word);
            self.backtracks += 1;
        }
        SearchStatus::Exhausted
    }

    /// Whether choosing `word` for `slot` keeps the partial assignment
    /// consistent: the word is unused anywhere else, fits the slot, and
    /// agrees with every assigned crossing slot at the shared cell.
    fn consistent(&self, slot: SlotId, word: WordId) -> bool {
        if self.used.contains(word) {
            return false;
        }
        let chosen = self.words.word(word);
        if chosen.len() != self.grid.slot(slot).length {
            return false;
        }
        for &neighbor in self.grid.neighbors(slot) {
            let Some(other) = self.assignment.get(neighbor) else {
                continue;
            };
            let Some((ours, theirs)) = self.grid.overlap(slot, neighbor) else {
                continue;
            };
            if chosen.letter(ours) != self.words.word(other).letter(theirs) {
                return false;
            }
        }
        true
    }

    /// Restrict `slot` to its chosen word and propagate from the arcs that
    /// assignment invalidated. The caller rolls the trail back on failure.
    fn forward_check_from(&mut self, slot: SlotId, word: WordId) -> Result<(), PropagationFailure> {
        self.domains.restrict_to(slot, word);
        let arcs: Vec<(SlotId, SlotId)> = self
            .grid
            .neighbors(slot)
            .iter()
            .copied()
            .filter(|&neighbor| self.assignment.get(neighbor).is_none())
            .map(|neighbor| (neighbor, slot))
            .collect();
        ac3(&mut self.domains, self.words, self.grid, Some(arcs))
    }

    fn out_of_budget(&self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() > deadline {
                return true;
            }
        }
        if let Some(limit) = self.node_limit {
            if self.nodes_expanded >= limit {
                return true;
            }
        }
        false
    }
}
