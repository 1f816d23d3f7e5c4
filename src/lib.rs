//! Crossword filling library.
//!
//! This crate models a crossword as a constraint-satisfaction problem:
//! slots are variables, the vocabulary is their shared domain, and crossing
//! cells are binary constraints. Solving combines node and arc consistency
//! (AC-3) with heuristic backtracking search.

pub mod consistency;
pub mod domains;
pub mod grid;
pub mod ordering;
pub mod render;
pub mod solver;
pub mod words;

// Re-export main types
pub use consistency::{ac3, enforce_node_consistency, revise, PropagationFailure};
pub use domains::{build_domains, Checkpoint, DomainStore};
pub use grid::{Direction, Grid, GridError, Slot, SlotId};
pub use ordering::{order_domain_values, select_unassigned_slot};
pub use render::{letter_grid, render_text};
pub use solver::{solve, solve_with_config, Assignment, SolverConfig, SolverResult};
pub use words::{Word, WordId, WordList};
