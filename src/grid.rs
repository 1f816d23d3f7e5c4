//! Crossword grid representation: slots, overlaps, and neighbor relations.
//!
//! A grid is built either from a plain-text structure description (`_` marks
//! a fillable cell) or from an explicit slot list. Overlaps between crossing
//! slots are derived from the geometry at construction time, so the solver
//! never has to re-check cell arithmetic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// An identifier for a slot, based on its index in the grid's slot list.
pub type SlotId = usize;

/// The expected maximum number of slots crossing any single slot.
pub const MAX_CROSSINGS: usize = 8;

/// Direction that a slot runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

/// A maximal run of fillable cells in one direction: the unit of assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Self {
        Self {
            row,
            col,
            direction,
            length,
        }
    }

    /// The grid cell holding the k-th letter of this slot's word.
    pub fn cell(&self, k: usize) -> (usize, usize) {
        match self.direction {
            Direction::Across => (self.row, self.col + k),
            Direction::Down => (self.row + k, self.col),
        }
    }

    /// Cells of this slot in word order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.length).map(move |k| self.cell(k))
    }
}

/// Error raised when a grid description is malformed.
///
/// All of these are construction-time problems; a successfully built
/// [`Grid`] never produces them during solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("slot {slot} has zero length")]
    EmptySlot { slot: SlotId },
    #[error("slot {slot} extends outside the grid")]
    OutOfBounds { slot: SlotId },
    #[error("slots {a} and {b} run in the same direction through the same cell")]
    CollidingSlots { a: SlotId, b: SlotId },
    #[error("overlap between slots {a} and {b} falls outside a slot")]
    OverlapOutOfRange { a: SlotId, b: SlotId },
}

/// Immutable description of a puzzle: the open cells, the slots, and the
/// symmetric overlap table between crossing slots.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    open: Vec<Vec<bool>>,
    slots: Vec<Slot>,
    overlaps: HashMap<(SlotId, SlotId), (usize, usize)>,
    neighbors: Vec<SmallVec<[SlotId; MAX_CROSSINGS]>>,
}

impl Grid {
    /// Build a grid from an explicit slot list.
    ///
    /// Overlaps and neighbor lists are derived from slot geometry. The open
    /// cells are exactly the cells covered by some slot.
    pub fn from_slots(width: usize, height: usize, slots: Vec<Slot>) -> Result<Self, GridError> {
        for (id, slot) in slots.iter().enumerate() {
            if slot.length == 0 {
                return Err(GridError::EmptySlot { slot: id });
            }
            let (end_row, end_col) = slot.cell(slot.length - 1);
            if slot.row >= height || slot.col >= width || end_row >= height || end_col >= width {
                return Err(GridError::OutOfBounds { slot: id });
            }
        }

        let mut slots_by_cell: HashMap<(usize, usize), Vec<(SlotId, usize)>> = HashMap::new();
        for (id, slot) in slots.iter().enumerate() {
            for (k, cell) in slot.cells().enumerate() {
                slots_by_cell.entry(cell).or_default().push((id, k));
            }
        }

        let mut overlaps = HashMap::new();
        let mut neighbors: Vec<SmallVec<[SlotId; MAX_CROSSINGS]>> =
            vec![SmallVec::new(); slots.len()];

        for entries in slots_by_cell.values() {
            for i in 0..entries.len() {
                for j in i + 1..entries.len() {
                    let (a, ka) = entries[i];
                    let (b, kb) = entries[j];
                    if slots[a].direction == slots[b].direction {
                        return Err(GridError::CollidingSlots {
                            a: a.min(b),
                            b: a.max(b),
                        });
                    }
                    if ka >= slots[a].length || kb >= slots[b].length {
                        return Err(GridError::OverlapOutOfRange { a, b });
                    }
                    overlaps.insert((a, b), (ka, kb));
                    overlaps.insert((b, a), (kb, ka));
                    neighbors[a].push(b);
                    neighbors[b].push(a);
                }
            }
        }

        // Sorted neighbor lists keep propagation order reproducible.
        for list in &mut neighbors {
            list.sort_unstable();
        }

        let mut open = vec![vec![false; width]; height];
        for slot in &slots {
            for (row, col) in slot.cells() {
                open[row][col] = true;
            }
        }

        Ok(Self {
            width,
            height,
            open,
            slots,
            overlaps,
            neighbors,
        })
    }

    /// Parse a plain-text structure description.
    ///
    /// Each `_` is a fillable cell; every other character is blocked. Slots
    /// are the maximal horizontal and vertical runs of at least two fillable
    /// cells. Shorter lines are padded with blocked cells.
    pub fn parse(structure: &str) -> Result<Self, GridError> {
        let lines: Vec<&str> = structure
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        let height = lines.len();
        let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);

        let mut open = vec![vec![false; width]; height];
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                open[row][col] = ch == '_';
            }
        }

        let mut slots = Vec::new();
        for row in 0..height {
            let mut col = 0;
            while col < width {
                if open[row][col] && (col == 0 || !open[row][col - 1]) {
                    let mut len = 0;
                    while col + len < width && open[row][col + len] {
                        len += 1;
                    }
                    if len >= 2 {
                        slots.push(Slot::new(row, col, Direction::Across, len));
                    }
                    col += len;
                } else {
                    col += 1;
                }
            }
        }
        for col in 0..width {
            let mut row = 0;
            while row < height {
                if open[row][col] && (row == 0 || !open[row - 1][col]) {
                    let mut len = 0;
                    while row + len < height && open[row + len][col] {
                        len += 1;
                    }
                    if len >= 2 {
                        slots.push(Slot::new(row, col, Direction::Down, len));
                    }
                    row += len;
                } else {
                    row += 1;
                }
            }
        }

        let mut grid = Self::from_slots(width, height, slots)?;
        // Keep single-cell openings visible to the renderer even though they
        // never become slots.
        grid.open = open;
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, id: SlotId) -> &Slot {
        &self.slots[id]
    }

    /// Whether the cell at (row, col) is fillable.
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        self.open[row][col]
    }

    /// The letter indices shared by two crossing slots, or `None` if the
    /// slots do not cross. Symmetric: `overlap(y, x)` is the swapped pair.
    pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<(usize, usize)> {
        self.overlaps.get(&(x, y)).copied()
    }

    /// Slots whose cell spans intersect slot `x`, in ascending id order.
    pub fn neighbors(&self, x: SlotId) -> &[SlotId] {
        &self.neighbors[x]
    }

    /// Number of slots crossing slot `x`.
    pub fn degree(&self, x: SlotId) -> usize {
        self.neighbors[x].len()
    }
}
