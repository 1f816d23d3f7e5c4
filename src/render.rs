//! Projection of an assignment onto the 2D letter grid.

use crate::grid::Grid;
use crate::solver::Assignment;
use crate::words::WordList;

/// Lay the assigned words into a row-major grid of letters. Cells not
/// covered by an assigned slot stay `None`.
pub fn letter_grid(grid: &Grid, words: &WordList, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; grid.width()]; grid.height()];
    for (slot_id, word_id) in assignment.iter() {
        let word = words.word(word_id);
        for (k, (row, col)) in grid.slot(slot_id).cells().enumerate() {
            letters[row][col] = Some(word.letter(k));
        }
    }
    letters
}

/// Format the grid as text: blocked cells as `█`, unfilled open cells as
/// spaces, one row per line.
pub fn render_text(grid: &Grid, words: &WordList, assignment: &Assignment) -> String {
    let letters = letter_grid(grid, words, assignment);
    let mut out = String::new();
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            if grid.is_open(row, col) {
                out.push(letters[row][col].unwrap_or(' '));
            } else {
                out.push('█');
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_grid_places_words() {
        let grid = Grid::parse("___\n#_#\n#_#").unwrap();
        let words = WordList::new(["CAT", "ANT"]);
        let mut assignment = Assignment::new(grid.slot_count());
        // Across CAT, down ANT crossing on the shared 'A'.
        assignment.set(0, 0);
        assignment.set(1, 1);

        let letters = letter_grid(&grid, &words, &assignment);
        assert_eq!(letters[0], vec![Some('C'), Some('A'), Some('T')]);
        assert_eq!(letters[1][1], Some('N'));
        assert_eq!(letters[2][1], Some('T'));
        assert_eq!(letters[1][0], None);
    }

    #[test]
    fn test_render_text_marks_blocked_cells() {
        let grid = Grid::parse("___\n#_#\n#_#").unwrap();
        let words = WordList::new(["CAT", "ANT"]);
        let mut assignment = Assignment::new(grid.slot_count());
        assignment.set(0, 0);
        assignment.set(1, 1);

        assert_eq!(render_text(&grid, &words, &assignment), "CAT\n█N█\n█T█\n");
    }

    #[test]
    fn test_partial_assignment_leaves_spaces() {
        let grid = Grid::parse("___\n#_#\n#_#").unwrap();
        let words = WordList::new(["CAT", "ANT"]);
        let mut assignment = Assignment::new(grid.slot_count());
        assignment.set(0, 0);

        assert_eq!(render_text(&grid, &words, &assignment), "CAT\n█ █\n█ █\n");
    }
}
