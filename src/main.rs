//! CLI entry point for the crossword solver.
//!
//! Usage:
//!   crossword-solver <structure> <words> [options]
//!
//! Options:
//!   --output <file>       Also write the solved grid to a file
//!   --seed <n>            Seed for heuristic tie-breaking
//!   --no-forward-check    Disable forward checking during search
//!   --timeout <seconds>   Maximum search time
//!   --node-limit <n>      Maximum assignments to explore
//!   --json                Emit a JSON report instead of the text grid

mod consistency;
mod domains;
mod grid;
mod ordering;
mod render;
mod solver;
mod words;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use grid::{Direction, Grid};
use render::render_text;
use solver::{solve_with_config, SolverConfig, SolverResult};
use words::WordList;

#[derive(Parser)]
#[command(name = "crossword-solver")]
#[command(about = "Crossword grid filler built on arc consistency and backtracking search")]
#[command(version)]
struct Cli {
    /// Path to the grid structure file ('_' marks fillable cells)
    #[arg(value_name = "STRUCTURE")]
    structure: PathBuf,

    /// Path to the vocabulary file, one word per line
    #[arg(value_name = "WORDS")]
    words: PathBuf,

    /// Also write the solved grid to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Seed for heuristic tie-breaking
    #[arg(long)]
    seed: Option<u64>,

    /// Disable forward checking during search
    #[arg(long)]
    no_forward_check: bool,

    /// Maximum search time in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of assignments to explore
    #[arg(long)]
    node_limit: Option<usize>,

    /// Emit a JSON report instead of the text grid
    #[arg(long)]
    json: bool,
}

/// Output format for the JSON report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    search_exhausted: bool,
    nodes_expanded: usize,
    backtracks: usize,
    time_elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entries: Option<Vec<EntryOutput>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryOutput {
    row: usize,
    col: usize,
    direction: Direction,
    length: usize,
    word: String,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let structure_text = fs::read_to_string(&cli.structure).unwrap_or_else(|e| {
        eprintln!("Error reading structure file {:?}: {}", cli.structure, e);
        std::process::exit(1);
    });
    let grid = match Grid::parse(&structure_text) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error parsing structure: {}", e);
            std::process::exit(1);
        }
    };
    let word_list = WordList::load(&cli.words).unwrap_or_else(|e| {
        eprintln!("Error reading words file {:?}: {}", cli.words, e);
        std::process::exit(1);
    });

    let config = SolverConfig {
        seed: cli.seed,
        forward_check: !cli.no_forward_check,
        timeout: cli.timeout.map(Duration::from_secs),
        node_limit: cli.node_limit,
    };

    let result = solve_with_config(&grid, &word_list, &config);
    let solved = result.assignment.is_some();

    let rendered = result
        .assignment
        .as_ref()
        .map(|assignment| render_text(&grid, &word_list, assignment));

    if cli.json {
        let output = format_result(&grid, &word_list, &result, rendered.clone());
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else if let Some(text) = &rendered {
        print!("{}", text);
    } else {
        println!("No solution.");
    }

    if let (Some(path), Some(text)) = (&cli.output, &rendered) {
        fs::write(path, text).unwrap_or_else(|e| {
            eprintln!("Error writing output file {:?}: {}", path, e);
            std::process::exit(1);
        });
    }

    if solved {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}

fn format_result(
    grid: &Grid,
    word_list: &WordList,
    result: &SolverResult,
    rendered: Option<String>,
) -> SolveOutput {
    let entries = result.assignment.as_ref().map(|assignment| {
        assignment
            .iter()
            .map(|(slot_id, word_id)| {
                let slot = grid.slot(slot_id);
                EntryOutput {
                    row: slot.row,
                    col: slot.col,
                    direction: slot.direction,
                    length: slot.length,
                    word: word_list.word(word_id).text.clone(),
                }
            })
            .collect()
    });

    SolveOutput {
        solved: result.assignment.is_some(),
        search_exhausted: result.search_exhausted,
        nodes_expanded: result.nodes_expanded,
        backtracks: result.backtracks,
        time_elapsed_ms: result.time_elapsed_ms,
        grid: rendered,
        entries,
    }
}
