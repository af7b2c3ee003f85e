//! CLI entry point for the Boggle solver.
//!
//! Usage:
//!   boggle-solver solve <board.json> --lexicon <words.txt> [options]
//!   boggle-solver solve --stdin --lexicon <words.txt> [options]
//!   boggle-solver solve --width 4 --height 4 --letters <letters> --lexicon <words.txt>
//!   boggle-solver lookup --lexicon <words.txt> <word>...
//!
//! Options:
//!   --min-word-length <n>   Minimum letters in a reported word (default: 3)
//!   --max-board-cells <n>   Largest board accepted, in cells (default: 4096)
//!   --timeout <seconds>     Stop the search after this long (default: none)
//!   --paths                 Include the cell path of each word
//!
//! The lexicon path may also be set with BOGGLE_LEXICON. Logging goes to
//! stderr and is controlled by RUST_LOG.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use boggle_solver::{
    Board, BoardConfig, Lexicon, Position, SolveReport, Solver, SolverConfig, MAX_BOARD_CELLS,
    MIN_WORD_LENGTH,
};

#[derive(Parser)]
#[command(name = "boggle-solver")]
#[command(about = "Find every dictionary word on a Boggle-style letter grid")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LexiconArgs {
    /// Word list, one word per line
    #[arg(long, env = "BOGGLE_LEXICON", value_name = "FILE")]
    lexicon: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a board and print every word found
    Solve {
        /// Path to board JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE", conflicts_with_all = ["stdin", "letters"])]
        file: Option<PathBuf>,

        /// Read board JSON from stdin instead of file
        #[arg(long, conflicts_with = "letters")]
        stdin: bool,

        /// Board width, for an inline board
        #[arg(long, requires_all = ["height", "letters"])]
        width: Option<i32>,

        /// Board height, for an inline board
        #[arg(long, requires_all = ["width", "letters"])]
        height: Option<i32>,

        /// Board letters row by row, for an inline board
        #[arg(long, requires_all = ["width", "height"])]
        letters: Option<String>,

        #[command(flatten)]
        lexicon: LexiconArgs,

        /// Minimum letters in a reported word
        #[arg(long, default_value_t = MIN_WORD_LENGTH)]
        min_word_length: usize,

        /// Largest board accepted, in cells
        #[arg(long, default_value_t = MAX_BOARD_CELLS)]
        max_board_cells: usize,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Include the cell path of each word in the output
        #[arg(long)]
        paths: bool,
    },
    /// Check whether words and prefixes are in the lexicon
    Lookup {
        #[command(flatten)]
        lexicon: LexiconArgs,

        /// Words to look up
        #[arg(value_name = "WORD", required = true)]
        words: Vec<String>,
    },
}

/// Output format for a solved board
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    words: Vec<String>,
    count: usize,
    search_exhausted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<String>,
    nodes_explored: usize,
    branches_pruned: usize,
    time_elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<BTreeMap<String, Vec<Position>>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupOutput {
    query: String,
    is_word: bool,
    is_partial_word: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Solve {
            file,
            stdin,
            width,
            height,
            letters,
            lexicon,
            min_word_length,
            max_board_cells,
            timeout,
            paths,
        } => {
            let board = match (width, height, letters) {
                (Some(width), Some(height), Some(letters)) => BoardConfig {
                    width,
                    height,
                    letters,
                },
                _ => read_board_config(file.as_deref(), stdin)?,
            }
            .into_board()
            .context("invalid board")?;

            let config = SolverConfig {
                min_word_length,
                max_board_cells,
                timeout: timeout.map(Duration::from_secs),
            };
            let solver = Solver::with_config(load_lexicon(&lexicon.lexicon)?, config);

            let report = solver.solve(&board);
            let output = format_report(&board, report, paths);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Commands::Lookup { lexicon, words } => {
            let lexicon = load_lexicon(&lexicon.lexicon)?;
            let output: Vec<LookupOutput> = words
                .into_iter()
                .map(|query| LookupOutput {
                    is_word: lexicon.is_word(&query),
                    is_partial_word: lexicon.is_partial_word(&query),
                    query,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

fn read_board_config(file: Option<&Path>, stdin: bool) -> Result<BoardConfig> {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        bail!("provide a board file, --stdin, or --width/--height/--letters");
    };

    serde_json::from_str(&json_content).context("failed to parse board JSON")
}

fn load_lexicon(path: &Path) -> Result<Lexicon> {
    let lexicon = Lexicon::load(path)?;
    if lexicon.is_empty() {
        tracing::warn!(path = %path.display(), "word list is empty");
    }
    Ok(lexicon)
}

fn format_report(board: &Board, report: SolveReport, include_paths: bool) -> SolveOutput {
    tracing::info!(
        width = board.width(),
        height = board.height(),
        words = report.found.len(),
        "solved board"
    );

    let mut words: Vec<String> = report.found.keys().cloned().collect();
    words.sort_unstable();

    SolveOutput {
        count: words.len(),
        words,
        search_exhausted: report.search_exhausted,
        rejection: report.rejection,
        nodes_explored: report.nodes_explored,
        branches_pruned: report.branches_pruned,
        time_elapsed_ms: report.time_elapsed_ms,
        paths: include_paths.then(|| report.found.into_iter().collect()),
    }
}
