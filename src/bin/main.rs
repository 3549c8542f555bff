use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use windy_puzzle::algorithms::astar::SearchOutcome;
use windy_puzzle::problems::eight_puzzle::Board;
use windy_puzzle::problems::eight_puzzle::EightPuzzleProblem;
use windy_puzzle::problems::eight_puzzle::Wind;
use windy_puzzle::report::WriterSink;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Solves the 8-puzzle under wind with A*, printing every expanded board.
#[derive(Parser, Debug)]
#[clap(long_version = windy_puzzle::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Initial board, 9 tiles in reading order (`0`, `-` or `_` for the blank).
    #[arg(long, env = "PUZZLE_INITIAL", default_value = "1 6 2 5 7 8 0 4 3")]
    pub initial: Board,

    /// Goal board.
    #[arg(long, env = "PUZZLE_GOAL", default_value = "7 8 1 6 0 2 5 4 3")]
    pub goal: Board,

    /// Wind costs towards each direction.
    #[arg(long, env = "PUZZLE_WIND", default_value = "w=1,n=2,e=3,s=2")]
    pub wind: Wind,

    /// Start from a random walk of this many moves away from the goal instead.
    #[arg(long)]
    pub scramble: Option<usize>,
    #[arg(long, default_value_t = 0u64)]
    pub seed: u64,

    /// Give up after expanding this many boards.
    #[arg(long)]
    pub max_expansions: Option<usize>,

    /// Writes the expansions here instead of stdout.
    #[arg(short, long, env = "PUZZLE_TRACE")]
    pub output: Option<PathBuf>,

    /// Prints memory usage of the search.
    #[arg(long)]
    pub stats: bool,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn run<W: Write>(args: &Args, problem: EightPuzzleProblem, out: W) -> std::io::Result<()> {
    let mut search = problem.into_search();
    if let Some(limit) = args.max_expansions {
        search = search.with_expansion_limit(limit);
    }

    let mut sink = WriterSink::new(out);
    let outcome = search.explore(&mut sink);
    sink.finish()?;

    match outcome {
        SearchOutcome::GoalFound { goal, .. } => {
            println!(
                "{} after {} expansions, cost {}",
                "Goal found".green(),
                goal.index.bold(),
                goal.g.bold()
            );
        }
        SearchOutcome::Exhausted { expansions } => {
            println!(
                "{} ({} states expanded)",
                "No solution found".red(),
                expansions.bold()
            );
        }
        SearchOutcome::LimitReached { expansions } => {
            println!(
                "{} after {} expansions",
                "Gave up".yellow(),
                expansions.bold()
            );
        }
    }

    if args.stats {
        search.write_memory_stats(std::io::stdout().lock())?;
    }

    Ok(())
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    args.color.write_global();

    let mut problem = EightPuzzleProblem::new(args.initial, args.goal, args.wind);
    if let Some(steps) = args.scramble {
        let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
        problem = problem.randomize(&mut rng, steps);
    }
    if !problem.is_solvable() {
        println!(
            "{}: initial and goal boards have different parity",
            "Unsolvable".red()
        );
    }

    match &args.output {
        Some(path) => {
            println!("{}", problem);
            println!("Writing expansions to {}", path.display().yellow());
            let out = BufWriter::new(File::create(path)?);
            run(&args, problem, out)
        }
        None => {
            let out = BufWriter::new(std::io::stdout().lock());
            run(&args, problem, out)
        }
    }
}
