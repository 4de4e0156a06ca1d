//! gridcalc CLI - formula evaluation and grid calculation tool

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gridcalc::prelude::*;
use gridcalc::{evaluate_formula, lex, parse, CsvReadOptions, CsvWriteOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "gridcalc")]
#[command(author, version, about = "Spreadsheet formula evaluation tool")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single formula, optionally against a CSV grid
    Eval {
        /// Formula text (a leading '=' is optional)
        formula: String,

        /// CSV grid the formula's references are resolved against
        #[arg(short, long)]
        grid: Option<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Calculate every formula in a CSV grid and write the results as CSV
    Calc {
        /// Input CSV grid
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort on the first circular reference
        #[arg(long)]
        stop_on_cycle: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Show the tokens and the parse tree of a formula
    Parse {
        /// Formula text (a leading '=' is optional)
        formula: String,
    },
}

#[derive(Args)]
struct EngineArgs {
    /// Resolve referenced cells again every time they are read
    #[arg(long)]
    no_cache: bool,

    /// Field delimiter for CSV grids (default: comma)
    #[arg(short, long, default_value = ",")]
    delimiter: char,
}

impl EngineArgs {
    fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            cache_cells: !self.no_cache,
        }
    }

    fn delimiter(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("Delimiter must be a single ASCII character");
        }
        Ok(self.delimiter as u8)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Eval {
            formula,
            grid,
            engine,
        } => eval(&formula, grid.as_deref(), &engine),
        Commands::Calc {
            input,
            output,
            stop_on_cycle,
            engine,
        } => calc(&input, output.as_deref(), stop_on_cycle, &engine),
        Commands::Parse { formula } => show_parse(&formula),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_grid(path: &Path, engine: &EngineArgs) -> Result<Grid> {
    let options = CsvReadOptions {
        delimiter: engine.delimiter()?,
        ..Default::default()
    };
    CsvReader::read_file(path, &options)
        .with_context(|| format!("Failed to read '{}'", path.display()))
}

fn eval(formula: &str, grid_path: Option<&Path>, engine: &EngineArgs) -> Result<()> {
    let grid = match grid_path {
        Some(path) => load_grid(path, engine)?,
        None => Grid::new(),
    };
    debug!(cells = grid.len(), "grid loaded");

    let functions = FunctionRegistry::standard();
    let ctx = EvaluationContext::new(&grid, &functions).with_options(engine.evaluation_options());
    let value = evaluate_formula(formula, &ctx)
        .with_context(|| format!("Failed to evaluate '{}'", formula))?;

    println!("{}", value);
    Ok(())
}

fn calc(
    input: &Path,
    output: Option<&Path>,
    stop_on_cycle: bool,
    engine: &EngineArgs,
) -> Result<()> {
    let mut grid = load_grid(input, engine)?;

    let options = CalculationOptions {
        evaluation: engine.evaluation_options(),
        stop_on_cycle,
    };
    let stats = grid
        .calculate_with(&FunctionRegistry::standard(), &options)
        .context("Failed to calculate formulas")?;

    eprintln!(
        "Calculated {} of {} formulas ({} errors, {} circular)",
        stats.cells_calculated, stats.formula_count, stats.errors, stats.circular_references
    );

    let write_options = CsvWriteOptions {
        delimiter: engine.delimiter()?,
        ..Default::default()
    };
    match output {
        Some(path) => {
            CsvWriter::write_file(&grid, path, &write_options)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            eprintln!("Wrote '{}'", path.display());
        }
        None => {
            CsvWriter::write(&grid, io::stdout().lock(), &write_options)
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn show_parse(formula: &str) -> Result<()> {
    let source = formula.trim_start();
    let source = source.strip_prefix('=').unwrap_or(source);

    let tokens = lex(source).context("Failed to tokenize formula")?;
    println!("Tokens:");
    for token in &tokens {
        println!("  {:>3}  {:<16} {}", token.position, token.kind.to_string(), token.value);
    }

    let ast = parse(&tokens).context("Failed to parse formula")?;
    println!("Tree: {}", ast);
    Ok(())
}
