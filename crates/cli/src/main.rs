//! Testbench CLI for compiled circuit models.
//!
//! This binary runs one simulation of a circuit model compiled into a shared library. It performs:
//! 1. **Argument resolution:** `MEMORY_IMAGE_PATH [CYCLE_COUNT]` into an absolute path and a cycle budget.
//! 2. **Bring-up:** Publishes the path in `MEMORY_FILE_PATH`, loads the model, applies reset.
//! 3. **Run:** Toggles the clock until the model finishes or the budget is reached.
//!
//! Exit status is 0 for a completed run (either reason) and 1 for usage or configuration errors.

use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use vtb_core::common::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use vtb_core::common::{ArgError, HarnessError};
use vtb_core::model::SharedLibraryFactory;
use vtb_core::{Config, RunConfig, sim};

/// Usage name of the model library option.
const MODEL_ARG: &str = "--model <LIB>";

#[derive(Parser, Debug)]
#[command(
    name = "vtb",
    author,
    version,
    about = "Cycle-driven testbench for compiled circuit models",
    long_about = "Load a circuit model from a shared library, publish the memory image path in \
                  MEMORY_FILE_PATH while it is constructed and reset, then toggle the clock until \
                  the model finishes or CYCLE_COUNT cycles have run.\n\nExamples:\n  \
                  vtb -m obj_dir/libcore_top.so tests/add.hex\n  \
                  vtb -m obj_dir/libcore_top.so tests/loop.hex 100000 --stats"
)]
struct Cli {
    /// Initial memory image read by the model (made absolute).
    #[arg(value_name = "MEMORY_IMAGE_PATH")]
    memory_file: Option<PathBuf>,

    /// Number of clock cycles to run; 0 or absent runs until the model finishes.
    #[arg(value_name = "CYCLE_COUNT", allow_negative_numbers = true)]
    cycles: Option<String>,

    /// Shared library exporting the vtb model ABI.
    #[arg(short, long, env = "VTB_MODEL", value_name = "LIB")]
    model: Option<PathBuf>,

    /// JSON harness configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the run summary when the simulation stops.
    #[arg(long)]
    stats: bool,
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are reported through clap errors too.
            let code = if e.use_stderr() {
                EXIT_FAILURE
            } else {
                EXIT_SUCCESS
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        if e.is_usage() {
            eprintln!("{}", Cli::command().render_usage());
        }
        process::exit(e.exit_code());
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolves the run configuration and drives one simulation to completion.
fn run(cli: Cli) -> Result<(), HarnessError> {
    let (run, model, mut config) = resolve(cli.memory_file, cli.cycles, cli.model, cli.config)?;
    if cli.stats {
        config.print_summary = true;
    }

    tracing::info!(
        memory = %run.memory_image_path().display(),
        cycle_budget = run.cycle_budget(),
        library = %model.display(),
        "starting simulation"
    );
    let summary = sim::simulate(&run, &config, SharedLibraryFactory::new(model))?;
    if config.print_summary {
        summary.print();
    }
    Ok(())
}

/// Validates every input before anything touches the environment or loads a library.
fn resolve(
    memory_file: Option<PathBuf>,
    cycles: Option<String>,
    model: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<(RunConfig, PathBuf, Config), HarnessError> {
    let run = RunConfig::resolve(memory_file.as_deref(), cycles.as_deref())?;
    let model = model.ok_or(ArgError::Usage { missing: MODEL_ARG })?;
    let config = match config {
        Some(path) => Config::from_json_file(&path)?,
        None => Config::default(),
    };
    Ok((run, model, config))
}
