//! Wyrt CLI - Command line interface
//!
//! Runs a JSON script of runtime operations through the program entry layer.
//! Script output goes to stdout, logs go to stderr.

use clap::Parser;
use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

mod config;
mod logging;
mod script;

use crate::config::{parse_level, parse_override, to_runtime_level, LogConfig, CLI_TARGET};
use crate::logging::{LogFormat, TracingSink};
use crate::script::{init_chain, Interpreter, Script};
use tracing::{debug, error, info, warn};
use wyrt_api::{fatal, init_config, run_program, RunConfig};
use wyrt_config::{Component, DebugConfig, RuntimeConfig};

#[derive(Parser)]
#[command(
    name = "wyrt",
    about = "Wyrt runtime - run a JSON script of runtime operations",
    version
)]
struct Cli {
    /// Trace box deallocations and chunk splits
    #[arg(short = 'D', long = "debug")]
    debug: bool,

    /// Global log level: silent, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL", default_value = "warn", value_parser = parse_level)]
    log_level: tracing::Level,

    /// Per-component log level, e.g. `tree=debug` (repeatable)
    #[arg(long = "log", value_name = "COMPONENT=LEVEL", value_parser = parse_override)]
    log: Vec<(Component, tracing::Level)>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Also append logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Runtime log records kept for the dump on fatal errors (0 disables it)
    #[arg(long, value_name = "N", default_value_t = 256)]
    ring_size: usize,

    /// Script file
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let log_config = build_log_config(&cli);

    if let Err(e) = logging::init_with_file(&log_config, cli.log_format, cli.log_file.as_deref()) {
        eprintln!("Error: cannot open log file: {e}");
        process::exit(1);
    }

    let script = match Script::load(&cli.script) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    info!(
        target: CLI_TARGET,
        "loaded '{}': {} init blocks, {} steps",
        cli.script.display(),
        script.init.len(),
        script.steps.len()
    );

    let run_config = build_run_config(&cli, &log_config);
    if init_config(run_config.clone()).is_err() {
        warn!(target: CLI_TARGET, "global config was already initialized");
    }

    let interpreter = Rc::new(RefCell::new(Interpreter::new(
        io::stdout(),
        run_config.runtime.list.default_size_hint,
    )));
    let chain = init_chain(&script, &interpreter);

    let outcome = run_program(&run_config, chain, |rt, sys| {
        debug!(target: CLI_TARGET, "system object {:?}", sys);
        interpreter.borrow_mut().run_steps(rt, &script.steps)
    });
    if let Err(e) = outcome {
        fatal(&run_config, &e);
    }

    let mut interpreter = interpreter.borrow_mut();
    if let Some(e) = interpreter.take_failure() {
        error!(target: CLI_TARGET, "{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
    info!(target: CLI_TARGET, "{} steps executed", interpreter.executed());
}

/// Build the tracing filter configuration from the command line
fn build_log_config(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::new(cli.log_level);
    for &(component, level) in &cli.log {
        config.set(component, level);
    }
    if cli.debug {
        config.with_debug_defaults()
    } else {
        config
    }
}

/// Build run configuration: runtime switches plus a logger forwarding to tracing
fn build_run_config(cli: &Cli, log_config: &LogConfig) -> RunConfig {
    let runtime = RuntimeConfig {
        debug: if cli.debug {
            DebugConfig::all()
        } else {
            DebugConfig::default()
        },
        ..RuntimeConfig::default()
    };

    let mut logging = wyrt_log::LogConfig::new(to_runtime_level(log_config.most_verbose()));
    if cli.ring_size > 0 {
        logging = logging.with_ring_buffer(cli.ring_size);
    }

    let config = RunConfig::with_logging(runtime, logging);
    config.logger.add_sink(TracingSink);
    config
}
