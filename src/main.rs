// bytescope: run a tiny C-like program over simulated byte-addressable memory

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use bytescope::interpreter::constants::DEFAULT_MAX_CALL_DEPTH;
use bytescope::interpreter::engine::InterpreterConfig;
use bytescope::ui::ConsoleHost;

#[derive(Parser, Debug)]
#[command(name = "bytescope", version, about = "Run a C-subset program and watch its memory")]
struct Cli {
    /// Source file to run
    file: PathBuf,

    /// Maximum number of nested function calls
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn run(cli: &Cli, host: &mut ConsoleHost) -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(cli.log_level())
        .init()
        .context("failed to install logger")?;

    let source = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read '{}'", cli.file.display()))?;
    log::info!("running {}", cli.file.display());

    let config = InterpreterConfig {
        max_call_depth: cli.max_call_depth,
    };
    bytescope::run_source(&source, host, config)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut host = ConsoleHost::new(!cli.no_color);

    match run(&cli, &mut host) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", host.painter().error_line(format!("{:#}", err)));
            ExitCode::FAILURE
        }
    }
}
