use std::fs;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use tapeworm::{Engine, EngineConfig, EofBehavior, Streams};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Exit status for a malformed command line.
const USAGE_STATUS: i32 = -1;
/// Exit status when the script file cannot be read.
const UNREADABLE_STATUS: i32 = -7;

#[derive(Parser)]
#[command(name = "tapeworm", version, about = "Run a tape-machine script over stdin/stdout")]
struct Cli {
    /// Path of the script to execute.
    script: PathBuf,

    /// What `,` stores once standard input is exhausted.
    #[arg(long, value_enum, default_value_t = EofArg::MaxByte)]
    eof: EofArg,

    /// Print instruction and loop counters to stderr after a successful run.
    #[arg(long)]
    stats: bool,
}

/// Command-line names for [`EofBehavior`].
#[derive(Clone, Copy, ValueEnum)]
enum EofArg {
    /// Store 255.
    MaxByte,
    /// Store 0.
    Zero,
    /// Leave the cell untouched.
    Unchanged,
}

impl From<EofArg> for EofBehavior {
    fn from(arg: EofArg) -> Self {
        match arg {
            EofArg::MaxByte => EofBehavior::MaxByte,
            EofArg::Zero => EofBehavior::Zero,
            EofArg::Unchanged => EofBehavior::Unchanged,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(USAGE_STATUS);
            }
        },
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    process::exit(execute(&cli));
}

fn execute(cli: &Cli) -> i32 {
    let script = match fs::read(&cli.script) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Failed to open file '{}': {e}", cli.script.display());
            return UNREADABLE_STATUS;
        }
    };
    info!(path = %cli.script.display(), len = script.len(), "loaded script");

    let mut engine = Engine::with_config(Streams::stdio(), EngineConfig { eof: cli.eof.into() });
    match engine.run(&script) {
        Ok(stats) => {
            if cli.stats {
                eprintln!("Run statistics:");
                eprintln!("  Instructions:     {}", stats.instructions);
                eprintln!("  Loop iterations:  {}", stats.loop_iterations);
                eprintln!("  Final pointer:    {}", engine.tape().pointer());
            }
            0
        }
        Err(e) => {
            eprintln!("{e}");
            e.status()
        }
    }
}
