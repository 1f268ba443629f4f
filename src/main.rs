//! remora-correlate CLI Entry Point
//!
//! # Usage
//!
//! ```bash
//! remora-correlate --log nodeodm.log --remora-dir remora_1234 --out correlated/
//! ```
//!
//! Set `RUST_LOG=debug` for per-block and per-file detail, and
//! `REMORA_CORRELATE_CONFIG=keywords.json` to override the built-in
//! keyword and file-name lists.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use remora_correlate::{run, RunOptions, ACTIVE_CONFIG};

/// Correlate Remora output with NodeODM task logs.
#[derive(Debug, Parser)]
#[command(name = "remora-correlate", version)]
struct Cli {
    /// Path to nodeodm.log
    #[arg(long = "log")]
    log: PathBuf,

    /// Path to remora_<jobid> directory
    #[arg(long = "remora-dir")]
    remora_dir: PathBuf,

    /// Output directory
    #[arg(long = "out")]
    out: PathBuf,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    let options = RunOptions {
        log_path: cli.log,
        remora_dir: cli.remora_dir,
        out_dir: cli.out,
    };

    match run(&options, &ACTIVE_CONFIG) {
        Ok(outputs) => {
            println!("Wrote {}", outputs.events_csv.display());
            println!("Wrote {}", outputs.summary_txt.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Correlation failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
