#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use tsmix_cli::args::{CliArgs, Command};
use tsmix_cli::driver::{self, Severity};
use tsmix_cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_CHECK_FAILED: i32 = 1;

fn main() -> Result<()> {
    // Only installs a subscriber when TSMIX_LOG or RUST_LOG is set.
    tsmix_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let pretty = args
        .pretty
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    let reporter = Reporter::new(pretty);

    match args.command {
        Command::Inspect {
            scenario,
            json,
            keys,
        } => {
            let composition = driver::load(&scenario)?;
            let report = composition.inspect(&keys)?;
            if json {
                let text = serde_json::to_string_pretty(&report)
                    .context("failed to serialize report")?;
                println!("{text}");
            } else {
                print!("{}", reporter.render_report(&report));
            }
            Ok(())
        }
        Command::Check { scenario, json } => {
            let composition = driver::load(&scenario)?;
            let findings = composition.check()?;
            if json {
                let text = serde_json::to_string_pretty(&findings)
                    .context("failed to serialize findings")?;
                println!("{text}");
            } else {
                print!("{}", reporter.render_findings(&findings));
            }
            if findings.iter().any(|f| f.severity == Severity::Error) {
                eprintln!("check failed for {}", scenario.display());
                std::process::exit(EXIT_CHECK_FAILED);
            }
            std::process::exit(EXIT_SUCCESS);
        }
    }
}
