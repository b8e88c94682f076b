//! Interactive puzzle sheet builder.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use puzzle_sheet::cli::{parse_failure_status, Cli};
use puzzle_sheet::config::SheetConfig;
use puzzle_sheet::console::StdConsole;
use puzzle_sheet::session;

fn main() -> ExitCode {
    // Before the subscriber: .env may set RUST_LOG
    let _ = dotenvy::dotenv();

    // Logs go to stderr so prompts on stdout stay readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_failure_status(&e));
        }
    };

    let result = SheetConfig::resolve(cli)
        .and_then(|config| session::run(config, &mut StdConsole::new()));

    match result {
        Ok(output) => {
            println!("tex file written: {}", output.tex.display());
            if let Some(pdf) = output.pdf {
                println!("PDF: {}", pdf.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Puzzle sheet failed");
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}
