//! Archbuild CLI - parallel multi-architecture Docker image builder
//!
//! Entry point for the archbuild command-line application.

use clap::{CommandFactory, Parser};

use archbuild::cli::output::display_error;
use archbuild::cli::Cli;
use archbuild::error::{exit_code, exit_code_for};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_directive())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Run the command and handle errors
    if let Err(e) = cli.run().await {
        display_error(&e);
        let code = exit_code_for(&e);
        if code == exit_code::USAGE {
            eprintln!("{}", Cli::command().render_usage());
        }
        std::process::exit(code);
    }
}
