use anyhow::Context;
use clap::Parser;
use kermes_receipt::logger::init_logger;
use kermes_receipt::{Cli, Config, Outcome, Shutdown};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Load .env file (ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = init_logger(&cli.log_level, cli.log_json) {
        eprintln!("Failed to initialize logger: {e}");
    }

    match try_main(Config::from(cli)) {
        Ok(outcome) => {
            tracing::debug!(?outcome, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = format!("{e:#}"), "receipt run failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(config: Config) -> anyhow::Result<Outcome> {
    let shutdown = Shutdown::install().context("failed to install signal handlers")?;
    tracing::debug!(?config, "starting");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    let outcome = kermes_receipt::run(&config, stdin.lock(), &mut stdout, &mut stderr, &shutdown)?;
    Ok(outcome)
}
