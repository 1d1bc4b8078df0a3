// Binary entry point: parse arguments, fetch, analyse, print
use std::process::ExitCode;

use clap::Parser;
use tokio::runtime::Runtime;

use equity_lens::Cli;
use equity_lens::commands::execute;
use equity_lens::output::render;

fn main() -> ExitCode {
    // Default to Info; RUST_LOG still overrides
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Cli::parse();

    #[cfg(debug_assertions)]
    log::debug!("Args: {:?}", args);

    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = rt
        .block_on(execute(&args))
        .and_then(|report| render(&report, args.json));

    match result {
        Ok(text) => {
            println!("{}", text.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
