use std::process::ExitCode;

use colored::*;
use minifs_alloc::{
    fs::config::CliArgs,
    shell::{select_strategy, start_shell},
    FsConfig,
};

fn main() -> ExitCode {
    env_logger::init();

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => return usage(&e),
    };

    let strategy = match args.strategy.map_or_else(select_strategy, Ok) {
        Ok(strategy) => strategy,
        Err(e) => return usage(&e),
    };

    let config = FsConfig::new(strategy).with_placement(args.placement);
    match start_shell(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌ Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn usage(error: &dyn std::error::Error) -> ExitCode {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
    eprintln!("Usage: minifs-alloc [contiguous|chained|indexed] [--seed N | --sequential]");
    ExitCode::FAILURE
}
