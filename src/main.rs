use clap::Parser;
use trendgate::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
