//! SWE CLI - Command line tool for preparing SWE hindcast inputs.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "swe-cli",
    version,
    about = "Snow water equivalent hindcast preparation toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: swe_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    log::debug!("starting swe-cli");
    swe_cmd::run(cli.command)
}
