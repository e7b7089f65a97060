use anyhow::Result;
use clap::Parser;
use pathadd::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
