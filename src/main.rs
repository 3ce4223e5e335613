use clap::Parser;

use crate::cli::Cli;
use primitive_cache::run;

mod cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli.into())
}
