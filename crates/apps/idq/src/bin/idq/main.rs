use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use idqueue::Identifier;

mod commands;
#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(name = "idq", about = "Inspect and edit bounded identifier record files")]
struct Cli {
    /// TOML queue config supplying the default file and capacity.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every complete record, oldest first.
    Inspect {
        file: PathBuf,
        #[arg(long, default_value_t = false)]
        hex: bool,
    },
    /// Add identifiers to a record file, evicting the oldest past capacity.
    Add {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        capacity: Option<usize>,
        #[arg(required = true)]
        ids: Vec<Identifier>,
    },
    /// Rewrite a record file keeping only the newest `capacity` records.
    Trim {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        capacity: usize,
    },
    /// Print random identifiers.
    Generate {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let stdout = io::stdout();
    if let Err(err) = commands::run(cli, &mut stdout.lock()) {
        eprintln!("idq error: {err:#}");
        std::process::exit(1);
    }
}
