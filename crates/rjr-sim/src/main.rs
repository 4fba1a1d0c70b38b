use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    demo::{self, DemoArgs},
    event::{self, EventArgs},
    topology::{self, TopologyArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "rjr-sim", about = "Recursive jigsaw reconstruction driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate seeded toy dilepton events and print their observables as JSON lines.
    Demo(DemoArgs),
    /// Evaluate a single event given on the command line or in a JSON file.
    Event(EventArgs),
    /// Print the dilepton topology and its canonical hash.
    Topology(TopologyArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Demo(args) => demo::run(&args),
        Command::Event(args) => event::run(&args),
        Command::Topology(args) => topology::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
