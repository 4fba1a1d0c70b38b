use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use rjr_core::{EventInput, EventRng, RunProvenance};
use rjr_obs::evaluate_event;
use rjr_tree::topology_hash;
use serde_json::json;
use tracing::{info, warn};

use super::{load_config, load_topology};

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Number of events to generate.
    #[arg(long, default_value_t = 10)]
    pub events: u64,
    /// Master seed; event `n` uses the substream derived from `(seed, n)`.
    #[arg(long, default_value_t = 2024)]
    pub seed: u64,
    /// Optional YAML solver configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Upper bound of the generated lepton transverse momentum.
    #[arg(long, default_value_t = 200.0)]
    pub max_pt: f64,
    /// Upper bound of the generated missing transverse momentum.
    #[arg(long, default_value_t = 250.0)]
    pub max_met: f64,
}

pub fn run(args: &DemoArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_deref())?;
    let topology = load_topology()?;
    let provenance = RunProvenance::for_topology(topology_hash(&topology.analysis)).with_seed(args.seed);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", serde_json::to_string(&json!({ "provenance": provenance }))?)?;

    let mut skipped = 0u64;
    for index in 0..args.events {
        let input = generate_event(args, index);
        match evaluate_event(&topology, &input, &config) {
            Ok(record) => {
                let line = json!({ "event": index, "observables": record.to_map() });
                writeln!(out, "{}", serde_json::to_string(&line)?)?;
            }
            Err(err) => {
                warn!(event = index, error = %err, "event skipped");
                skipped += 1;
            }
        }
    }
    info!(events = args.events, skipped, "demo finished");
    Ok(())
}

fn generate_event(args: &DemoArgs, index: u64) -> EventInput {
    let mut rng = EventRng::for_event(args.seed, index);
    let max_pt = args.max_pt.max(10.0);
    let l1 = rng.massless_object(10.0, max_pt, 2.5);
    let l2 = rng.massless_object(10.0, max_pt, 2.5);
    let met = rng.transverse(args.max_met.max(0.0));
    EventInput::new(vec![l1, l2], met)
}
