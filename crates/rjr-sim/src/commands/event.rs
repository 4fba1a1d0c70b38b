use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use rjr_core::{EventInput, FourVector};
use rjr_obs::evaluate_event;

use super::{load_config, load_topology};

#[derive(Args, Debug)]
pub struct EventArgs {
    /// JSON file holding `{"visible": [{"px":..,"py":..,"pz":..,"e":..}, ..], "met": [x, y]}`.
    #[arg(long, conflicts_with_all = ["lepton", "met"])]
    pub input: Option<PathBuf>,
    /// Visible object as `px,py,pz,e`; repeat for each object.
    #[arg(long, value_parser = parse_four_vector, allow_hyphen_values = true)]
    pub lepton: Vec<FourVector>,
    /// Missing transverse momentum as `x,y`.
    #[arg(long, value_parser = parse_met, allow_hyphen_values = true)]
    pub met: Option<[f64; 2]>,
    /// Optional YAML solver configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &EventArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_deref())?;
    let topology = load_topology()?;
    let input = match &args.input {
        Some(path) => serde_json::from_str::<EventInput>(&fs::read_to_string(path)?)?,
        None => EventInput::new(args.lepton.clone(), args.met.unwrap_or([0.0, 0.0])),
    };
    let record = evaluate_event(&topology, &input, &config)?;
    println!("{}", serde_json::to_string_pretty(&record.to_map())?);
    Ok(())
}

fn parse_components<const N: usize>(value: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got {}", parts.len()));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|err| format!("invalid number `{part}`: {err}"))?;
    }
    Ok(out)
}

fn parse_four_vector(value: &str) -> Result<FourVector, String> {
    let [px, py, pz, e] = parse_components::<4>(value)?;
    Ok(FourVector::new(px, py, pz, e))
}

fn parse_met(value: &str) -> Result<[f64; 2], String> {
    parse_components::<2>(value)
}
