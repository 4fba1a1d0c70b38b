use std::error::Error;

use clap::Args;
use rjr_tree::topology_hash;
use serde::Serialize;

use super::load_topology;

#[derive(Args, Debug)]
pub struct TopologyArgs {
    /// Print only the canonical hash.
    #[arg(long)]
    pub hash_only: bool,
}

#[derive(Debug, Serialize)]
struct FrameView {
    name: String,
    role: &'static str,
    parent: Option<String>,
}

#[derive(Debug, Serialize)]
struct GroupView {
    name: String,
    kind: &'static str,
    frames: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TopologyView {
    hash: String,
    frames: Vec<FrameView>,
    groups: Vec<GroupView>,
    jigsaws: Vec<&'static str>,
}

pub fn run(args: &TopologyArgs) -> Result<(), Box<dyn Error>> {
    let topology = load_topology()?;
    let analysis = &topology.analysis;
    let hash = topology_hash(analysis);
    if args.hash_only {
        println!("{hash}");
        return Ok(());
    }

    let tree = analysis.tree();
    let frames = tree
        .depth_first()
        .iter()
        .map(|&id| FrameView {
            name: tree.name(id).to_string(),
            role: tree.role(id).map(|role| role.label()).unwrap_or("?"),
            parent: tree.parent(id).map(|parent| tree.name(parent).to_string()),
        })
        .collect();
    let groups = analysis
        .groups()
        .iter()
        .map(|group| GroupView {
            name: group.name().to_string(),
            kind: group.kind().label(),
            frames: group.frames().iter().map(|&id| tree.name(id).to_string()).collect(),
        })
        .collect();
    let jigsaws = analysis
        .execution_order()
        .iter()
        .filter_map(|&id| analysis.jigsaw(id))
        .map(|record| record.jigsaw().label())
        .collect();

    let view = TopologyView {
        hash,
        frames,
        groups,
        jigsaws,
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
