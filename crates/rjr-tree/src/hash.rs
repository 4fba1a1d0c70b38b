use sha2::{Digest, Sha256};

use crate::analysis::Analysis;
use crate::group::Cardinality;
use crate::ids::FrameId;

/// Canonical SHA-256 of the frame tree, its groups and jigsaws.
///
/// Covers names, roles, parent links, child order, group membership with
/// cardinalities, and every jigsaw with the frames it references.
pub fn topology_hash(analysis: &Analysis) -> String {
    let mut hasher = Sha256::new();
    let tree = analysis.tree();

    hasher.update(b"frames");
    hasher.update((tree.len() as u64).to_le_bytes());
    for id in tree.ids() {
        update_str(tree.name(id), &mut hasher);
        update_str(tree.role(id).map(|role| role.label()).unwrap_or("?"), &mut hasher);
        match tree.parent(id) {
            Some(parent) => {
                hasher.update(b"parent");
                hasher.update(parent.as_raw().to_le_bytes());
            }
            None => hasher.update(b"root"),
        }
        update_frames(tree.children(id), &mut hasher);
    }

    hasher.update(b"groups");
    hasher.update((analysis.groups().len() as u64).to_le_bytes());
    for group in analysis.groups() {
        update_str(group.name(), &mut hasher);
        update_str(group.kind().label(), &mut hasher);
        update_frames(group.frames(), &mut hasher);
        for cardinality in group.cardinalities() {
            match cardinality {
                Cardinality::AtLeast(n) => {
                    hasher.update(b"at-least");
                    hasher.update((*n as u64).to_le_bytes());
                }
                Cardinality::Exactly(n) => {
                    hasher.update(b"exactly");
                    hasher.update((*n as u64).to_le_bytes());
                }
            }
        }
    }

    hasher.update(b"jigsaws");
    for &id in analysis.execution_order() {
        if let Some(record) = analysis.jigsaw(id) {
            hasher.update(record.group().as_raw().to_le_bytes());
            update_str(record.jigsaw().label(), &mut hasher);
            update_frames(&record.jigsaw().referenced_frames(), &mut hasher);
        }
    }

    format!("{:x}", hasher.finalize())
}

fn update_str(value: &str, hasher: &mut Sha256) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn update_frames(frames: &[FrameId], hasher: &mut Sha256) {
    hasher.update((frames.len() as u64).to_le_bytes());
    for frame in frames {
        hasher.update(frame.as_raw().to_le_bytes());
    }
}
