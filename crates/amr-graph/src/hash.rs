use sha2::{Digest, Sha256};

use crate::flags::{DuplicatePolicy, GraphConfig};
use crate::hypergraph::MeshGraph;

/// Computes the canonical structural hash for the provided graph.
///
/// Covers node positions and labels plus the live edges in insertion order
/// with their node lists, labels and flags. Tombstoned slots do not
/// contribute.
pub fn canonical_hash(graph: &MeshGraph) -> String {
    let mut hasher = Sha256::new();
    encode_config(graph.config(), &mut hasher);

    hasher.update((graph.node_count() as u64).to_le_bytes());
    for (id, node) in graph.nodes() {
        hasher.update(id.as_raw().to_le_bytes());
        hasher.update(node.x().to_bits().to_le_bytes());
        hasher.update(node.y().to_bits().to_le_bytes());
        update_str(node.label(), &mut hasher);
    }

    hasher.update((graph.edge_count() as u64).to_le_bytes());
    for (_, edge) in graph.edges() {
        hasher.update((edge.arity() as u64).to_le_bytes());
        for node in edge.nodes() {
            hasher.update(node.as_raw().to_le_bytes());
        }
        update_str(edge.label(), &mut hasher);
        hasher.update([edge.r(), u8::from(edge.is_border())]);
    }

    format!("{:x}", hasher.finalize())
}

fn encode_config(config: &GraphConfig, hasher: &mut Sha256) {
    match config.duplicate_policy {
        DuplicatePolicy::Allow => hasher.update(b"duplicates:allow"),
        DuplicatePolicy::Reject => hasher.update(b"duplicates:reject"),
    }
    match &config.label_arity {
        None => hasher.update(b"arity:none"),
        Some(table) => {
            hasher.update(b"arity:table");
            hasher.update((table.len() as u64).to_le_bytes());
            for (label, arity) in table {
                update_str(label, hasher);
                hasher.update((*arity as u64).to_le_bytes());
            }
        }
    }
    hasher.update(config.schema_version.major.to_le_bytes());
    hasher.update(config.schema_version.minor.to_le_bytes());
    hasher.update(config.schema_version.patch.to_le_bytes());
}

fn update_str(value: &str, hasher: &mut Sha256) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
