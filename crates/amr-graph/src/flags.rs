use std::collections::BTreeMap;

use amr_core::provenance::SchemaVersion;
use amr_core::{EDGE_LABEL, HEXAGON_LABEL, QUAD_LABEL};
use serde::{Deserialize, Serialize};

/// Schema version written by this crate's serializers.
pub const GRAPH_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Configuration options that control the behaviour of [`MeshGraph`](crate::MeshGraph).
///
/// The default configuration is permissive: duplicate simple edges are
/// accepted and hyperedge arity is not checked against its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// What to do when a simple edge would duplicate an existing node pair.
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    /// Optional label to arity table enforced on every new edge.
    #[serde(default)]
    pub label_arity: Option<BTreeMap<String, usize>>,
    /// Schema version stored alongside serialized payloads.
    #[serde(default = "default_schema")]
    pub schema_version: SchemaVersion,
}

fn default_schema() -> SchemaVersion {
    GRAPH_SCHEMA
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Allow,
            label_arity: None,
            schema_version: GRAPH_SCHEMA,
        }
    }
}

impl GraphConfig {
    /// Configuration that rejects duplicate simple edges and enforces the
    /// grammar's arities (`E` = 2, `Q` = 4, `S` = 6).
    pub fn strict() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            label_arity: Some(grammar_arities()),
            ..Self::default()
        }
    }

    /// Returns the enforced arity for `label`, if any.
    pub fn expected_arity(&self, label: &str) -> Option<usize> {
        self.label_arity
            .as_ref()
            .and_then(|table| table.get(label).copied())
    }
}

/// Arity expected for each grammar label.
pub fn grammar_arities() -> BTreeMap<String, usize> {
    BTreeMap::from([
        (EDGE_LABEL.to_string(), 2),
        (QUAD_LABEL.to_string(), 4),
        (HEXAGON_LABEL.to_string(), 6),
    ])
}

/// Handling of a second simple edge between the same unordered node pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Store the duplicate; lookups keep returning the first one inserted.
    #[default]
    Allow,
    /// Refuse the insertion with a `duplicate-edge` error.
    Reject,
}
