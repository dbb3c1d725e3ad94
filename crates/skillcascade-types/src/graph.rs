//! Annotated dependency graph view handed to presentation layers.

use serde::{Deserialize, Serialize};

use crate::catalog::{DomainId, EdgeKind};
use crate::health::HealthState;

/// A domain node carrying its current health and layout hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub domain_id: DomainId,
    pub name: String,
    /// Layout row (the domain's tier position).
    pub tier: u8,
    /// Position within the row, in catalog order.
    pub column: usize,
    pub independent: bool,
    pub avg: f64,
    pub assessed: usize,
    pub total: usize,
    pub health_pct: f64,
    pub state: HealthState,
}

/// A dependency edge with rendering annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: DomainId,
    pub to: DomainId,
    pub kind: EdgeKind,
    /// Source domain is assessed but below the weak-edge threshold.
    pub is_weak: bool,
    pub source_health_pct: f64,
}

/// Freshly computed graph view; never shared or mutated across calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
