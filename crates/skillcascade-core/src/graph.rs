//! Domain dependency graph: construction, cycle detection, and traversal.
//!
//! Uses `petgraph` to hold the structural graph once per catalog. Nodes are
//! domain ids, edge weights are [`EdgeKind`]s. A topological sort over the
//! `requires` edges runs at construction and rejects cycles; `supports` edges
//! are an overlay that never constrains ordering. Per-call results (health
//! annotations, path strengths) are always returned as fresh maps.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use skillcascade_types::catalog::{DomainId, EdgeKind};
use skillcascade_types::config::{CascadeConfig, HealthConfig};
use skillcascade_types::error::CatalogError;
use skillcascade_types::graph::{GraphEdge, GraphNode, GraphView};
use skillcascade_types::health::{DomainHealth, HealthState};

use crate::catalog::Catalog;

/// Strength improvements smaller than this are treated as no change.
const STRENGTH_EPSILON: f64 = 1e-12;

/// Immutable structural graph over the catalog's domains.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<DomainId, EdgeKind>,
    index: HashMap<DomainId, NodeIndex>,
    /// Domains in topological order of the `requires` subgraph.
    order: Vec<DomainId>,
    /// Sources of `requires` edges into each domain, in catalog edge order.
    prerequisites: HashMap<DomainId, Vec<DomainId>>,
}

impl DependencyGraph {
    /// Build the graph and verify that `requires` edges are acyclic.
    pub fn build(catalog: &Catalog) -> Result<Self, CatalogError> {
        let mut graph = DiGraph::<DomainId, EdgeKind>::new();
        let mut index = HashMap::new();
        for domain in catalog.domains() {
            let idx = graph.add_node(domain.id.clone());
            index.insert(domain.id.clone(), idx);
        }

        let mut prerequisites: HashMap<DomainId, Vec<DomainId>> = HashMap::new();
        for edge in catalog.edges() {
            let (Some(&from), Some(&to)) = (index.get(&edge.from), index.get(&edge.to)) else {
                return Err(CatalogError::UnknownEdgeDomain {
                    from: edge.from.to_string(),
                    to: edge.to.to_string(),
                    missing: if index.contains_key(&edge.from) {
                        edge.to.to_string()
                    } else {
                        edge.from.to_string()
                    },
                });
            };
            graph.add_edge(from, to, edge.kind);
            if edge.kind == EdgeKind::Requires {
                let sources = prerequisites.entry(edge.to.clone()).or_default();
                if !sources.contains(&edge.from) {
                    sources.push(edge.from.clone());
                }
            }
        }

        // Requires-only copy; keeping every node preserves node indices.
        let requires_only = graph.filter_map(
            |_, id| Some(id.clone()),
            |_, kind| (*kind == EdgeKind::Requires).then_some(()),
        );

        let sorted = toposort(&requires_only, None).map_err(|cycle| {
            CatalogError::CycleDetected(requires_only[cycle.node_id()].to_string())
        })?;
        let order = sorted.into_iter().map(|idx| graph[idx].clone()).collect();

        Ok(Self {
            graph,
            index,
            order,
            prerequisites,
        })
    }

    pub fn contains(&self, id: &DomainId) -> bool {
        self.index.contains_key(id)
    }

    pub fn domain_count(&self) -> usize {
        self.index.len()
    }

    /// Every domain, ordered so that each comes after all domains it requires.
    pub fn topological_order(&self) -> &[DomainId] {
        &self.order
    }

    /// Domains that `id` directly requires.
    pub fn prerequisites(&self, id: &DomainId) -> &[DomainId] {
        self.prerequisites
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Transitive `requires` ancestors of `id`, excluding `id`.
    pub fn requires_ancestors(&self, id: &DomainId) -> BTreeSet<DomainId> {
        self.reach(id, Direction::Incoming, Some(EdgeKind::Requires))
    }

    /// Transitive `requires` descendants of `id`, excluding `id`.
    pub fn requires_descendants(&self, id: &DomainId) -> BTreeSet<DomainId> {
        self.reach(id, Direction::Outgoing, Some(EdgeKind::Requires))
    }

    /// Every domain reachable from `id` over edges of either kind, excluding `id`.
    pub fn downstream(&self, id: &DomainId) -> BTreeSet<DomainId> {
        self.reach(id, Direction::Outgoing, None)
    }

    fn reach(&self, id: &DomainId, dir: Direction, kind: Option<EdgeKind>) -> BTreeSet<DomainId> {
        let mut visited = BTreeSet::new();
        let Some(&start) = self.index.get(id) else {
            return visited;
        };

        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for edge in self.graph.edges_directed(current, dir) {
                if kind.is_some_and(|k| *edge.weight() != k) {
                    continue;
                }
                let next = match dir {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                if next != start && visited.insert(self.graph[next].clone()) {
                    stack.push(next);
                }
            }
        }
        visited
    }

    /// Strongest propagation path from `source` to every reachable domain.
    ///
    /// A path's strength is the product of its edge weights, multiplied by
    /// `hop_decay` once for every hop after the first. All factors lie in
    /// `(0, 1]`, so strengths are in `(0, 1]` and cycles through `supports`
    /// edges can never improve a path. The source itself is excluded.
    pub fn path_strengths(&self, source: &DomainId, config: &CascadeConfig) -> BTreeMap<DomainId, f64> {
        let Some(&start) = self.index.get(source) else {
            return BTreeMap::new();
        };

        let weight = |kind: EdgeKind| match kind {
            EdgeKind::Requires => config.requires_weight,
            EdgeKind::Supports => config.supports_weight,
        };

        let mut best: HashMap<NodeIndex, f64> = HashMap::new();
        let mut queue = VecDeque::new();

        for edge in self.graph.edges_directed(start, Direction::Outgoing) {
            let target = edge.target();
            let strength = weight(*edge.weight());
            if target != start && strength > best.get(&target).copied().unwrap_or(0.0) + STRENGTH_EPSILON {
                best.insert(target, strength);
                queue.push_back(target);
            }
        }

        while let Some(current) = queue.pop_front() {
            let current_strength = best[&current];
            for edge in self.graph.edges_directed(current, Direction::Outgoing) {
                let target = edge.target();
                if target == start {
                    continue;
                }
                let strength = current_strength * weight(*edge.weight()) * config.hop_decay;
                if strength > best.get(&target).copied().unwrap_or(0.0) + STRENGTH_EPSILON {
                    best.insert(target, strength);
                    queue.push_back(target);
                }
            }
        }

        best.into_iter()
            .map(|(idx, strength)| (self.graph[idx].clone(), strength))
            .collect()
    }

    /// Annotate the structural graph with health for rendering.
    pub fn annotate(
        &self,
        catalog: &Catalog,
        health: &BTreeMap<DomainId, DomainHealth>,
        config: &HealthConfig,
    ) -> GraphView {
        let mut columns: HashMap<u8, usize> = HashMap::new();
        let nodes = catalog
            .domains()
            .iter()
            .map(|domain| {
                let column = columns.entry(domain.tier_position).or_insert(0);
                let h = health.get(&domain.id);
                let node = GraphNode {
                    domain_id: domain.id.clone(),
                    name: domain.name.clone(),
                    tier: domain.tier_position,
                    column: *column,
                    independent: domain.independent,
                    avg: h.map(|h| h.avg).unwrap_or(0.0),
                    assessed: h.map(|h| h.assessed).unwrap_or(0),
                    total: catalog.skill_count(&domain.id),
                    health_pct: h.map(|h| h.health_pct).unwrap_or(0.0),
                    state: h.map(|h| h.state).unwrap_or(HealthState::Locked),
                };
                *column += 1;
                node
            })
            .collect();

        let edges = catalog
            .edges()
            .iter()
            .map(|edge| {
                let source = health.get(&edge.from);
                GraphEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    kind: edge.kind,
                    is_weak: source
                        .is_some_and(|h| h.is_assessed() && h.avg < config.weak_edge_below),
                    source_health_pct: source.map(|h| h.health_pct).unwrap_or(0.0),
                }
            })
            .collect();

        GraphView { nodes, edges }
    }
}
