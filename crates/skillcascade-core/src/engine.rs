//! `CascadeEngine`: one validated catalog, its dependency graph and config.
//!
//! The engine is immutable after construction and holds no per-request
//! state, so it can be shared freely across threads. Every operation is a
//! pure function of its arguments and the engine's structure.

use std::collections::BTreeMap;

use skillcascade_types::assessment::{Assessment, SimulatedAssessment, SkillLevels, Snapshot};
use skillcascade_types::cascade::CascadeState;
use skillcascade_types::catalog::{DomainId, FrameworkCatalog};
use skillcascade_types::config::EngineConfig;
use skillcascade_types::error::EngineError;
use skillcascade_types::graph::GraphView;
use skillcascade_types::health::{DomainHealth, SubAreaHealth};
use skillcascade_types::insight::{ImpactRanking, PathStep, Risk, SkillBottleneck};

use crate::catalog::Catalog;
use crate::graph::DependencyGraph;
use crate::{cascade, health, leverage, prereq, risk};

/// Facade over the cascade dependency computations.
#[derive(Debug, Clone)]
pub struct CascadeEngine {
    catalog: Catalog,
    graph: DependencyGraph,
    config: EngineConfig,
    revision: String,
}

impl CascadeEngine {
    /// Validate the configuration and catalog and build the dependency graph.
    pub fn new(source: FrameworkCatalog, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let revision = format!("{source:?}|{config:?}");
        let catalog = Catalog::new(source)?;
        let graph = DependencyGraph::build(&catalog)?;

        tracing::info!(
            domains = catalog.domains().len(),
            skills = catalog.skills().len(),
            edges = catalog.edges().len(),
            "cascade engine ready"
        );

        Ok(Self {
            catalog,
            graph,
            config,
            revision,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Canonical text of the catalog and config this engine was built from.
    /// Equal for engines built from equal inputs.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    // -- Health ---------------------------------------------------------------

    /// Health of every domain under the given skill levels.
    pub fn compute_domain_health<L: SkillLevels + ?Sized>(&self, levels: &L) -> BTreeMap<DomainId, DomainHealth> {
        health::compute_domain_health(&self.catalog, &self.graph, &self.config.health, levels)
    }

    /// Health of each sub-area of `domain`, optionally with cross-domain
    /// prerequisite readiness.
    pub fn sub_area_health<L: SkillLevels + ?Sized>(
        &self,
        levels: &L,
        domain: &DomainId,
        include_prerequisites: bool,
    ) -> Vec<SubAreaHealth> {
        health::sub_area_health(
            &self.catalog,
            &self.graph,
            &self.config.health,
            levels,
            domain,
            include_prerequisites,
        )
    }

    /// Node and edge view of the graph annotated with health.
    pub fn graph_view<L: SkillLevels + ?Sized>(&self, levels: &L) -> GraphView {
        let health = self.compute_domain_health(levels);
        self.graph.annotate(&self.catalog, &health, &self.config.health)
    }

    // -- Cascade --------------------------------------------------------------

    pub fn simulate_cascade(&self, assessment: &Assessment, overrides: &BTreeMap<DomainId, f64>) -> SimulatedAssessment {
        cascade::simulate_cascade(&self.catalog, &self.graph, &self.config.cascade, assessment, overrides)
    }

    /// Domain health after applying what-if overrides.
    pub fn project(&self, assessment: &Assessment, overrides: &BTreeMap<DomainId, f64>) -> BTreeMap<DomainId, DomainHealth> {
        let simulated = self.simulate_cascade(assessment, overrides);
        self.compute_domain_health(&simulated)
    }

    pub fn trigger_cascade(&self, source: &DomainId) -> CascadeState {
        cascade::trigger_cascade(&self.graph, &self.config.cascade, source)
    }

    /// Return `state` to inactive. Idempotent.
    pub fn reset_cascade(&self, state: &mut CascadeState) {
        state.reset();
    }

    // -- Insights -------------------------------------------------------------

    pub fn rank_by_leverage(&self, assessment: &Assessment) -> Vec<ImpactRanking> {
        let health = self.compute_domain_health(assessment);
        leverage::rank_by_leverage(&self.catalog, &self.graph, &self.config.leverage, &health)
    }

    pub fn detect_cascade_risks(&self, assessment: &Assessment, snapshots: &[Snapshot]) -> Vec<Risk> {
        risk::detect_cascade_risks(&self.catalog, &self.graph, &self.config, assessment, snapshots)
    }

    pub fn find_prerequisite_chain(&self, domain: &DomainId) -> Vec<DomainId> {
        prereq::find_prerequisite_chain(&self.graph, domain)
    }

    pub fn compute_path_readiness(&self, chain: &[DomainId], assessment: &Assessment) -> Vec<PathStep> {
        let health = self.compute_domain_health(assessment);
        prereq::compute_path_readiness(chain, &health, &self.config.health)
    }

    pub fn find_skill_bottlenecks(&self, assessment: &Assessment, limit: usize) -> Vec<SkillBottleneck> {
        prereq::find_skill_bottlenecks(&self.catalog, &self.config.bottleneck, assessment, limit)
    }
}
