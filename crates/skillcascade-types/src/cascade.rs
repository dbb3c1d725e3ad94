//! Live cascade state for presentation layers.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use crate::catalog::DomainId;

/// Result of triggering a cascade from one domain.
///
/// `affected` maps every domain reachable from `source` to its impact
/// strength in `(0, 1]`. The source itself is not listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CascadeState {
    pub active: bool,
    pub source: Option<DomainId>,
    pub affected: BTreeMap<DomainId, f64>,
}

impl CascadeState {
    /// An inactive state with nothing affected.
    pub fn inactive() -> Self {
        Self::default()
    }

    /// Clear back to inactive. Calling it repeatedly is a no-op.
    pub fn reset(&mut self) {
        self.active = false;
        self.source = None;
        self.affected.clear();
    }

    /// Impact strength for `domain`, 0 when unaffected or inactive.
    pub fn strength(&self, domain: &DomainId) -> f64 {
        if !self.active {
            return 0.0;
        }
        self.affected.get(domain).copied().unwrap_or(0.0)
    }
}
