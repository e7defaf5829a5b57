//! Immutable result of one refresh cycle.

use std::collections::BTreeMap;

use serde::Serialize;

use curvefeed_core::CurveId;
use curvefeed_curves::Curve;

use crate::cycle::{CycleFailure, CycleStage, SelectionKey};

/// Curves and failures produced by one cycle.
///
/// Built once and never mutated; committed snapshots are shared as
/// `Arc<CurveSnapshot>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveSnapshot {
    /// Cycle that produced this snapshot.
    pub cycle_id: u64,
    /// Slot the cycle ran for.
    pub selection: SelectionKey,
    /// Identifiers in request order.
    pub requested: Vec<CurveId>,
    /// Curves by identifier.
    pub curves: BTreeMap<CurveId, Curve>,
    /// Identifiers without a curve, and why.
    pub failures: BTreeMap<CurveId, CycleFailure>,
    /// Distinct tickers sent to the quote source.
    pub tickers_requested: usize,
    /// Quotes the source returned.
    pub quotes_received: usize,
}

impl CurveSnapshot {
    /// An empty snapshot.
    pub fn empty(cycle_id: u64, selection: SelectionKey) -> Self {
        Self {
            cycle_id,
            selection,
            requested: Vec::new(),
            curves: BTreeMap::new(),
            failures: BTreeMap::new(),
            tickers_requested: 0,
            quotes_received: 0,
        }
    }

    /// The curve for an identifier.
    pub fn curve(&self, id: &CurveId) -> Option<&Curve> {
        self.curves.get(id)
    }

    /// The failure for an identifier.
    pub fn failure(&self, id: &CurveId) -> Option<&CycleFailure> {
        self.failures.get(id)
    }

    /// Final stage of an identifier; `Idle` if it was not part of the cycle.
    pub fn stage(&self, id: &CurveId) -> CycleStage {
        if self.curves.contains_key(id) {
            CycleStage::Ready
        } else if self.failures.contains_key(id) {
            CycleStage::Failed
        } else {
            CycleStage::Idle
        }
    }

    /// Curves in request order.
    pub fn ordered_curves(&self) -> impl Iterator<Item = &Curve> {
        self.requested.iter().filter_map(|id| self.curves.get(id))
    }

    /// True when every requested identifier produced a curve.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of curves.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// True when no curve was produced.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvefeed_curves::CurveError;

    #[test]
    fn test_stage_lookup() {
        let mut snapshot = CurveSnapshot::empty(3, SelectionKey::default());
        let id = CurveId::new("USDRUB");
        snapshot.requested.push(id.clone());
        snapshot.failures.insert(
            id.clone(),
            CycleFailure::new(
                CycleStage::Reconciling,
                CurveError::anchor_missing(&id, "USDRUB Curncy", "not returned"),
            ),
        );
        assert_eq!(snapshot.stage(&id), CycleStage::Failed);
        assert_eq!(snapshot.stage(&CurveId::new("EURUSD")), CycleStage::Idle);
        assert!(!snapshot.is_complete());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.ordered_curves().count(), 0);
    }
}
