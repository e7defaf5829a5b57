//! Refresh-cycle vocabulary: selections, stages and per-identifier failures.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use curvefeed_core::{CurveId, Tenor};
use curvefeed_curves::{CurveError, CurveRequest, PipelineStage};

/// Name of the slot a selection occupies.
///
/// A new cycle supersedes any in-flight cycle for the same slot, whatever
/// identifiers either of them asked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionKey(pub String);

impl SelectionKey {
    /// The slot used when none is given.
    pub const DEFAULT: &'static str = "default";

    /// Creates a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SelectionKey {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SelectionKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The identifiers a cycle should build, and the slot they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Slot.
    pub key: SelectionKey,
    /// Requested identifiers, in order.
    pub requests: Vec<CurveRequest>,
}

impl Selection {
    /// Selection in the default slot.
    pub fn new(requests: Vec<CurveRequest>) -> Self {
        Self {
            key: SelectionKey::default(),
            requests,
        }
    }

    /// Selection of identifiers with their default ladders.
    pub fn of<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CurveId>,
    {
        Self::new(ids.into_iter().map(CurveRequest::new).collect())
    }

    /// Applies one ladder to every request.
    pub fn with_ladder(mut self, ladder: &[Tenor]) -> Self {
        for request in &mut self.requests {
            request.ladder = Some(ladder.to_vec());
        }
        self
    }

    /// Moves the selection to another slot.
    pub fn with_key(mut self, key: impl Into<SelectionKey>) -> Self {
        self.key = key.into();
        self
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Where an identifier stands within a cycle.
///
/// `Idle → Resolving → Fetching → Reconciling → Normalizing → Assembling`,
/// ending in `Ready` or `Failed`. Both end states are terminal for the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStage {
    /// Not started.
    Idle,
    /// Turning the identifier and ladder into tickers.
    Resolving,
    /// Waiting on the batched quote request.
    Fetching,
    /// Matching quotes to resolutions.
    Reconciling,
    /// Converting raw values.
    Normalizing,
    /// Filtering, ordering and scoring.
    Assembling,
    /// Curve produced.
    Ready,
    /// Curve absent for this cycle.
    Failed,
}

impl CycleStage {
    /// True for `Ready` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CycleStage::Ready | CycleStage::Failed)
    }

    /// The stage after this one on the success path.
    pub fn next(&self) -> Option<CycleStage> {
        match self {
            CycleStage::Idle => Some(CycleStage::Resolving),
            CycleStage::Resolving => Some(CycleStage::Fetching),
            CycleStage::Fetching => Some(CycleStage::Reconciling),
            CycleStage::Reconciling => Some(CycleStage::Normalizing),
            CycleStage::Normalizing => Some(CycleStage::Assembling),
            CycleStage::Assembling => Some(CycleStage::Ready),
            CycleStage::Ready | CycleStage::Failed => None,
        }
    }

    /// True if `to` is a legal transition from this stage.
    ///
    /// Any non-terminal stage may fail.
    pub fn can_advance_to(&self, to: CycleStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == CycleStage::Failed || self.next() == Some(to)
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            CycleStage::Idle => "idle",
            CycleStage::Resolving => "resolving",
            CycleStage::Fetching => "fetching",
            CycleStage::Reconciling => "reconciling",
            CycleStage::Normalizing => "normalizing",
            CycleStage::Assembling => "assembling",
            CycleStage::Ready => "ready",
            CycleStage::Failed => "failed",
        }
    }
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<PipelineStage> for CycleStage {
    fn from(stage: PipelineStage) -> Self {
        match stage {
            PipelineStage::Reconciling => CycleStage::Reconciling,
            PipelineStage::Normalizing => CycleStage::Normalizing,
            PipelineStage::Assembling => CycleStage::Assembling,
        }
    }
}

/// Why an identifier has no curve in a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleFailure {
    /// Stage that failed.
    pub stage: CycleStage,
    /// The error.
    pub error: CurveError,
}

impl CycleFailure {
    /// Creates a failure.
    pub fn new(stage: CycleStage, error: CurveError) -> Self {
        Self { stage, error }
    }
}

impl fmt::Display for CycleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (while {})", self.error, self.stage)
    }
}

impl Serialize for CycleFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CycleFailure", 3)?;
        s.serialize_field("stage", &self.stage)?;
        s.serialize_field("kind", self.error.kind())?;
        s.serialize_field("message", &self.error.to_string())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path() {
        let mut stage = CycleStage::Idle;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            assert!(stage.can_advance_to(next));
            stage = next;
            visited.push(stage);
        }
        assert_eq!(visited.len(), 7);
        assert_eq!(stage, CycleStage::Ready);
    }

    #[test]
    fn test_terminal_stages() {
        assert!(CycleStage::Reconciling.can_advance_to(CycleStage::Failed));
        assert!(!CycleStage::Failed.can_advance_to(CycleStage::Resolving));
        assert!(!CycleStage::Ready.can_advance_to(CycleStage::Failed));
        assert!(!CycleStage::Fetching.can_advance_to(CycleStage::Assembling));
    }

    #[test]
    fn test_selection_builders() {
        let s = Selection::of(["EURUSD", "USDJPY"])
            .with_ladder(&[Tenor::Months(1)])
            .with_key("blotter");
        assert_eq!(s.len(), 2);
        assert_eq!(s.key.as_str(), "blotter");
        assert!(s.requests.iter().all(|r| r.ladder.as_deref() == Some(&[Tenor::Months(1)][..])));
        assert_eq!(Selection::default().key.as_str(), SelectionKey::DEFAULT);
    }

    #[test]
    fn test_failure_serializes_kind() {
        let failure = CycleFailure::new(
            CycleStage::Reconciling,
            CurveError::anchor_missing(&CurveId::new("EURUSD"), "EURUSD Curncy", "not returned"),
        );
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["stage"], "reconciling");
        assert_eq!(json["kind"], "anchor_missing");
    }
}
