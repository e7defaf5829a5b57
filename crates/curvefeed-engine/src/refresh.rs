//! Cycle supersession.
//!
//! Every cycle gets a ticket with a strictly increasing id. Only the newest
//! ticket of a slot may commit; anything older that finishes afterwards is
//! discarded. In-flight cycles are never aborted, only outrun.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::cycle::SelectionKey;
use crate::snapshot::CurveSnapshot;

/// Permission to commit one cycle's result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CycleTicket {
    /// Cycle id.
    pub cycle_id: u64,
    /// Slot.
    pub selection: SelectionKey,
}

/// Result of trying to commit a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The snapshot is now the latest for its slot.
    Committed(Arc<CurveSnapshot>),
    /// A newer cycle was started for the slot; the result was dropped.
    Superseded {
        /// The dropped cycle.
        cycle_id: u64,
        /// The newest cycle for the slot.
        latest: u64,
    },
}

impl CommitOutcome {
    /// True when committed.
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed(_))
    }

    /// The committed snapshot.
    pub fn snapshot(&self) -> Option<&Arc<CurveSnapshot>> {
        match self {
            CommitOutcome::Committed(snapshot) => Some(snapshot),
            CommitOutcome::Superseded { .. } => None,
        }
    }
}

/// Hands out cycle tickets and publishes committed snapshots.
pub struct RefreshController {
    next_cycle: AtomicU64,
    latest: DashMap<SelectionKey, u64>,
    committed: DashMap<SelectionKey, Arc<CurveSnapshot>>,
    publisher: watch::Sender<Option<Arc<CurveSnapshot>>>,
}

impl RefreshController {
    /// Creates a controller.
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(None);
        Self {
            next_cycle: AtomicU64::new(0),
            latest: DashMap::new(),
            committed: DashMap::new(),
            publisher,
        }
    }

    /// Starts a cycle for a slot, superseding any earlier one.
    pub fn begin(&self, selection: SelectionKey) -> CycleTicket {
        let cycle_id = self.next_cycle.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest
            .entry(selection.clone())
            .and_modify(|latest| *latest = (*latest).max(cycle_id))
            .or_insert(cycle_id);
        debug!(cycle_id, selection = %selection, "cycle started");
        CycleTicket {
            cycle_id,
            selection,
        }
    }

    /// Newest cycle id for a slot.
    pub fn latest_cycle(&self, selection: &SelectionKey) -> Option<u64> {
        self.latest.get(selection).map(|v| *v)
    }

    /// True if no newer cycle has started for the ticket's slot.
    pub fn is_current(&self, ticket: &CycleTicket) -> bool {
        self.latest_cycle(&ticket.selection) == Some(ticket.cycle_id)
    }

    /// Commits a snapshot if its ticket is still the newest for its slot.
    pub fn commit(&self, ticket: &CycleTicket, snapshot: CurveSnapshot) -> CommitOutcome {
        // Holding the slot's entry blocks `begin` on the same slot until the
        // snapshot is published.
        let Some(latest) = self.latest.get(&ticket.selection) else {
            return CommitOutcome::Superseded {
                cycle_id: ticket.cycle_id,
                latest: 0,
            };
        };
        if *latest != ticket.cycle_id {
            debug!(
                cycle_id = ticket.cycle_id,
                latest = *latest,
                "stale cycle result discarded"
            );
            return CommitOutcome::Superseded {
                cycle_id: ticket.cycle_id,
                latest: *latest,
            };
        }

        let snapshot = Arc::new(snapshot);
        self.committed
            .insert(ticket.selection.clone(), Arc::clone(&snapshot));
        self.publisher.send_replace(Some(Arc::clone(&snapshot)));
        drop(latest);

        info!(
            cycle_id = ticket.cycle_id,
            selection = %ticket.selection,
            curves = snapshot.len(),
            failures = snapshot.failures.len(),
            "cycle committed"
        );
        CommitOutcome::Committed(snapshot)
    }

    /// Latest committed snapshot for a slot.
    pub fn snapshot(&self, selection: &SelectionKey) -> Option<Arc<CurveSnapshot>> {
        self.committed.get(selection).map(|s| Arc::clone(&s))
    }

    /// Receiver of every committed snapshot, across slots.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<CurveSnapshot>>> {
        self.publisher.subscribe()
    }
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RefreshController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshController")
            .field("next_cycle", &self.next_cycle.load(Ordering::SeqCst))
            .field("slots", &self.latest.len())
            .finish()
    }
}
