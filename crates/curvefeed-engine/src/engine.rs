//! The curve engine: one batched fetch per cycle, one independent chain per
//! identifier.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use curvefeed_config::InstrumentCatalog;
use curvefeed_core::CurveId;
use curvefeed_curves::{
    Curve, CurveError, CurvePipeline, QuoteIndex, ResolutionPlan, TickerResolution,
    TickerResolver,
};
use curvefeed_traits::{QuoteRequest, QuoteSource};

use crate::builder::CurveEngineBuilder;
use crate::cycle::{CycleFailure, CycleStage, Selection};
use crate::error::{EngineError, EngineResult};
use crate::refresh::{CommitOutcome, CycleTicket, RefreshController};
use crate::snapshot::CurveSnapshot;

type BuildOutcome = (CurveId, Result<Curve, CycleFailure>);

/// Builds curve snapshots for selections.
pub struct CurveEngine {
    resolver: RwLock<Arc<TickerResolver>>,
    source: Arc<dyn QuoteSource>,
    pipeline: CurvePipeline,
    fields: Vec<String>,
    controller: Arc<RefreshController>,
}

impl CurveEngine {
    pub(crate) fn new(
        catalog: Arc<InstrumentCatalog>,
        source: Arc<dyn QuoteSource>,
        pipeline: CurvePipeline,
        fields: Vec<String>,
        controller: Arc<RefreshController>,
    ) -> Self {
        Self {
            resolver: RwLock::new(Arc::new(TickerResolver::new(catalog))),
            source,
            pipeline,
            fields,
            controller,
        }
    }

    /// Create a builder.
    pub fn builder() -> CurveEngineBuilder {
        CurveEngineBuilder::new()
    }

    /// The resolver used by new cycles.
    pub fn resolver(&self) -> Arc<TickerResolver> {
        Arc::clone(&self.resolver.read())
    }

    /// Swaps the catalog. Cycles already running keep the old one.
    pub fn replace_catalog(&self, catalog: Arc<InstrumentCatalog>) {
        info!("catalog replaced ({} identifiers)", catalog.len());
        *self.resolver.write() = Arc::new(TickerResolver::new(catalog));
    }

    /// The quote source.
    pub fn source(&self) -> &Arc<dyn QuoteSource> {
        &self.source
    }

    /// The refresh controller.
    pub fn controller(&self) -> &Arc<RefreshController> {
        &self.controller
    }

    /// Field mnemonics requested per ticker.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Resolves a selection without fetching anything.
    pub fn plan(&self, selection: &Selection) -> ResolutionPlan {
        self.resolver().plan(&selection.requests)
    }

    /// Runs one cycle without committing it.
    ///
    /// A failing quote request fails the whole cycle with no partial
    /// results. Every other failure is confined to its identifier.
    pub async fn run_cycle(
        &self,
        cycle_id: u64,
        selection: &Selection,
    ) -> EngineResult<CurveSnapshot> {
        let span = info_span!("cycle", cycle_id, selection = %selection.key);
        self.run_cycle_inner(cycle_id, selection).instrument(span).await
    }

    async fn run_cycle_inner(
        &self,
        cycle_id: u64,
        selection: &Selection,
    ) -> EngineResult<CurveSnapshot> {
        let resolver = self.resolver();
        let mut snapshot = CurveSnapshot::empty(cycle_id, selection.key.clone());
        snapshot.requested = selection
            .requests
            .iter()
            .map(|r| r.identifier.clone())
            .collect();
        info!(identifiers = selection.len(), "cycle started");

        let plan = resolver.plan(&selection.requests);
        for (id, error) in &plan.failures {
            warn!(identifier = %id, "resolution failed: {}", error);
            snapshot.failures.insert(
                id.clone(),
                CycleFailure::new(CycleStage::Resolving, error.clone()),
            );
        }
        if plan.is_empty() {
            return Ok(snapshot);
        }

        let request =
            QuoteRequest::with_field_names(plan.tickers(), self.fields.iter().cloned());
        snapshot.tickers_requested = request.len();
        debug!(
            tickers = request.len(),
            source = self.source.name(),
            "fetching quotes"
        );
        let batch = self.source.fetch_quotes(&request).await.map_err(|e| {
            warn!("quote request failed: {}", e);
            EngineError::from(e)
        })?;
        snapshot.quotes_received = batch.len();

        let index = QuoteIndex::new(batch.as_slice());
        for (id, outcome) in self.build_all(resolver.catalog(), &plan, &index) {
            match outcome {
                Ok(curve) => {
                    snapshot.curves.insert(id, curve);
                }
                Err(failure) => {
                    warn!(identifier = %id, "{}", failure);
                    snapshot.failures.insert(id, failure);
                }
            }
        }

        info!(
            curves = snapshot.curves.len(),
            failures = snapshot.failures.len(),
            quotes = snapshot.quotes_received,
            "cycle finished"
        );
        Ok(snapshot)
    }

    #[cfg(feature = "parallel")]
    fn build_all(
        &self,
        catalog: &InstrumentCatalog,
        plan: &ResolutionPlan,
        index: &QuoteIndex<'_>,
    ) -> Vec<BuildOutcome> {
        use rayon::prelude::*;

        plan.resolved
            .par_iter()
            .map(|(id, resolutions)| self.build_one(catalog, id, resolutions, index))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn build_all(
        &self,
        catalog: &InstrumentCatalog,
        plan: &ResolutionPlan,
        index: &QuoteIndex<'_>,
    ) -> Vec<BuildOutcome> {
        plan.resolved
            .iter()
            .map(|(id, resolutions)| self.build_one(catalog, id, resolutions, index))
            .collect()
    }

    fn build_one(
        &self,
        catalog: &InstrumentCatalog,
        id: &CurveId,
        resolutions: &[TickerResolution],
        index: &QuoteIndex<'_>,
    ) -> BuildOutcome {
        let Some(entry) = catalog.get(id) else {
            let error = CurveError::configuration(id, "identifier left the catalog mid-cycle");
            return (id.clone(), Err(CycleFailure::new(CycleStage::Resolving, error)));
        };

        let mut stage = CycleStage::Fetching;
        let result = self
            .pipeline
            .build_observed(id, &entry.kind, resolutions, index, |s| stage = s.into());
        (
            id.clone(),
            result.map_err(|error| CycleFailure::new(stage, error)),
        )
    }

    /// Runs a cycle for a ticket and commits it.
    ///
    /// Results and errors of a superseded ticket are both discarded.
    pub async fn run_ticket(
        &self,
        ticket: CycleTicket,
        selection: &Selection,
    ) -> EngineResult<CommitOutcome> {
        match self.run_cycle(ticket.cycle_id, selection).await {
            Ok(snapshot) => Ok(self.controller.commit(&ticket, snapshot)),
            Err(e) if !self.controller.is_current(&ticket) => {
                debug!(cycle_id = ticket.cycle_id, "superseded cycle failed: {}", e);
                Ok(CommitOutcome::Superseded {
                    cycle_id: ticket.cycle_id,
                    latest: self
                        .controller
                        .latest_cycle(&ticket.selection)
                        .unwrap_or(ticket.cycle_id),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Starts, runs and commits a cycle for a selection.
    pub async fn refresh(&self, selection: &Selection) -> EngineResult<CommitOutcome> {
        let ticket = self.controller.begin(selection.key.clone());
        self.run_ticket(ticket, selection).await
    }

    /// Starts a cycle now and runs it on a tokio task.
    ///
    /// The ticket is taken before this returns, so a later call for the same
    /// slot always supersedes this one.
    pub fn spawn_refresh(
        self: &Arc<Self>,
        selection: Selection,
    ) -> JoinHandle<EngineResult<CommitOutcome>> {
        let ticket = self.controller.begin(selection.key.clone());
        let engine = Arc::clone(self);
        tokio::spawn(async move { engine.run_ticket(ticket, &selection).await })
    }

    /// Builds the curves of a selection from the current catalog, keyed by
    /// identifier. Convenience for one-shot callers.
    pub async fn build_curves(
        &self,
        selection: &Selection,
    ) -> EngineResult<BTreeMap<CurveId, Curve>> {
        Ok(self.run_cycle(0, selection).await?.curves)
    }
}

impl std::fmt::Debug for CurveEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveEngine")
            .field("source", &self.source.name())
            .field("pipeline", &self.pipeline)
            .field("fields", &self.fields)
            .finish()
    }
}
