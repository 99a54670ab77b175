//! Orchestration of one analysis run.
//!
//! [`run_pipeline`] drives the stages in order (see [`PipelineState`]):
//!
//! - load both inputs, falling back to [`crate::example_data`] when a source is missing and
//!   [`PipelineOptions::allow_example_fallback`] is set
//! - validate required columns and decode typed records
//! - derive line revenue, aggregate per category, filter low inventory
//! - export both result tables
//!
//! The first failure aborts the run; nothing is exported by a failed run.
//!
//! ```no_run
//! use sales_inventory_analysis::pipeline::run_analysis;
//!
//! let out = run_analysis("datos_ventas.csv", "inventario.xlsx", true)?;
//! for row in &out.category_summary {
//!     println!("{} {:.2} ({:.1}%)", row.category, row.total_revenue, row.revenue_share_pct);
//! }
//! # Ok::<(), sales_inventory_analysis::pipeline::PipelineError>(())
//! ```

mod observer;
mod precondition;
mod state;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::error::AnalysisError;
use crate::example_data::example_inputs;
use crate::export::{export_results, ExportOptions, ExportedArtifacts, DEFAULT_OUTPUT_DIR};
use crate::ingestion::{load_inputs, IngestionObserver, IngestionOptions, IngestionSeverity};
use crate::processing::{add_line_revenue, low_inventory, summarize_by_category, DEFAULT_LOW_INVENTORY_THRESHOLD};
use crate::records::{CategorySummary, InventoryRecord};
use crate::validation::{validate_inventory, validate_sales};

pub use observer::{PipelineObserver, StdErrPipelineObserver};
pub use precondition::{NotAfter, RunPrecondition};
pub use state::PipelineState;

/// Default sales ledger locator.
pub const DEFAULT_SALES_PATH: &str = "datos_ventas.csv";

/// Default inventory snapshot locator.
pub const DEFAULT_INVENTORY_PATH: &str = "inventario.xlsx";

/// Configuration for [`run_pipeline`].
#[derive(Clone)]
pub struct PipelineOptions {
    pub sales_path: PathBuf,
    pub inventory_path: PathBuf,
    pub sales_ingestion: IngestionOptions,
    pub inventory_ingestion: IngestionOptions,
    /// Directory receiving the exported artifacts; created if absent.
    pub output_dir: PathBuf,
    /// Use generated example data when an input file does not exist.
    pub allow_example_fallback: bool,
    /// Items with `available_quantity` strictly below this are reported. Must be `>= 0`.
    pub low_inventory_threshold: i64,
    pub export: ExportOptions,
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Checked before loading; a refusal fails the run at [`PipelineState::Idle`].
    pub precondition: Option<Arc<dyn RunPrecondition>>,
}

impl PipelineOptions {
    /// Route both inputs' ingestion events to `observer`.
    pub fn with_ingestion_observer(mut self, observer: Arc<dyn IngestionObserver>, alert_at_or_above: IngestionSeverity) -> Self {
        for opts in [&mut self.sales_ingestion, &mut self.inventory_ingestion] {
            opts.observer = Some(Arc::clone(&observer));
            opts.alert_at_or_above = alert_at_or_above;
        }
        self
    }
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("sales_path", &self.sales_path)
            .field("inventory_path", &self.inventory_path)
            .field("sales_ingestion", &self.sales_ingestion)
            .field("inventory_ingestion", &self.inventory_ingestion)
            .field("output_dir", &self.output_dir)
            .field("allow_example_fallback", &self.allow_example_fallback)
            .field("low_inventory_threshold", &self.low_inventory_threshold)
            .field("export", &self.export)
            .field("observer_set", &self.observer.is_some())
            .field("precondition_set", &self.precondition.is_some())
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sales_path: PathBuf::from(DEFAULT_SALES_PATH),
            inventory_path: PathBuf::from(DEFAULT_INVENTORY_PATH),
            sales_ingestion: IngestionOptions::default(),
            inventory_ingestion: IngestionOptions::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            allow_example_fallback: false,
            low_inventory_threshold: DEFAULT_LOW_INVENTORY_THRESHOLD,
            export: ExportOptions::default(),
            observer: None,
            precondition: None,
        }
    }
}

/// Where the analysed tables came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Loaded,
    /// Generated by [`crate::example_data`] after a missing input.
    Example,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Sorted by `total_revenue` descending.
    pub category_summary: Vec<CategorySummary>,
    /// Sorted by `available_quantity` ascending.
    pub low_inventory: Vec<InventoryRecord>,
    pub origin: DataOrigin,
    pub artifacts: ExportedArtifacts,
    /// States visited, from `Idle` to `Done`.
    pub trace: Vec<PipelineState>,
}

/// A failed run: the stage that failed and why.
#[derive(Debug, Error)]
#[error("analysis failed while {stage}: {error}")]
pub struct PipelineError {
    pub stage: PipelineState,
    #[source]
    pub error: AnalysisError,
}

/// Run the analysis with default options apart from the two inputs and the fallback switch.
pub fn run_analysis(
    sales: impl Into<PathBuf>,
    inventory: impl Into<PathBuf>,
    allow_example_fallback: bool,
) -> Result<PipelineOutput, PipelineError> {
    run_pipeline(&PipelineOptions {
        sales_path: sales.into(),
        inventory_path: inventory.into(),
        allow_example_fallback,
        ..Default::default()
    })
}

/// Run every stage in order, stopping at the first failure.
pub fn run_pipeline(options: &PipelineOptions) -> Result<PipelineOutput, PipelineError> {
    let mut run = Run::new(options.observer.clone());

    if let Some(precondition) = options.precondition.as_ref() {
        precondition
            .check()
            .map_err(|message| run.fail(AnalysisError::PreconditionFailed { message }))?;
    }

    run.advance(PipelineState::Loading);
    let loaded = load_inputs(
        &options.sales_path,
        &options.inventory_path,
        &options.sales_ingestion,
        &options.inventory_ingestion,
    );
    let (inputs, origin) = match loaded {
        Ok(inputs) => (inputs, DataOrigin::Loaded),
        Err(cause @ AnalysisError::SourceNotFound { .. }) if options.allow_example_fallback => {
            run.fallback(&cause);
            (example_inputs(), DataOrigin::Example)
        }
        Err(e) => return Err(run.fail(e)),
    };

    run.advance(PipelineState::Validating);
    let sales = validate_sales(&inputs.sales, &inputs.sales_origin).map_err(|e| run.fail(e))?;
    let inventory = validate_inventory(&inputs.inventory, &inputs.inventory_origin).map_err(|e| run.fail(e))?;

    run.advance(PipelineState::Transforming);
    let lines = add_line_revenue(&sales);

    run.advance(PipelineState::Aggregating);
    let category_summary = summarize_by_category(&lines).map_err(|e| run.fail(e))?;

    run.advance(PipelineState::Filtering);
    let low = low_inventory(&inventory, options.low_inventory_threshold).map_err(|e| run.fail(e))?;

    run.advance(PipelineState::Exporting);
    let artifacts =
        export_results(&category_summary, &low, &options.output_dir, &options.export).map_err(|e| run.fail(e))?;

    let trace = run.complete();
    Ok(PipelineOutput {
        category_summary,
        low_inventory: low,
        origin,
        artifacts,
        trace,
    })
}

/// Bookkeeping for one run: current state, visited states, observer notifications.
struct Run {
    state: PipelineState,
    trace: Vec<PipelineState>,
    observer: Option<Arc<dyn PipelineObserver>>,
    started_at: Instant,
    stage_started_at: Instant,
}

impl Run {
    fn new(observer: Option<Arc<dyn PipelineObserver>>) -> Self {
        let now = Instant::now();
        Self {
            state: PipelineState::Idle,
            trace: vec![PipelineState::Idle],
            observer,
            started_at: now,
            stage_started_at: now,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        if let Some(obs) = self.observer.as_ref() {
            if self.state != PipelineState::Idle && self.state != next {
                obs.on_stage_finished(self.state, self.stage_started_at.elapsed());
            }
        }
        self.enter(next);
    }

    fn fallback(&mut self, cause: &AnalysisError) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_fallback(cause);
        }
        self.enter(PipelineState::Loading);
    }

    fn fail(&mut self, error: AnalysisError) -> PipelineError {
        let stage = self.state;
        if let Some(obs) = self.observer.as_ref() {
            obs.on_failure(stage, &error);
        }
        self.enter(PipelineState::Failed);
        PipelineError { stage, error }
    }

    fn complete(mut self) -> Vec<PipelineState> {
        self.advance(PipelineState::Done);
        if let Some(obs) = self.observer.as_ref() {
            obs.on_completed(self.started_at.elapsed());
        }
        self.trace
    }

    fn enter(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid pipeline transition {} -> {}",
            self.state,
            next
        );
        if let Some(obs) = self.observer.as_ref() {
            obs.on_transition(self.state, next);
        }
        self.state = next;
        self.stage_started_at = Instant::now();
        self.trace.push(next);
    }
}
