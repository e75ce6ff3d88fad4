//! Per-notification pipeline
//!
//! notification -> fetch -> lookup -> calculate -> write -> status line
//!
//! Events are handled one at a time. Every failure is caught here, logged
//! once with its kind, and the loop moves on to the next notification.
//! Nothing is retried.

use crate::event::{SampleEvent, SamplePayload};
use crate::instrument::InstrumentClient;
use crate::label::{parse_label, SampleKey};
use sph_common::db::{apply_update, fetch_order_context, Store, UpdateRecord};
use sph_common::{calculate, Error, Result, SphResult};
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Result of one processed sample
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSample {
    pub key: SampleKey,
    pub sph: SphResult,
    pub update: UpdateRecord,
    /// False in dry-run mode
    pub written: bool,
}

/// Lookup -> calculate -> write for one fetched sample
#[derive(Debug, Clone)]
pub struct Pipeline {
    store: Store,
    dry_run: bool,
}

impl Pipeline {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Compute without writing
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process one sample payload
    ///
    /// The label is validated before the store is touched. The select and
    /// the update run on separate connections with no transaction between.
    pub async fn process_payload(&self, payload: &SamplePayload) -> Result<ProcessedSample> {
        let key = parse_label(&payload.label)?;

        let order = fetch_order_context(&self.store, key.order_number, key.sample_id).await?;
        debug!(%key, service_type = %order.service_type, dna_type = %order.dna_type, "Order context loaded");

        let sph = calculate(payload.concentration(), &order)?;
        let update = payload.update_record(key, sph);

        if !self.dry_run {
            apply_update(&self.store, &update).await?;
        }

        Ok(ProcessedSample {
            key,
            sph,
            update,
            written: !self.dry_run,
        })
    }
}

/// What happened to one notification
#[derive(Debug)]
pub enum Outcome {
    /// Not a sample-ready notification
    Ignored,
    Processed(ProcessedSample),
    Failed {
        /// Label of the fetched sample, if the fetch succeeded
        label: Option<String>,
        error: Error,
    },
}

impl Outcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, Outcome::Processed(_))
    }

    /// Failure kind, if any
    pub fn error_kind(&self) -> Option<&'static str> {
        match self {
            Outcome::Failed { error, .. } => Some(error.kind()),
            _ => None,
        }
    }
}

/// Reacts to sample-ready notifications
#[derive(Debug, Clone)]
pub struct NotificationHandler {
    instrument: InstrumentClient,
    pipeline: Pipeline,
}

impl NotificationHandler {
    pub fn new(instrument: InstrumentClient, pipeline: Pipeline) -> Self {
        Self {
            instrument,
            pipeline,
        }
    }

    /// Handle one notification and emit its status line
    ///
    /// Exactly one sample fetch per sample-ready event; none otherwise.
    pub async fn handle_event(&self, event: &SampleEvent) -> Outcome {
        if !event.is_sample_ready() {
            debug!(ready = ?event.ready, "Ignoring notification");
            return Outcome::Ignored;
        }

        let outcome = match self.instrument.fetch_sample().await {
            Ok(payload) => match self.pipeline.process_payload(&payload).await {
                Ok(processed) => Outcome::Processed(processed),
                Err(error) => Outcome::Failed {
                    label: Some(payload.label),
                    error,
                },
            },
            Err(error) => Outcome::Failed { label: None, error },
        };

        report(&outcome);
        outcome
    }
}

/// Emit the single status line for a handled sample
fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Ignored => {}
        Outcome::Processed(done) => {
            let verb = if done.written { "Updated" } else { "Computed (dry run)" };
            info!(
                order_number = done.key.order_number,
                sample_id = done.key.sample_id,
                concentration = done.update.measured_concentration,
                "{} {}: {}",
                verb,
                done.key,
                done.sph
            );
        }
        Outcome::Failed { label, error } => {
            let label = label.as_deref().unwrap_or("<unknown>");
            match error {
                Error::StoreUnavailable(_) | Error::Database(_) | Error::Instrument(_) => {
                    error!(label, kind = error.kind(), "Sample {:?} not updated: {}", label, error)
                }
                _ => warn!(label, kind = error.kind(), "Sample {:?} not updated: {}", label, error),
            }
        }
    }
}

/// Counters for a finished event loop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub received: usize,
    pub processed: usize,
    pub failed: usize,
}

/// Drain notifications strictly in arrival order until the channel closes
/// or `shutdown` completes
///
/// Each event is fully handled before the next is taken from the queue.
pub async fn run_event_loop<F>(
    handler: &NotificationHandler,
    events: &mut mpsc::UnboundedReceiver<SampleEvent>,
    shutdown: F,
) -> LoopStats
where
    F: Future<Output = ()>,
{
    let mut stats = LoopStats::default();
    tokio::pin!(shutdown);

    loop {
        let event = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping event loop");
                break;
            }
            event = events.recv() => match event {
                Some(event) => event,
                None => {
                    warn!("Notification channel closed");
                    break;
                }
            },
        };

        stats.received += 1;
        match handler.handle_event(&event).await {
            Outcome::Processed(_) => stats.processed += 1,
            Outcome::Failed { .. } => stats.failed += 1,
            Outcome::Ignored => {}
        }
    }

    stats
}
