//! sph-bridge library - instrument notification to relational store bridge
//!
//! Listens for the instrument's "sample ready" push, fetches the sample,
//! derives its SPH values and writes them onto the matching sample row.

pub mod event;
pub mod instrument;
pub mod label;
pub mod notify;
pub mod pipeline;
pub mod settings;

pub use event::{SampleEvent, SamplePayload};
pub use instrument::InstrumentClient;
pub use label::{parse_label, SampleKey};
pub use pipeline::{run_event_loop, NotificationHandler, Outcome, Pipeline, ProcessedSample};
