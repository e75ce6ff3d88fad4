//! SPH (S/P/H) derivation
//!
//! Turns order/sample classification plus a measured concentration into
//! the three processing parameters persisted per sample:
//! - S: volume-scaling factor
//! - P: priority flag
//! - H: heating/cycle parameter
//!
//! # Layout
//!
//! - `size_key`: canonical lookup key from a free-form size descriptor
//! - `volume_tables`: immutable per-bucket base volume tables
//! - `calculator`: the classification decision tree

mod calculator;
pub mod size_key;
pub mod volume_tables;

pub use calculator::{calculate, normalize_concentration, SphResult};
pub use size_key::canonical_key;
pub use volume_tables::{base_volume, VolumeBucket};
