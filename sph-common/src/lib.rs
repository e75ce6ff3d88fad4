//! # SPH Common Library
//!
//! Shared code for the sample-ready bridge:
//! - Error taxonomy for the per-sample pipeline
//! - Configuration loading (TOML file + compiled defaults)
//! - Size descriptor parsing and volume lookup tables
//! - SPH (S/P/H) calculation
//! - Order context queries and result updates against the relational store

pub mod config;
pub mod db;
pub mod error;
pub mod sph;

pub use error::{Error, Result};
pub use sph::{calculate, SphResult};
