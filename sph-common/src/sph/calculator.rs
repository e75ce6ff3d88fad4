//! SPH decision tree
//!
//! Branches are checked in a fixed order and the first match wins:
//! 1. SeqDSC            -> (1.5, 1, 3)
//! 2. SeqReady2Load     -> (99, 0, 0)
//! 3. SeqRegular
//!    a. premixed       -> (6, 0, 0) if special plasmid, else (5, 0, 0)
//!    b. plasmid        -> volume table (special or regular plasmid)
//!    c. unpurified PCR -> (1.2, 1, 3)
//! 4. anything else     -> `Error::UnclassifiedSample`

use crate::db::{OrderContext, ServiceType};
use crate::sph::volume_tables::{base_volume, VolumeBucket};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Lower bound for table-derived S
pub const MIN_S: f64 = 1.0;
/// Upper bound for table-derived S
pub const MAX_S: f64 = 4.0;

/// Derived (S, P, H) triple for one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SphResult {
    pub s: f64,
    pub p: i64,
    pub h: i64,
}

impl SphResult {
    const fn fixed(s: f64, p: i64, h: i64) -> Self {
        Self { s, p, h }
    }
}

impl fmt::Display for SphResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S={} P={} H={}", self.s, self.p, self.h)
    }
}

const DSC: SphResult = SphResult::fixed(1.5, 1, 3);
const READY_TO_LOAD: SphResult = SphResult::fixed(99.0, 0, 0);
const PREMIXED_SPECIAL_PLASMID: SphResult = SphResult::fixed(6.0, 0, 0);
const PREMIXED: SphResult = SphResult::fixed(5.0, 0, 0);
const UNPURIFIED_PCR: SphResult = SphResult::fixed(1.2, 1, 3);

/// Raise a measured concentration to at least 1
///
/// Non-finite readings are treated as 1.
pub fn normalize_concentration(concentration: f64) -> f64 {
    if concentration.is_finite() {
        concentration.max(1.0)
    } else {
        1.0
    }
}

/// Compute the SPH triple for a sample
///
/// Pure over its inputs and the static volume tables. The concentration is
/// normalized with [`normalize_concentration`] before use.
pub fn calculate(concentration: f64, order: &OrderContext) -> Result<SphResult> {
    let concentration = normalize_concentration(concentration);

    match order.service_type {
        ServiceType::SeqDsc => Ok(DSC),
        ServiceType::SeqReady2Load => Ok(READY_TO_LOAD),
        ServiceType::SeqRegular => calculate_regular(concentration, order),
        ServiceType::Other(_) => Err(unclassified(order)),
    }
}

fn calculate_regular(concentration: f64, order: &OrderContext) -> Result<SphResult> {
    if order.is_premixed() {
        return if order.is_plasmid() && order.is_special() {
            Ok(PREMIXED_SPECIAL_PLASMID)
        } else {
            Ok(PREMIXED)
        };
    }

    if order.is_plasmid() {
        let bucket = if order.is_special() {
            VolumeBucket::SpecialPlasmid
        } else {
            VolumeBucket::RegularPlasmid
        };
        return from_volume_table(bucket, &order.sample_size, concentration);
    }

    // Purified PCR samples have no branch of their own and fall through to
    // UnclassifiedSample; the PCR table is never selected here.
    if order.is_pcr() && !order.is_purified() {
        return Ok(UNPURIFIED_PCR);
    }

    Err(unclassified(order))
}

fn from_volume_table(bucket: VolumeBucket, sample_size: &str, concentration: f64) -> Result<SphResult> {
    let base = base_volume(bucket, sample_size)?;
    let s = round_to_tenth(base / concentration).clamp(MIN_S, MAX_S);

    Ok(SphResult {
        s,
        p: 1,
        h: 4 - s.floor() as i64,
    })
}

/// Ties go to the even digit: 1.25 -> 1.2, 1.35 -> 1.4
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn unclassified(order: &OrderContext) -> Error {
    Error::UnclassifiedSample {
        service_type: order.service_type.to_string(),
        dna_type: order.dna_type.clone(),
        sample_size: order.sample_size.clone(),
    }
}
