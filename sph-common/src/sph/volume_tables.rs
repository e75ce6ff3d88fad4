//! Volume table registry
//!
//! Three fixed tables map a canonical size key to the base volume used for
//! S derivation. Tables are built once on first use and never mutated.

use crate::sph::size_key::canonical_key;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Service bucket selecting one of the volume tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeBucket {
    RegularPlasmid,
    SpecialPlasmid,
    Pcr,
}

impl VolumeBucket {
    /// Bucket name as used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            VolumeBucket::RegularPlasmid => "regular-plasmid",
            VolumeBucket::SpecialPlasmid => "special-plasmid",
            VolumeBucket::Pcr => "pcr",
        }
    }

    fn table(&self) -> &'static HashMap<&'static str, f64> {
        match self {
            VolumeBucket::RegularPlasmid => &REGULAR_PLASMID,
            VolumeBucket::SpecialPlasmid => &SPECIAL_PLASMID,
            VolumeBucket::Pcr => &PCR,
        }
    }
}

impl fmt::Display for VolumeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Placeholder volumes pending the lab's tables; only regular-plasmid "4" -> 115 is confirmed.
// Plasmid keys are kb sizes ("4 kb" -> "4") or kb ranges ("11-15 kb" -> "1115").
static REGULAR_PLASMID: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("3", 90.0),
        ("4", 115.0),
        ("5", 140.0),
        ("6", 165.0),
        ("7", 190.0),
        ("8", 215.0),
        ("9", 240.0),
        ("10", 265.0),
        ("1115", 330.0),
        ("1620", 430.0),
        ("2130", 580.0),
        ("3140", 760.0),
    ])
});

static SPECIAL_PLASMID: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("3", 135.0),
        ("4", 170.0),
        ("5", 210.0),
        ("6", 245.0),
        ("7", 285.0),
        ("8", 320.0),
        ("9", 360.0),
        ("10", 395.0),
        ("1115", 495.0),
        ("1620", 645.0),
        ("2130", 870.0),
        ("3140", 1140.0),
    ])
});

// PCR keys are bp sizes ("PCR - 300 bp" -> "300"); kb sizes collapse ("1.5 kb" -> "15").
static PCR: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("100", 6.0),
        ("200", 10.0),
        ("300", 14.0),
        ("400", 18.0),
        ("500", 22.0),
        ("600", 26.0),
        ("700", 30.0),
        ("800", 34.0),
        ("900", 38.0),
        ("1000", 42.0),
        ("15", 60.0),
        ("2", 80.0),
        ("3", 120.0),
    ])
});

/// Look up the base volume for a size descriptor in the given bucket
///
/// Fails with `Error::LookupKey` when the descriptor has no digits or its
/// key is not in the bucket's table.
pub fn base_volume(bucket: VolumeBucket, descriptor: &str) -> Result<f64> {
    let key = canonical_key(descriptor);

    bucket
        .table()
        .get(key.as_str())
        .copied()
        .ok_or_else(|| Error::LookupKey {
            bucket: bucket.name(),
            descriptor: descriptor.to_string(),
            key,
        })
}
