//! Database models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order service type (`ordertable.ServiceType`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    SeqDsc,
    SeqReady2Load,
    SeqRegular,
    Other(String),
}

impl ServiceType {
    /// Parse the stored column value; unknown values are kept verbatim
    pub fn from_db(value: &str) -> Self {
        match value {
            "SeqDSC" => ServiceType::SeqDsc,
            "SeqReady2Load" => ServiceType::SeqReady2Load,
            "SeqRegular" => ServiceType::SeqRegular,
            other => ServiceType::Other(other.to_string()),
        }
    }

    pub fn as_db_str(&self) -> &str {
        match self {
            ServiceType::SeqDsc => "SeqDSC",
            ServiceType::SeqReady2Load => "SeqReady2Load",
            ServiceType::SeqRegular => "SeqRegular",
            ServiceType::Other(value) => value,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Joined order/sample row used for SPH classification
///
/// Read once per notification and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderContext {
    pub service_type: ServiceType,
    /// `sampletable.DNAType` ("Plasmid", "PCR", ...)
    pub dna_type: String,
    /// `sampletable.purification` ("purified" or anything else)
    pub purification: String,
    /// `sampletable.isSpecial` ("yes" or anything else)
    pub is_special: String,
    /// `sampletable.SampleSize`, free-form
    pub sample_size: String,
    /// `sampletable.Premixed` ("Y" or anything else)
    pub sample_premixed: String,
    /// `ordertable.Premixed` ("Y" or anything else)
    pub order_premixed: String,
}

impl OrderContext {
    /// Premixed on either the order or the sample
    pub fn is_premixed(&self) -> bool {
        self.order_premixed == "Y" || self.sample_premixed == "Y"
    }

    pub fn is_plasmid(&self) -> bool {
        self.dna_type == "Plasmid" || self.sample_size.starts_with("Plasmid")
    }

    pub fn is_pcr(&self) -> bool {
        self.dna_type == "PCR" || self.sample_size.starts_with("PCR")
    }

    pub fn is_special(&self) -> bool {
        self.is_special == "yes"
    }

    pub fn is_purified(&self) -> bool {
        self.purification == "purified"
    }
}

/// Row update committed once per processed sample
///
/// Enumerates exactly the writable `sampletable` columns plus the key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRecord {
    pub order_number: i64,
    pub sample_id: i64,
    /// `measuredSampleCntr`, always >= 1
    pub measured_concentration: i64,
    pub s: f64,
    pub p: i64,
    pub h: i64,
    /// Rounded to two decimals
    pub a260_a280: f64,
    /// Rounded to two decimals
    pub a260_a230: f64,
}
