//! Instrument label parsing

use sph_common::{Error, Result};
use std::fmt;

/// (order number, sample id) key carried by the instrument label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleKey {
    pub order_number: i64,
    pub sample_id: i64,
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order {} sample {}", self.order_number, self.sample_id)
    }
}

/// Split "<order_number> <sample_id>" into its two integers
///
/// Anything other than exactly two whitespace-separated integer tokens is
/// `Error::LabelFormat`.
pub fn parse_label(label: &str) -> Result<SampleKey> {
    let mut tokens = label.split_whitespace();

    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(order), Some(sample), None) => {
            let order_number: i64 = order.parse().map_err(|_| Error::LabelFormat(label.to_string()))?;
            let sample_id: i64 = sample.parse().map_err(|_| Error::LabelFormat(label.to_string()))?;
            Ok(SampleKey {
                order_number,
                sample_id,
            })
        }
        _ => Err(Error::LabelFormat(label.to_string())),
    }
}
