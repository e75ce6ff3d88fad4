//! Notification and sample payload types

use crate::label::SampleKey;
use serde::Deserialize;
use serde_json::Value;
use sph_common::db::UpdateRecord;
use sph_common::sph::normalize_concentration;
use sph_common::SphResult;

/// Marker value announcing a new sample
pub const SAMPLE_READY: &str = "sample";

/// Pushed notification from the instrument
///
/// Only `{"ready": "sample"}` means anything; every other shape decodes to
/// an event that is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleEvent {
    pub ready: Option<String>,
}

impl SampleEvent {
    /// Decode a notification message
    ///
    /// Accepts a JSON object, or a JSON string whose contents are an object.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                ready: map.get("ready").and_then(Value::as_str).map(str::to_string),
            },
            Value::String(text) => serde_json::from_str::<Value>(text)
                .ok()
                .filter(Value::is_object)
                .map(|inner| Self::from_json(&inner))
                .unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn sample_ready() -> Self {
        Self {
            ready: Some(SAMPLE_READY.to_string()),
        }
    }

    pub fn is_sample_ready(&self) -> bool {
        self.ready.as_deref() == Some(SAMPLE_READY)
    }
}

/// Body of the instrument's current-sample endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SamplePayload {
    /// "<order_number> <sample_id>"
    pub label: String,
    /// Measured concentration
    pub c: Option<f64>,
    pub a260_a280: Option<f64>,
    pub a260_a230: Option<f64>,
}

impl SamplePayload {
    /// Concentration used for calculation: defaults to 1, never below 1
    pub fn concentration(&self) -> f64 {
        normalize_concentration(self.c.unwrap_or(1.0))
    }

    /// Integer concentration stored as `measuredSampleCntr`
    pub fn measured_concentration(&self) -> i64 {
        self.concentration().trunc() as i64
    }

    /// Build the row update for this sample
    pub fn update_record(&self, key: SampleKey, sph: SphResult) -> UpdateRecord {
        UpdateRecord {
            order_number: key.order_number,
            sample_id: key.sample_id,
            measured_concentration: self.measured_concentration(),
            s: sph.s,
            p: sph.p,
            h: sph.h,
            a260_a280: round_to_hundredth(self.a260_a280.unwrap_or(0.0)),
            a260_a230: round_to_hundredth(self.a260_a230.unwrap_or(0.0)),
        }
    }
}

fn round_to_hundredth(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round_ties_even() / 100.0
    } else {
        0.0
    }
}
