//! Parsing of `powerDetails` source units into power fragments.

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

use crate::config::ProcessingConfig;
use crate::error::HistoryError;
use crate::series::MeterKind;

use super::parse_timestamp;

/// One parsed `powerDetails` source unit: a timestamp list plus the four
/// co-indexed meter value lists.
///
/// Misaligned meters cannot be represented — cross-meter timestamp
/// agreement is enforced while parsing, before any later sort touches the
/// data. Missing readings are already normalized to 0.
#[derive(Debug, Clone)]
pub struct PowerFragment {
    /// Quarter-hour timestamps, as this source unit reported them.
    pub timestamps: Vec<NaiveDateTime>,
    /// Household consumption (W).
    pub consumption: Vec<f64>,
    /// System production (W).
    pub production: Vec<f64>,
    /// Grid export (W).
    pub feed_in: Vec<f64>,
    /// Grid import (W).
    pub purchased: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct PowerDetailsFile {
    #[serde(rename = "powerDetails")]
    power_details: PowerDetailsPayload,
}

#[derive(Debug, Deserialize)]
struct PowerDetailsPayload {
    #[serde(rename = "timeUnit")]
    time_unit: String,
    unit: String,
    meters: Vec<MeterPayload>,
}

#[derive(Debug, Deserialize)]
struct MeterPayload {
    #[serde(rename = "type")]
    kind: String,
    values: Vec<ValueEntry>,
}

#[derive(Debug, Deserialize)]
struct ValueEntry {
    date: String,
    #[serde(default)]
    value: Option<f64>,
}

impl PowerFragment {
    /// Parses one `powerDetails` source unit from raw JSON.
    ///
    /// The payload must declare the configured `timeUnit` and `unit`,
    /// carry each of the four meters exactly once, and report identical
    /// timestamp sequences for all of them. Entries without a `value`
    /// default to 0.
    ///
    /// # Errors
    ///
    /// * [`HistoryError::Payload`] for malformed JSON
    /// * [`HistoryError::UnexpectedUnit`] for a cadence or unit mismatch
    /// * [`HistoryError::UnknownMeter`] / [`HistoryError::DuplicateMeter`] /
    ///   [`HistoryError::MissingMeter`] for a meter set outside the fixed
    ///   four
    /// * [`HistoryError::Alignment`] when a meter's timestamps diverge
    ///   from the fragment's reference meter
    /// * [`HistoryError::Timestamp`] for a date outside the documented
    ///   format
    pub fn from_json(raw: &str, config: &ProcessingConfig) -> Result<Self, HistoryError> {
        let file: PowerDetailsFile = serde_json::from_str(raw)?;
        let details = file.power_details;

        if details.time_unit != config.time_unit {
            return Err(HistoryError::UnexpectedUnit {
                field: "timeUnit",
                got: details.time_unit,
                want: config.time_unit.clone(),
            });
        }
        if details.unit != config.unit {
            return Err(HistoryError::UnexpectedUnit {
                field: "unit",
                got: details.unit,
                want: config.unit.clone(),
            });
        }

        let mut timestamps: Option<(MeterKind, Vec<NaiveDateTime>)> = None;
        let mut meters: [Option<Vec<f64>>; 4] = [None, None, None, None];

        for meter in &details.meters {
            let kind = MeterKind::from_api_name(&meter.kind)
                .ok_or_else(|| HistoryError::UnknownMeter(meter.kind.clone()))?;

            let meter_timestamps = meter
                .values
                .iter()
                .map(|entry| parse_timestamp(&entry.date))
                .collect::<Result<Vec<_>, _>>()?;

            if let Some((reference, reference_timestamps)) = &timestamps {
                if meter_timestamps != *reference_timestamps {
                    return Err(HistoryError::Alignment {
                        meter: kind.as_str(),
                        reference: reference.as_str(),
                    });
                }
            } else {
                timestamps = Some((kind, meter_timestamps));
            }

            let slot = &mut meters[slot_index(kind)];
            if slot.is_some() {
                return Err(HistoryError::DuplicateMeter(kind.as_str()));
            }
            *slot = Some(
                meter
                    .values
                    .iter()
                    .map(|entry| entry.value.unwrap_or(0.0))
                    .collect(),
            );
        }

        for kind in MeterKind::ALL {
            if meters[slot_index(kind)].is_none() {
                return Err(HistoryError::MissingMeter(kind.as_str()));
            }
        }

        let timestamps = timestamps.map(|(_, t)| t).unwrap_or_default();
        debug!(entries = timestamps.len(), "parsed power-details source unit");

        let [consumption, production, feed_in, purchased] = meters;
        Ok(Self {
            timestamps,
            consumption: consumption.unwrap_or_default(),
            production: production.unwrap_or_default(),
            feed_in: feed_in.unwrap_or_default(),
            purchased: purchased.unwrap_or_default(),
        })
    }
}

fn slot_index(kind: MeterKind) -> usize {
    match kind {
        MeterKind::Consumption => 0,
        MeterKind::Production => 1,
        MeterKind::FeedIn => 2,
        MeterKind::Purchased => 3,
    }
}
