//! Parsing of `storageData` source units into battery samples.

use serde::Deserialize;
use tracing::debug;

use crate::error::HistoryError;
use crate::series::BatterySample;

use super::parse_timestamp;

#[derive(Debug, Deserialize)]
struct StorageFile {
    #[serde(rename = "storageData")]
    storage_data: StoragePayload,
}

#[derive(Debug, Deserialize)]
struct StoragePayload {
    #[serde(rename = "batteryCount")]
    battery_count: u64,
    batteries: Vec<BatteryPayload>,
}

#[derive(Debug, Deserialize)]
struct BatteryPayload {
    telemetries: Vec<TelemetryEntry>,
}

#[derive(Debug, Deserialize)]
struct TelemetryEntry {
    #[serde(rename = "timeStamp")]
    time_stamp: String,
    #[serde(default)]
    power: Option<f64>,
    #[serde(rename = "ACGridCharging", default)]
    ac_grid_charging: f64,
    #[serde(rename = "batteryPercentageState", default)]
    battery_percentage_state: f64,
    #[serde(rename = "fullPackEnergyAvailable", default)]
    full_pack_energy_available: f64,
}

/// Parses one `storageData` source unit into battery samples.
///
/// Only single-battery installations are modeled: any other
/// `batteryCount` fails fast rather than guessing which battery to read.
/// A `null` power reading normalizes to 0; the AC-grid-charging flag is
/// set for any nonzero value.
///
/// # Errors
///
/// * [`HistoryError::Payload`] for malformed JSON
/// * [`HistoryError::UnsupportedConfiguration`] when `batteryCount != 1`
/// * [`HistoryError::IncompletePayload`] when the battery list is empty
///   despite the declared count
/// * [`HistoryError::Timestamp`] for a timestamp outside the documented
///   format
pub fn parse_storage_data(raw: &str) -> Result<Vec<BatterySample>, HistoryError> {
    let file: StorageFile = serde_json::from_str(raw)?;
    let storage = file.storage_data;

    if storage.battery_count != 1 {
        return Err(HistoryError::UnsupportedConfiguration {
            battery_count: storage.battery_count,
        });
    }
    let battery = storage
        .batteries
        .first()
        .ok_or(HistoryError::IncompletePayload(
            "storageData.batteries is empty",
        ))?;

    let mut samples = Vec::with_capacity(battery.telemetries.len());
    for entry in &battery.telemetries {
        samples.push(BatterySample {
            timestamp: parse_timestamp(&entry.time_stamp)?,
            power_w: entry.power.unwrap_or(0.0),
            grid_charging: entry.ac_grid_charging != 0.0,
            soc_pct: entry.battery_percentage_state,
            full_pack_wh: entry.full_pack_energy_available,
        });
    }

    debug!(samples = samples.len(), "parsed storage-data source unit");
    Ok(samples)
}
