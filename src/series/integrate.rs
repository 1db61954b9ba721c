//! Time-weighted integration of power samples into energy totals.

use chrono::NaiveDateTime;

use crate::error::HistoryError;

/// Elapsed time assumed for the first sample (minutes), which has no
/// predecessor to measure against. Matches the vendor's battery telemetry
/// cadence.
pub const DEFAULT_LEAD_IN_MINUTES: f64 = 5.0;

/// Integrates a power series over uneven timestamps into watt-hours.
///
/// Each sample's power is weighted by the time elapsed since the previous
/// sample: `energy = Σ dt_i · power_i`. The first sample has no
/// predecessor, so it is weighted by `lead_in_minutes` instead of zero —
/// a documented boundary policy, not an edge-case accident. Signed power
/// integrates as-is; pre-filter to a single sign (e.g. only discharge)
/// for a directional total.
///
/// Timestamps must be ascending; the merge step guarantees this for any
/// series it produced.
///
/// # Arguments
///
/// * `timestamps` - Sample timestamps, ascending
/// * `powers_w` - Sample powers (W), co-indexed with `timestamps`
/// * `lead_in_minutes` - Weight for the first sample (minutes, > 0);
///   [`DEFAULT_LEAD_IN_MINUTES`] unless the telemetry cadence changed
///
/// # Errors
///
/// Returns [`HistoryError::NoData`] for an empty series: "no energy
/// measured" must not read as "zero energy measured".
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn energy_wh(
    timestamps: &[NaiveDateTime],
    powers_w: &[f64],
    lead_in_minutes: f64,
) -> Result<f64, HistoryError> {
    assert_eq!(timestamps.len(), powers_w.len());
    if timestamps.is_empty() {
        return Err(HistoryError::NoData("power samples"));
    }

    let mut total = lead_in_minutes / 60.0 * powers_w[0];
    for i in 1..timestamps.len() {
        let dt_hours = (timestamps[i] - timestamps[i - 1]).num_seconds() as f64 / 3600.0;
        total += dt_hours * powers_w[i];
    }
    Ok(total)
}
