//! Post-hoc summary report over a reconciled history.

use std::fmt;

use chrono::NaiveDateTime;

use crate::history::EnergyHistory;
use crate::series::integrate::energy_wh;

/// Aggregate summary derived from a complete history.
///
/// Computed post-hoc from [`EnergyHistory`] so the report can never
/// disagree with the dataset it describes. Energy totals integrate the
/// raw irregular samples, not the grid-aligned means.
#[derive(Debug, Clone)]
pub struct HistoryReport {
    /// Number of power-grid points.
    pub grid_points: usize,
    /// First grid timestamp, if any.
    pub grid_start: Option<NaiveDateTime>,
    /// Last grid timestamp, if any.
    pub grid_end: Option<NaiveDateTime>,
    /// Number of raw battery telemetry samples.
    pub battery_sample_count: usize,
    /// Grid buckets that received at least one battery sample.
    pub populated_buckets: usize,
    /// Energy charged from the AC grid (Wh).
    pub charge_from_grid_wh: f64,
    /// Energy charged from solar surplus (Wh).
    pub charge_from_solar_wh: f64,
    /// Energy discharged by the battery (Wh).
    pub discharge_wh: f64,
    /// State of charge of the most recent telemetry record (percent).
    pub last_soc_pct: Option<f64>,
}

impl HistoryReport {
    /// Computes the full report from a history.
    ///
    /// # Arguments
    ///
    /// * `history` - The reconciled dataset
    /// * `lead_in_minutes` - First-sample weight for the energy
    ///   integrations (minutes)
    pub fn from_history(history: &EnergyHistory, lead_in_minutes: f64) -> Self {
        let timestamps = history.timestamps();
        let samples = history.battery_samples();

        let (charge_from_grid_wh, charge_from_solar_wh, discharge_wh) = if samples.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let sample_times: Vec<NaiveDateTime> = samples.iter().map(|s| s.timestamp).collect();
            let breakdown = history.telemetry_breakdown();
            // the series are non-empty here, so integration cannot fail
            let total = |powers: &[f64]| {
                energy_wh(&sample_times, powers, lead_in_minutes).unwrap_or(0.0)
            };
            (
                total(&breakdown.charge_from_grid),
                total(&breakdown.charge_from_solar),
                total(&breakdown.discharge),
            )
        };

        Self {
            grid_points: timestamps.len(),
            grid_start: timestamps.first().copied(),
            grid_end: timestamps.last().copied(),
            battery_sample_count: samples.len(),
            populated_buckets: history.populated_buckets(),
            charge_from_grid_wh,
            charge_from_solar_wh,
            discharge_wh,
            last_soc_pct: history.last_state_of_charge().ok(),
        }
    }
}

impl fmt::Display for HistoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- History Report ---")?;
        match (self.grid_start, self.grid_end) {
            (Some(start), Some(end)) => {
                writeln!(f, "Power grid:            {start} to {end} ({} points)", self.grid_points)?;
            }
            _ => writeln!(f, "Power grid:            empty")?,
        }
        writeln!(
            f,
            "Battery telemetry:     {} samples in {} buckets",
            self.battery_sample_count, self.populated_buckets
        )?;
        writeln!(
            f,
            "Charged from grid:     {:.1} Wh",
            self.charge_from_grid_wh
        )?;
        writeln!(
            f,
            "Charged from solar:    {:.1} Wh",
            self.charge_from_solar_wh
        )?;
        writeln!(f, "Discharged:            {:.1} Wh", self.discharge_wh)?;
        match self.last_soc_pct {
            Some(soc) => write!(f, "Last state of charge:  {soc:.1}%"),
            None => write!(f, "Last state of charge:  unknown"),
        }
    }
}
