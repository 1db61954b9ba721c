//! End-to-end history dataset: merged meters, aligned battery power, and
//! derived views.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::config::ProcessingConfig;
use crate::error::HistoryError;
use crate::ingest::{PowerFragment, parse_storage_data};
use crate::series::aggregate::mean_by_bucket;
use crate::series::align::align_to_grid;
use crate::series::decompose::{self, TelemetryBreakdown};
use crate::series::merge::{merge_battery_fragments, merge_power_fragments};
use crate::series::{BatterySample, MeterSet};

/// One processing run's reconciled dataset.
///
/// Owns the merged meter set, the merged raw battery samples, and the
/// battery power aligned onto the power grid. Alignment and aggregation
/// happen once, in the constructor; every decomposed view is a pure
/// function of the owned data and allocates a fresh result, so rereading
/// a view can never disagree with recomputing it.
#[derive(Debug, Clone)]
pub struct EnergyHistory {
    meters: MeterSet,
    battery_samples: Vec<BatterySample>,
    bucket_assignments: Vec<usize>,
    battery_power: Vec<f64>,
}

impl EnergyHistory {
    /// Builds a history from an already-merged meter set and battery
    /// series.
    ///
    /// # Errors
    ///
    /// * [`HistoryError::OutOfRange`] if a battery sample precedes the
    ///   power grid start
    /// * [`HistoryError::NoData`] if battery samples exist but the power
    ///   grid is empty
    pub fn new(
        meters: MeterSet,
        battery_samples: Vec<BatterySample>,
    ) -> Result<Self, HistoryError> {
        let sample_times: Vec<NaiveDateTime> =
            battery_samples.iter().map(|s| s.timestamp).collect();
        let bucket_assignments = align_to_grid(meters.timestamps(), &sample_times)?;

        let powers: Vec<f64> = battery_samples.iter().map(|s| s.power_w).collect();
        let battery_power = mean_by_bucket(&bucket_assignments, &powers, meters.len());

        debug!(
            grid_points = meters.len(),
            samples = battery_samples.len(),
            "aligned battery telemetry onto power grid"
        );

        Ok(Self {
            meters,
            battery_samples,
            bucket_assignments,
            battery_power,
        })
    }

    /// Builds a history straight from raw source-unit payloads.
    ///
    /// Each element of `power_details` is one `powerDetails` JSON unit and
    /// each element of `storage_data` one `storageData` JSON unit; the
    /// fragments merge into one sorted, deduplicated series per stream
    /// before alignment.
    ///
    /// # Errors
    ///
    /// Propagates any ingestion error ([`PowerFragment::from_json`],
    /// [`parse_storage_data`]) and any alignment error from
    /// [`EnergyHistory::new`].
    pub fn from_payloads(
        power_details: &[&str],
        storage_data: &[&str],
        config: &ProcessingConfig,
    ) -> Result<Self, HistoryError> {
        let fragments = power_details
            .iter()
            .map(|raw| PowerFragment::from_json(raw, config))
            .collect::<Result<Vec<_>, _>>()?;
        let meters = merge_power_fragments(fragments);

        let telemetry = storage_data
            .iter()
            .map(|raw| parse_storage_data(raw))
            .collect::<Result<Vec<_>, _>>()?;
        let samples = merge_battery_fragments(telemetry);

        Self::new(meters, samples)
    }

    /// The merged power-meter set.
    pub fn meters(&self) -> &MeterSet {
        &self.meters
    }

    /// The canonical power grid.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        self.meters.timestamps()
    }

    /// Raw merged battery samples, before any grid alignment.
    pub fn battery_samples(&self) -> &[BatterySample] {
        &self.battery_samples
    }

    /// Grid bucket index per battery sample, co-indexed with
    /// [`EnergyHistory::battery_samples`].
    pub fn bucket_assignments(&self) -> &[usize] {
        &self.bucket_assignments
    }

    /// Battery power aligned onto the power grid: per-bucket mean, signed
    /// (positive = charging), zero for buckets without samples.
    pub fn battery_power(&self) -> &[f64] {
        &self.battery_power
    }

    /// Number of grid buckets that received at least one battery sample.
    pub fn populated_buckets(&self) -> usize {
        let mut seen = vec![false; self.meters.len()];
        for &bucket in &self.bucket_assignments {
            seen[bucket] = true;
        }
        seen.iter().filter(|&&s| s).count()
    }

    /// Charging mask over the aligned battery power.
    pub fn is_charging(&self) -> Vec<bool> {
        decompose::is_charging(&self.battery_power)
    }

    /// Battery charging power on the grid (W, >= 0).
    pub fn charge_rate(&self) -> Vec<f64> {
        decompose::charge_rate(&self.battery_power)
    }

    /// Battery discharge as positive production on the grid (W, >= 0).
    pub fn battery_production(&self) -> Vec<f64> {
        decompose::battery_production(&self.battery_power)
    }

    /// Apparent solar production: meter production plus battery discharge.
    pub fn solar_production(&self) -> Vec<f64> {
        decompose::solar_production(self.meters.production(), &self.battery_power)
    }

    /// Per-telemetry decomposition of the raw battery samples.
    pub fn telemetry_breakdown(&self) -> TelemetryBreakdown {
        TelemetryBreakdown::from_samples(&self.battery_samples)
    }

    /// State of charge reported by the most recent telemetry record
    /// (percent).
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NoData`] when no telemetry was ingested —
    /// a caller computing a charge percentage must not receive a
    /// fabricated number.
    pub fn last_state_of_charge(&self) -> Result<f64, HistoryError> {
        self.battery_samples
            .last()
            .map(|s| s.soc_pct)
            .ok_or(HistoryError::NoData("battery telemetry"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn quarter_grid_meters() -> MeterSet {
        MeterSet::from_parts(
            vec![ts(12, 0), ts(12, 15), ts(12, 30)],
            vec![400.0, 420.0, 410.0],
            vec![1500.0, 1450.0, 1600.0],
            vec![900.0, 800.0, 950.0],
            vec![0.0, 0.0, 0.0],
        )
    }

    fn sample(h: u32, m: u32, power_w: f64) -> BatterySample {
        BatterySample {
            timestamp: ts(h, m),
            power_w,
            grid_charging: false,
            soc_pct: 61.0,
            full_pack_wh: 9_700.0,
        }
    }

    /// The reference scenario: three quarter-hour buckets, two charging
    /// samples in the first and one discharging sample in the second.
    fn scenario() -> EnergyHistory {
        let samples = vec![
            sample(12, 2, 50.0),
            sample(12, 6, 70.0),
            sample(12, 18, -30.0),
        ];
        EnergyHistory::new(quarter_grid_meters(), samples).expect("scenario aligns")
    }

    #[test]
    fn scenario_bucket_assignment() {
        assert_eq!(scenario().bucket_assignments(), &[0, 0, 1]);
    }

    #[test]
    fn scenario_aligned_battery_power() {
        assert_eq!(scenario().battery_power(), &[60.0, -30.0, 0.0]);
    }

    #[test]
    fn scenario_decomposed_views() {
        let history = scenario();
        assert_eq!(history.is_charging(), vec![true, false, false]);
        assert_eq!(history.charge_rate(), vec![60.0, 0.0, 0.0]);
        assert_eq!(history.battery_production(), vec![0.0, 30.0, 0.0]);
        // solar production adds the 30 W discharge to the 1450 W meter reading
        assert_eq!(
            history.solar_production(),
            vec![1500.0, 1480.0, 1600.0]
        );
    }

    #[test]
    fn views_are_idempotent() {
        let history = scenario();
        assert_eq!(history.charge_rate(), history.charge_rate());
        assert_eq!(history.solar_production(), history.solar_production());
        assert_eq!(
            history.telemetry_breakdown(),
            history.telemetry_breakdown()
        );
    }

    #[test]
    fn populated_buckets_counts_distinct_assignments() {
        assert_eq!(scenario().populated_buckets(), 2);
    }

    #[test]
    fn sample_before_grid_fails_construction() {
        let result = EnergyHistory::new(quarter_grid_meters(), vec![sample(11, 59, 5.0)]);
        assert!(matches!(result, Err(HistoryError::OutOfRange { .. })));
    }

    #[test]
    fn no_battery_samples_is_a_valid_all_zero_history() {
        let history = EnergyHistory::new(quarter_grid_meters(), Vec::new());
        let history = history.expect("meter-only history is valid");
        assert_eq!(history.battery_power(), &[0.0, 0.0, 0.0]);
        assert_eq!(history.populated_buckets(), 0);
        assert!(matches!(
            history.last_state_of_charge(),
            Err(HistoryError::NoData(_))
        ));
    }

    #[test]
    fn last_state_of_charge_reads_the_latest_record() {
        let history = scenario();
        assert_eq!(history.last_state_of_charge().ok(), Some(61.0));
    }
}
