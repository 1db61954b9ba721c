//! Decomposition of signed battery power into non-negative components.
//!
//! Every function here is pure and allocates a fresh result; nothing is
//! memoized, so a view can never drift from what a recomputation would
//! produce.

use super::BatterySample;

/// Charging mask over aligned battery power: `true` strictly above zero.
///
/// An exactly-zero reading counts as non-charging.
pub fn is_charging(battery_power: &[f64]) -> Vec<bool> {
    battery_power.iter().map(|&p| p > 0.0).collect()
}

/// Battery charging power: the positive part of the signal, zero elsewhere.
pub fn charge_rate(battery_power: &[f64]) -> Vec<f64> {
    battery_power
        .iter()
        .map(|&p| if p > 0.0 { p } else { 0.0 })
        .collect()
}

/// Battery output as positive watts: the negated negative part of the
/// signal, zero while charging or flat.
pub fn battery_production(battery_power: &[f64]) -> Vec<f64> {
    battery_power
        .iter()
        .map(|&p| if p < 0.0 { -p } else { 0.0 })
        .collect()
}

/// Apparent solar production: meter production plus battery discharge.
///
/// Charging periods contribute nothing here; power drawn into the battery
/// already shows up on the consumption/import meters.
///
/// # Panics
///
/// Panics if the two arrays are not grid-length-aligned.
pub fn solar_production(production: &[f64], battery_power: &[f64]) -> Vec<f64> {
    assert_eq!(production.len(), battery_power.len());
    production
        .iter()
        .zip(battery_power)
        .map(|(&prod, &bat)| prod + if bat < 0.0 { -bat } else { 0.0 })
        .collect()
}

/// Per-telemetry decomposition of raw battery samples.
///
/// Unlike the grid-aligned views above, these series are derived directly
/// from the irregular samples, using the AC-grid-charging flag the
/// telemetry carries. The three power partitions are mutually exclusive
/// and jointly cover every sample; an exactly-zero reading lands in none
/// of them.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryBreakdown {
    /// Charging power drawn from the AC grid (W, >= 0).
    pub charge_from_grid: Vec<f64>,
    /// Charging power drawn from solar surplus (W, >= 0).
    pub charge_from_solar: Vec<f64>,
    /// Discharging power as positive watts (>= 0).
    pub discharge: Vec<f64>,
    /// Energy held in the pack per sample (Wh): capacity scaled by state
    /// of charge. A point-in-time quantity, never integrated.
    pub stored_energy: Vec<f64>,
}

impl TelemetryBreakdown {
    /// Classifies every sample into the three power partitions and
    /// computes its stored energy.
    pub fn from_samples(samples: &[BatterySample]) -> Self {
        let mut charge_from_grid = Vec::with_capacity(samples.len());
        let mut charge_from_solar = Vec::with_capacity(samples.len());
        let mut discharge = Vec::with_capacity(samples.len());
        let mut stored_energy = Vec::with_capacity(samples.len());

        for sample in samples {
            let p = sample.power_w;
            charge_from_grid.push(if p > 0.0 && sample.grid_charging { p } else { 0.0 });
            charge_from_solar.push(if p > 0.0 && !sample.grid_charging { p } else { 0.0 });
            discharge.push(if p < 0.0 { -p } else { 0.0 });
            stored_energy.push(sample.full_pack_wh * sample.soc_pct / 100.0);
        }

        Self {
            charge_from_grid,
            charge_from_solar,
            discharge,
            stored_energy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 3, 5)
            .unwrap()
            .and_hms_opt(12, m, 0)
            .unwrap()
    }

    fn sample(m: u32, power_w: f64, grid_charging: bool) -> BatterySample {
        BatterySample {
            timestamp: ts(m),
            power_w,
            grid_charging,
            soc_pct: 40.0,
            full_pack_wh: 9_700.0,
        }
    }

    #[test]
    fn charging_mask_excludes_exact_zero() {
        assert_eq!(
            is_charging(&[60.0, -30.0, 0.0]),
            vec![true, false, false]
        );
    }

    #[test]
    fn charge_and_production_split_the_signal() {
        let aligned = [60.0, -30.0, 0.0];
        assert_eq!(charge_rate(&aligned), vec![60.0, 0.0, 0.0]);
        assert_eq!(battery_production(&aligned), vec![0.0, 30.0, 0.0]);
    }

    #[test]
    fn charge_minus_production_reconstructs_the_signal() {
        let aligned = [250.0, -40.0, 0.0, -0.5, 13.25];
        let charge = charge_rate(&aligned);
        let production = battery_production(&aligned);
        for i in 0..aligned.len() {
            assert_eq!(charge[i] - production[i], aligned[i]);
            // exactly one side of the split is nonzero, unless the signal is flat
            assert!(charge[i] == 0.0 || production[i] == 0.0);
        }
    }

    #[test]
    fn solar_production_adds_discharge_only() {
        let production = [1000.0, 500.0, 0.0];
        let battery = [200.0, -300.0, 0.0];
        assert_eq!(
            solar_production(&production, &battery),
            vec![1000.0, 800.0, 0.0]
        );
    }

    #[test]
    fn breakdown_partitions_are_exclusive_and_exhaustive() {
        let samples = vec![
            sample(0, 400.0, true),   // grid charge
            sample(5, 250.0, false),  // solar charge
            sample(11, -380.0, false), // discharge
            sample(16, 0.0, true),    // flat: contributes to none
        ];
        let breakdown = TelemetryBreakdown::from_samples(&samples);

        assert_eq!(breakdown.charge_from_grid, vec![400.0, 0.0, 0.0, 0.0]);
        assert_eq!(breakdown.charge_from_solar, vec![0.0, 250.0, 0.0, 0.0]);
        assert_eq!(breakdown.discharge, vec![0.0, 0.0, 380.0, 0.0]);

        // grid + solar − discharge reassembles the raw signal
        for (i, s) in samples.iter().enumerate() {
            let rebuilt = breakdown.charge_from_grid[i] + breakdown.charge_from_solar[i]
                - breakdown.discharge[i];
            assert_eq!(rebuilt, s.power_w);
        }
    }

    #[test]
    fn stored_energy_scales_capacity_by_soc() {
        let breakdown = TelemetryBreakdown::from_samples(&[sample(0, 0.0, false)]);
        // 9700 Wh * 40% = 3880 Wh
        assert_eq!(breakdown.stored_energy, vec![3_880.0]);
    }

    #[test]
    fn empty_samples_yield_empty_breakdown() {
        let breakdown = TelemetryBreakdown::from_samples(&[]);
        assert!(breakdown.charge_from_grid.is_empty());
        assert!(breakdown.stored_energy.is_empty());
    }
}
