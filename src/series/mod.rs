//! Time-series data model and the reconciliation engine.

use chrono::NaiveDateTime;

pub mod aggregate;
pub mod align;
pub mod decompose;
pub mod integrate;
/// Fragment merging into sorted, deduplicated series.
pub mod merge;

/// The fixed set of power-flow meters reported by the monitoring device.
///
/// The vendor payload names these in CamelCase (`"Consumption"`, `"FeedIn"`,
/// ...); anything outside this set is rejected at ingestion rather than
/// synthesized dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeterKind {
    /// Household consumption.
    Consumption,
    /// System (inverter) production.
    Production,
    /// Power exported to the grid.
    FeedIn,
    /// Power imported from the grid.
    Purchased,
}

impl MeterKind {
    /// All meters, in canonical order.
    pub const ALL: [MeterKind; 4] = [
        MeterKind::Consumption,
        MeterKind::Production,
        MeterKind::FeedIn,
        MeterKind::Purchased,
    ];

    /// Maps a vendor payload `type` string onto the fixed meter set.
    ///
    /// Returns `None` for anything outside the set (including meters the
    /// vendor reports but this crate does not model, such as
    /// `SelfConsumption`).
    pub fn from_api_name(name: &str) -> Option<MeterKind> {
        match name {
            "Consumption" => Some(MeterKind::Consumption),
            "Production" => Some(MeterKind::Production),
            "FeedIn" => Some(MeterKind::FeedIn),
            "Purchased" => Some(MeterKind::Purchased),
            _ => None,
        }
    }

    /// Snake-case meter name used in reports and CSV headers.
    pub fn as_str(self) -> &'static str {
        match self {
            MeterKind::Consumption => "consumption",
            MeterKind::Production => "production",
            MeterKind::FeedIn => "feed_in",
            MeterKind::Purchased => "purchased",
        }
    }
}

/// Power-meter series sharing one canonical timestamp grid.
///
/// One named field per meter rather than a name-keyed map: the meter set is
/// closed, and every value vector is index-aligned with `timestamps`. After
/// merging, `timestamps` is strictly increasing with no duplicates.
#[derive(Debug, Clone, Default)]
pub struct MeterSet {
    timestamps: Vec<NaiveDateTime>,
    consumption: Vec<f64>,
    production: Vec<f64>,
    feed_in: Vec<f64>,
    purchased: Vec<f64>,
}

impl MeterSet {
    /// Assembles a meter set from index-aligned parts.
    ///
    /// # Panics
    ///
    /// Panics if any meter vector's length differs from the timestamp
    /// vector's.
    pub(crate) fn from_parts(
        timestamps: Vec<NaiveDateTime>,
        consumption: Vec<f64>,
        production: Vec<f64>,
        feed_in: Vec<f64>,
        purchased: Vec<f64>,
    ) -> Self {
        assert_eq!(timestamps.len(), consumption.len());
        assert_eq!(timestamps.len(), production.len());
        assert_eq!(timestamps.len(), feed_in.len());
        assert_eq!(timestamps.len(), purchased.len());
        Self {
            timestamps,
            consumption,
            production,
            feed_in,
            purchased,
        }
    }

    /// The canonical power grid: one timestamp per quarter-hour bucket.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Values for one meter, index-aligned with [`MeterSet::timestamps`].
    pub fn meter(&self, kind: MeterKind) -> &[f64] {
        match kind {
            MeterKind::Consumption => &self.consumption,
            MeterKind::Production => &self.production,
            MeterKind::FeedIn => &self.feed_in,
            MeterKind::Purchased => &self.purchased,
        }
    }

    /// Household consumption (W).
    pub fn consumption(&self) -> &[f64] {
        &self.consumption
    }

    /// System production (W).
    pub fn production(&self) -> &[f64] {
        &self.production
    }

    /// Grid export (W).
    pub fn feed_in(&self) -> &[f64] {
        &self.feed_in
    }

    /// Grid import (W).
    pub fn purchased(&self) -> &[f64] {
        &self.purchased
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the grid holds no points at all.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// One battery telemetry reading at an irregular timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySample {
    /// Reading timestamp (no offset; kept as the input carries it).
    pub timestamp: NaiveDateTime,
    /// Signed battery power (W); positive = charging, negative =
    /// discharging. Missing readings normalize to 0 at ingestion.
    pub power_w: f64,
    /// Whether the battery was charging from the AC grid rather than from
    /// solar surplus.
    pub grid_charging: bool,
    /// State of charge (percent, 0–100).
    pub soc_pct: f64,
    /// Usable pack capacity at the time of the reading (Wh).
    pub full_pack_wh: f64,
}
