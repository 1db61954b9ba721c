//! CSV export for the gridded history dataset.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::history::EnergyHistory;
use crate::ingest::API_TIME_FORMAT;

/// Column header for the gridded-dataset CSV export.
const HEADER: &str = "timestamp,consumption_w,production_w,feed_in_w,purchased_w,\
                      battery_power_w,charge_rate_w,battery_production_w,\
                      solar_production_w,is_charging";

/// Exports the gridded dataset to a CSV file at the given path.
///
/// Writes a header row followed by one row per power-grid point: the four
/// meters, the aligned battery power, and its decomposed views. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(history: &EnergyHistory, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(history, buf)
}

/// Writes the gridded dataset as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(history: &EnergyHistory, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    let meters = history.meters();
    let battery_power = history.battery_power();
    let charge_rate = history.charge_rate();
    let battery_production = history.battery_production();
    let solar_production = history.solar_production();
    let is_charging = history.is_charging();

    // Data rows
    for (i, timestamp) in history.timestamps().iter().enumerate() {
        wtr.write_record(&[
            timestamp.format(API_TIME_FORMAT).to_string(),
            format!("{:.3}", meters.consumption()[i]),
            format!("{:.3}", meters.production()[i]),
            format!("{:.3}", meters.feed_in()[i]),
            format!("{:.3}", meters.purchased()[i]),
            format!("{:.3}", battery_power[i]),
            format!("{:.3}", charge_rate[i]),
            format!("{:.3}", battery_production[i]),
            format!("{:.3}", solar_production[i]),
            is_charging[i].to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
