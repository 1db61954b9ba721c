//! Shared test fixtures for integration tests.

/// One power-grid entry: a payload timestamp plus the four meter readings
/// in canonical order (consumption, production, feed_in, purchased).
pub type PowerEntry<'a> = (&'a str, [f64; 4]);

/// One telemetry entry: payload timestamp, power (None renders as JSON
/// null), AC-grid-charging flag, state of charge (percent), and usable
/// pack capacity (Wh).
pub type TelemetryEntry<'a> = (&'a str, Option<f64>, bool, f64, f64);

/// Renders a complete `powerDetails` source unit with all four meters
/// sharing the given timestamps.
pub fn power_details_json(entries: &[PowerEntry<'_>]) -> String {
    let meter = |kind: &str, index: usize| {
        let values: Vec<String> = entries
            .iter()
            .map(|(date, readings)| {
                format!(r#"{{"date": "{date}", "value": {}}}"#, readings[index])
            })
            .collect();
        format!(
            r#"{{"type": "{kind}", "values": [{}]}}"#,
            values.join(", ")
        )
    };
    let meters = [
        meter("Consumption", 0),
        meter("Production", 1),
        meter("FeedIn", 2),
        meter("Purchased", 3),
    ]
    .join(", ");
    format!(
        r#"{{"powerDetails": {{"timeUnit": "QUARTER_OF_AN_HOUR", "unit": "W", "meters": [{meters}]}}}}"#
    )
}

/// Renders a single-battery `storageData` source unit.
pub fn storage_json(entries: &[TelemetryEntry<'_>]) -> String {
    let telemetries: Vec<String> = entries
        .iter()
        .map(|(stamp, power, grid_charging, soc, full_pack)| {
            let power = match power {
                Some(p) => p.to_string(),
                None => "null".to_string(),
            };
            format!(
                r#"{{"timeStamp": "{stamp}", "power": {power},
                    "ACGridCharging": {}, "batteryPercentageState": {soc},
                    "fullPackEnergyAvailable": {full_pack}}}"#,
                u8::from(*grid_charging)
            )
        })
        .collect();
    format!(
        r#"{{"storageData": {{"batteryCount": 1,
            "batteries": [{{"telemetries": [{}]}}]}}}}"#,
        telemetries.join(", ")
    )
}

/// A morning's worth of quarter-hour power data split across two source
/// units that arrive out of order, mimicking monthly cache files.
pub fn default_power_payloads() -> Vec<String> {
    let late = power_details_json(&[
        ("2022-03-05 08:30:00", [410.0, 1600.0, 950.0, 0.0]),
        ("2022-03-05 08:45:00", [430.0, 1700.0, 1000.0, 0.0]),
    ]);
    let early = power_details_json(&[
        ("2022-03-05 08:00:00", [400.0, 1500.0, 900.0, 0.0]),
        ("2022-03-05 08:15:00", [420.0, 1450.0, 800.0, 0.0]),
    ]);
    vec![late, early]
}

/// Battery telemetry spanning the default power payloads: two charging
/// samples in the first bucket, one discharge in the second.
pub fn default_storage_payload() -> String {
    storage_json(&[
        ("2022-03-05 08:02:00", Some(50.0), false, 60.0, 9700.0),
        ("2022-03-05 08:06:00", Some(70.0), true, 61.0, 9700.0),
        ("2022-03-05 08:18:00", Some(-30.0), false, 60.5, 9700.0),
    ])
}
