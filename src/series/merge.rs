//! Merging of source fragments into sorted, deduplicated series.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::ingest::PowerFragment;

use super::{BatterySample, MeterSet};

/// Merges power-details fragments into one meter set on a shared grid.
///
/// All fragments are concatenated, then one stable sort permutation by
/// timestamp is computed and applied to the timestamp list and to every
/// meter's value list. Entries whose timestamp equals an earlier entry's
/// are dropped (the first occurrence wins), using a single keep-mask so
/// every meter stays index-aligned with the grid.
///
/// Cross-meter timestamp agreement inside each fragment was already
/// enforced when the fragment was parsed, so merging itself cannot fail.
pub fn merge_power_fragments(fragments: Vec<PowerFragment>) -> MeterSet {
    let total: usize = fragments.iter().map(|f| f.timestamps.len()).sum();
    let mut timestamps = Vec::with_capacity(total);
    let mut consumption = Vec::with_capacity(total);
    let mut production = Vec::with_capacity(total);
    let mut feed_in = Vec::with_capacity(total);
    let mut purchased = Vec::with_capacity(total);

    for fragment in fragments {
        timestamps.extend(fragment.timestamps);
        consumption.extend(fragment.consumption);
        production.extend(fragment.production);
        feed_in.extend(fragment.feed_in);
        purchased.extend(fragment.purchased);
    }

    let order = argsort(&timestamps);
    let timestamps = permute(&timestamps, &order);
    let consumption = permute(&consumption, &order);
    let production = permute(&production, &order);
    let feed_in = permute(&feed_in, &order);
    let purchased = permute(&purchased, &order);

    let keep = first_occurrence_mask(&timestamps);
    let dropped = keep.iter().filter(|&&k| !k).count();
    if dropped > 0 {
        debug!(dropped, "dropped duplicate power grid timestamps");
    }

    MeterSet::from_parts(
        filter_by_mask(timestamps, &keep),
        filter_by_mask(consumption, &keep),
        filter_by_mask(production, &keep),
        filter_by_mask(feed_in, &keep),
        filter_by_mask(purchased, &keep),
    )
}

/// Merges battery telemetry fragments into one sorted sample series.
///
/// Stable sort by timestamp, then first-occurrence-wins deduplication, the
/// same policy the power grid uses.
pub fn merge_battery_fragments(fragments: Vec<Vec<BatterySample>>) -> Vec<BatterySample> {
    let mut samples: Vec<BatterySample> = fragments.into_iter().flatten().collect();
    samples.sort_by_key(|s| s.timestamp);

    let before = samples.len();
    samples.dedup_by_key(|s| s.timestamp);
    if samples.len() < before {
        debug!(
            dropped = before - samples.len(),
            "dropped duplicate battery telemetry timestamps"
        );
    }
    samples
}

/// Indices that sort `timestamps` ascending, preserving input order for
/// equal keys.
fn argsort(timestamps: &[NaiveDateTime]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..timestamps.len()).collect();
    order.sort_by_key(|&i| timestamps[i]);
    order
}

/// Applies one sort permutation to a co-indexed value list.
fn permute<T: Copy>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| values[i]).collect()
}

/// Keep-mask over a sorted timestamp list: true for the first entry of
/// every run of equal timestamps.
fn first_occurrence_mask(sorted: &[NaiveDateTime]) -> Vec<bool> {
    sorted
        .iter()
        .enumerate()
        .map(|(i, &t)| i == 0 || t != sorted[i - 1])
        .collect()
}

fn filter_by_mask<T>(values: Vec<T>, keep: &[bool]) -> Vec<T> {
    values
        .into_iter()
        .zip(keep)
        .filter_map(|(v, &k)| k.then_some(v))
        .collect()
}
