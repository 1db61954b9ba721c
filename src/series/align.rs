//! Mapping of irregular sample timestamps onto the regular power grid.

use chrono::NaiveDateTime;

use crate::error::HistoryError;

/// Assigns every sample timestamp to a power-grid bucket.
///
/// Bucket index `i` for sample `t` satisfies `grid[i] <= t < grid[i + 1]`,
/// with the last interval open-ended: each sample belongs to the most
/// recent grid point not after it. This is step-function (previous-value)
/// lookup, never linear interpolation — a sample is attributed to exactly
/// one power-meter interval.
///
/// # Arguments
///
/// * `grid` - Strictly increasing reference timestamps
/// * `samples` - Irregular sample timestamps, in any order
///
/// # Errors
///
/// * [`HistoryError::OutOfRange`] if any sample precedes `grid[0]`;
///   clamping it into the first bucket would corrupt that bucket's
///   aggregate.
/// * [`HistoryError::NoData`] if `samples` is non-empty but `grid` is
///   empty.
pub fn align_to_grid(
    grid: &[NaiveDateTime],
    samples: &[NaiveDateTime],
) -> Result<Vec<usize>, HistoryError> {
    if grid.is_empty() {
        if samples.is_empty() {
            return Ok(Vec::new());
        }
        return Err(HistoryError::NoData("power grid"));
    }

    let mut buckets = Vec::with_capacity(samples.len());
    for &t in samples {
        let n_before = grid.partition_point(|&g| g <= t);
        if n_before == 0 {
            return Err(HistoryError::OutOfRange {
                sample: t,
                grid_start: grid[0],
            });
        }
        buckets.push(n_before - 1);
    }
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn quarter_grid() -> Vec<NaiveDateTime> {
        vec![ts(0, 0, 0), ts(0, 15, 0), ts(0, 30, 0)]
    }

    #[test]
    fn sample_on_grid_point_maps_to_that_bucket() {
        let buckets = align_to_grid(&quarter_grid(), &[ts(0, 15, 0)]);
        assert_eq!(buckets.ok(), Some(vec![1]));
    }

    #[test]
    fn sample_just_before_grid_point_maps_to_previous_bucket() {
        let buckets = align_to_grid(&quarter_grid(), &[ts(0, 14, 59)]);
        assert_eq!(buckets.ok(), Some(vec![0]));
    }

    #[test]
    fn sample_past_last_grid_point_maps_to_last_bucket() {
        // grid[N] is treated as +infinity
        let buckets = align_to_grid(&quarter_grid(), &[ts(7, 0, 0)]);
        assert_eq!(buckets.ok(), Some(vec![2]));
    }

    #[test]
    fn sample_before_grid_start_is_out_of_range() {
        let grid = quarter_grid();
        let result = align_to_grid(&grid, &[ts(0, 5, 0), ts(0, 0, 0)]);
        assert!(result.is_ok(), "grid start itself is in range");

        let yesterday = NaiveDate::from_ymd_opt(2022, 3, 4)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let result = align_to_grid(&grid, &[yesterday]);
        assert!(matches!(result, Err(HistoryError::OutOfRange { .. })));
    }

    #[test]
    fn empty_samples_align_trivially() {
        let buckets = align_to_grid(&quarter_grid(), &[]);
        assert_eq!(buckets.ok(), Some(Vec::new()));
    }

    #[test]
    fn empty_grid_with_samples_is_no_data() {
        let result = align_to_grid(&[], &[ts(0, 1, 0)]);
        assert!(matches!(result, Err(HistoryError::NoData(_))));
    }

    #[test]
    fn empty_grid_without_samples_is_fine() {
        let buckets = align_to_grid(&[], &[]);
        assert_eq!(buckets.ok(), Some(Vec::new()));
    }

    #[test]
    fn unsorted_samples_align_independently() {
        let buckets = align_to_grid(&quarter_grid(), &[ts(0, 31, 0), ts(0, 2, 0), ts(0, 16, 0)]);
        assert_eq!(buckets.ok(), Some(vec![2, 0, 1]));
    }
}
