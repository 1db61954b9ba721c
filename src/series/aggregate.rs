//! Per-bucket aggregation of irregular samples into a dense grid array.

/// Reduces bucket-assigned samples to one mean per populated bucket,
/// scattered into a dense array shaped like the reference grid.
///
/// Buckets that receive no sample hold exactly `0.0` — never a missing
/// value marker. Accumulation is sum-and-count, so the result is
/// independent of sample order; fragments may interleave arbitrarily after
/// the merge step without changing the output.
///
/// # Arguments
///
/// * `buckets` - Bucket index per sample, each in `[0, grid_len)`
/// * `values` - Sample values, co-indexed with `buckets`
/// * `grid_len` - Length of the reference grid
///
/// # Panics
///
/// Panics if the slices differ in length or any bucket index is out of
/// bounds; both indicate a caller bug, not bad input data.
pub fn mean_by_bucket(buckets: &[usize], values: &[f64], grid_len: usize) -> Vec<f64> {
    assert_eq!(buckets.len(), values.len());

    let mut sums = vec![0.0_f64; grid_len];
    let mut counts = vec![0_usize; grid_len];
    for (&bucket, &value) in buckets.iter().zip(values) {
        assert!(bucket < grid_len, "bucket index out of bounds");
        sums[bucket] += value;
        counts[bucket] += 1;
    }

    sums.iter()
        .zip(&counts)
        .map(|(&sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect()
}
