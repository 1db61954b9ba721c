//! Output rendering for reconciled history datasets.

/// CSV export of the gridded dataset.
pub mod export;
