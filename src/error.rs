//! Error taxonomy for the history pipeline.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised while ingesting payloads or reconciling series.
///
/// Every variant is a deterministic function of input shape; there are no
/// transient or retryable conditions in the core. An error aborts the
/// current batch and propagates to the caller.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Two co-indexed series expected to share timestamps do not match.
    #[error("meter \"{meter}\": timestamp sequence diverges from \"{reference}\" within one source unit")]
    Alignment {
        /// Meter whose timestamps diverge.
        meter: &'static str,
        /// Meter that established the fragment's reference timestamps.
        reference: &'static str,
    },

    /// A sample timestamp precedes the start of the reference grid.
    #[error("sample at {sample} precedes the power grid start {grid_start}")]
    OutOfRange {
        /// Timestamp of the offending sample.
        sample: NaiveDateTime,
        /// First timestamp of the reference grid.
        grid_start: NaiveDateTime,
    },

    /// The installation shape is not modeled (only one battery is supported).
    #[error("expected 1 battery, but found {battery_count}")]
    UnsupportedConfiguration {
        /// Battery count reported by the payload.
        battery_count: u64,
    },

    /// A summary was requested over an empty series.
    ///
    /// Distinct from an all-zero result: the caller must not mistake
    /// "nothing was measured" for "zero was measured".
    #[error("no {0} available to summarize")]
    NoData(&'static str),

    /// A source unit declares a meter type outside the fixed set.
    #[error("unknown meter type \"{0}\" in source unit")]
    UnknownMeter(String),

    /// A source unit lists the same meter more than once.
    #[error("meter \"{0}\" appears more than once in source unit")]
    DuplicateMeter(&'static str),

    /// A source unit is missing one of the fixed meters.
    #[error("source unit is missing meter \"{0}\"")]
    MissingMeter(&'static str),

    /// A payload header field does not carry the expected value.
    #[error("unexpected {field} \"{got}\", expected \"{want}\"")]
    UnexpectedUnit {
        /// Payload field name (`timeUnit` or `unit`).
        field: &'static str,
        /// Value found in the payload.
        got: String,
        /// Value required by the processing configuration.
        want: String,
    },

    /// A timestamp string does not match the documented format.
    #[error("timestamp \"{value}\" does not match format \"{format}\"")]
    Timestamp {
        /// Raw timestamp string from the payload.
        value: String,
        /// Format the payload is documented to use.
        format: &'static str,
    },

    /// A payload is structurally malformed.
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A payload is structurally valid JSON but misses required content.
    #[error("incomplete payload: {0}")]
    IncompletePayload(&'static str),
}
