//! Reconstruction of absolute millisecond timestamps from Envoy's start time
//! and relative durations.

use prost_types::{Duration, Timestamp};

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MILLI: i128 = 1_000_000;

/// Milliseconds since the Unix epoch for `ts`, or `0` when it is absent.
pub fn timestamp_millis(ts: Option<&Timestamp>) -> i64 {
    timestamp_add_duration_millis(ts, None)
}

/// Milliseconds since the Unix epoch for `ts + dur`.
///
/// An absent timestamp yields `0` whatever the duration, and an absent
/// duration is a zero offset. Sub-millisecond precision is truncated toward
/// zero and results outside the `i64` range saturate.
pub fn timestamp_add_duration_millis(ts: Option<&Timestamp>, dur: Option<&Duration>) -> i64 {
    let Some(ts) = ts else {
        return 0;
    };
    let ts_nanos = total_nanos(ts.seconds, ts.nanos);
    let dur_nanos = dur.map_or(0, |dur| total_nanos(dur.seconds, dur.nanos));
    let millis = (ts_nanos + dur_nanos) / NANOS_PER_MILLI;

    i64::try_from(millis).unwrap_or(if millis < 0 { i64::MIN } else { i64::MAX })
}

fn total_nanos(seconds: i64, nanos: i32) -> i128 {
    i128::from(seconds) * NANOS_PER_SECOND + i128::from(nanos)
}
