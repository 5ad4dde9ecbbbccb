//! Property tests for the store timestamp encoding.
//!
//! 1. Any representable timestamp decodes to a date-time that re-encodes to
//!    the same timestamp.
//! 2. Encoding preserves ordering.
//! 3. Out-of-range nanoseconds never panic on decode.

use chrono::{DateTime, Utc};
use clubdesk_model::Timestamp;
use proptest::prelude::*;

/// Seconds range comfortably inside chrono's representable span.
const MIN_SECONDS: i64 = -50_000_000_000;
const MAX_SECONDS: i64 = 50_000_000_000;

/// Strategy for generating valid `Timestamp` values.
fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    (MIN_SECONDS..MAX_SECONDS, 0u32..1_000_000_000)
        .prop_filter_map("valid timestamp", |(s, n)| Timestamp::new(s, n))
}

/// Strategy for generating `DateTime<Utc>` values.
fn arb_datetime() -> impl Strategy<Value = DateTime<Utc>> {
    (MIN_SECONDS..MAX_SECONDS, 0u32..1_000_000_000)
        .prop_filter_map("representable", |(s, n)| DateTime::from_timestamp(s, n))
}

proptest! {
    #[test]
    fn timestamp_decode_encode_round_trip(ts in arb_timestamp()) {
        let dt = ts.to_datetime();
        prop_assert!(dt.is_some());
        if let Some(dt) = dt {
            prop_assert_eq!(Timestamp::from_datetime(dt), ts);
        }
    }

    #[test]
    fn datetime_encode_decode_round_trip(dt in arb_datetime()) {
        let ts = Timestamp::from_datetime(dt);
        prop_assert_eq!(ts.to_datetime(), Some(dt));
    }

    #[test]
    fn encoding_preserves_order(a in arb_datetime(), b in arb_datetime()) {
        let (ta, tb) = (Timestamp::from_datetime(a), Timestamp::from_datetime(b));
        prop_assert_eq!(a.cmp(&b), ta.cmp(&tb));
    }

    #[test]
    fn next_is_strictly_greater(ts in arb_timestamp()) {
        prop_assert!(ts.next() > ts);
    }

    #[test]
    fn bad_nanos_never_construct(s in any::<i64>(), n in 1_000_000_000u32..) {
        prop_assert!(Timestamp::new(s, n).is_none());
    }
}
