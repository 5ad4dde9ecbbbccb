//! Property tests for document normalization.
//!
//! 1. A date stored as a store timestamp comes back as the same instant.
//! 2. A date stored as an RFC 3339 string comes back as the same instant.
//! 3. Normalization never panics on arbitrary field values.

use chrono::{DateTime, SecondsFormat, Utc};
use clubdesk::normalize::{FromDocument, normalize, to_date};
use clubdesk_model::{Document, DocumentId, Fields, Task, Timestamp, Value};
use proptest::prelude::*;

/// Years 1900..2200, comfortably inside every representation.
const MIN_SECONDS: i64 = -2_208_988_800;
const MAX_SECONDS: i64 = 7_258_118_400;

fn arb_datetime() -> impl Strategy<Value = DateTime<Utc>> {
    (MIN_SECONDS..MAX_SECONDS, 0u32..1_000_000_000)
        .prop_filter_map("representable", |(s, n)| DateTime::from_timestamp(s, n))
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::ServerTimestamp),
        any::<bool>().prop_map(Value::Boolean),
        any::<i64>().prop_map(Value::Integer),
        any::<f64>().prop_map(Value::Double),
        ".{0,24}".prop_map(Value::String),
        (any::<i64>(), 0u32..1_000_000_000)
            .prop_filter_map("valid", |(s, n)| Timestamp::new(s, n).map(Value::Timestamp)),
    ]
}

proptest! {
    #[test]
    fn timestamp_value_round_trips(dt in arb_datetime()) {
        let value = Value::Timestamp(Timestamp::from_datetime(dt));
        prop_assert_eq!(to_date(&value), Ok(dt));
    }

    #[test]
    fn rfc3339_value_round_trips(dt in arb_datetime()) {
        let value = Value::String(dt.to_rfc3339_opts(SecondsFormat::Nanos, true));
        prop_assert_eq!(to_date(&value), Ok(dt));
    }

    #[test]
    fn normalized_date_matches_stored_instant(dt in arb_datetime()) {
        let mut fields = Fields::new();
        fields.insert("when".to_string(), Value::from(dt));
        let doc = Document::new(DocumentId::from("d"), fields);
        let normalized = normalize(&doc, &["when"]);
        prop_assert!(normalized.is_ok());
        if let Ok(n) = normalized {
            prop_assert_eq!(n.date("when"), Ok(dt));
        }
    }

    #[test]
    fn arbitrary_fields_never_panic(
        title in arb_value(),
        due in arb_value(),
        created in arb_value(),
        priority in arb_value(),
    ) {
        let mut fields = Fields::new();
        fields.insert("title".to_string(), title);
        fields.insert("domain".to_string(), Value::from("Web"));
        fields.insert("priority".to_string(), priority);
        fields.insert("status".to_string(), Value::from("Today"));
        fields.insert("dueDate".to_string(), due);
        fields.insert("createdBy".to_string(), Value::from("alice"));
        fields.insert("createdAt".to_string(), created);
        let _ = Task::from_document(&Document::new(DocumentId::from("x"), fields));
    }
}
