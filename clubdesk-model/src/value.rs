//! Raw document-store values.
//!
//! Documents in the hosted store are schemaless: a document is an opaque
//! identifier plus a map of field names to [`Value`]s. Date-bearing fields
//! arrive in the store's own [`Timestamp`] encoding and must be converted to
//! native dates before anything compares or sorts them.
//!
//! The serde representation mirrors the hosted store's REST encoding
//! (`{"stringValue": "Web"}`, `{"timestampValue": {"seconds": .., "nanos": ..}}`)
//! so that exported collections can be loaded as-is.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of nanoseconds in one second; `nanos` must stay below this.
const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Field name → value map of a single document.
pub type Fields = BTreeMap<String, Value>;

/// Store-assigned document identifier.
///
/// Opaque to the dashboard: it is only ever compared for equality and
/// passed back to the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh identifier (UUID v7, simple form).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The store's native timestamp encoding: seconds since the Unix epoch plus
/// a sub-second nanosecond component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    seconds: i64,
    nanos: u32,
}

impl Timestamp {
    /// Creates a timestamp, returning `None` if `nanos` is not below one second.
    #[must_use]
    pub const fn new(seconds: i64, nanos: u32) -> Option<Self> {
        if nanos >= NANOS_PER_SECOND {
            return None;
        }
        Some(Self { seconds, nanos })
    }

    /// Encodes a native date-time.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        // Leap seconds are reported as nanos >= 1e9; fold them into the last nanosecond.
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos().min(NANOS_PER_SECOND - 1),
        }
    }

    /// Returns the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Decodes into a native date-time.
    ///
    /// Returns `None` when the value is outside chrono's representable range
    /// or carries an out-of-range nanosecond component (possible for
    /// timestamps read from untrusted JSON).
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if self.nanos >= NANOS_PER_SECOND {
            return None;
        }
        DateTime::from_timestamp(self.seconds, self.nanos)
    }

    /// Whole seconds since the Unix epoch.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        self.seconds
    }

    /// Sub-second component in nanoseconds.
    #[must_use]
    pub const fn nanos(self) -> u32 {
        self.nanos
    }

    /// Returns the smallest timestamp strictly after `self`.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.nanos + 1 >= NANOS_PER_SECOND {
            Self {
                seconds: self.seconds.saturating_add(1),
                nanos: 0,
            }
        } else {
            Self {
                seconds: self.seconds,
                nanos: self.nanos + 1,
            }
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

/// A single field value as held by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Explicit null.
    #[serde(rename = "nullValue")]
    Null,
    /// Boolean.
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    /// 64-bit signed integer.
    #[serde(rename = "integerValue")]
    Integer(i64),
    /// Double-precision float.
    #[serde(rename = "doubleValue")]
    Double(f64),
    /// Store-native timestamp.
    #[serde(rename = "timestampValue")]
    Timestamp(Timestamp),
    /// UTF-8 string.
    #[serde(rename = "stringValue")]
    String(String),
    /// Ordered list of values.
    #[serde(rename = "arrayValue")]
    Array(Vec<Value>),
    /// Nested map.
    #[serde(rename = "mapValue")]
    Map(Fields),
    /// Write-only sentinel: the store replaces it with its own clock on write.
    #[serde(rename = "serverTimestamp")]
    ServerTimestamp,
}

impl Value {
    /// Short name of the value's type, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Double(_) => "double",
            Self::Timestamp(_) => "timestamp",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::ServerTimestamp => "server timestamp",
        }
    }

    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Timestamp(Timestamp::from_datetime(dt))
    }
}

/// A document as returned by a store query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier, unique within the collection.
    pub id: DocumentId,
    /// Field values.
    pub fields: Fields,
}

impl Document {
    /// Creates a document from its id and fields.
    #[must_use]
    pub const fn new(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Looks up a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}
