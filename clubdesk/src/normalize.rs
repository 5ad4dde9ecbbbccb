//! Conversion of raw store documents into typed entities.
//!
//! Date-bearing fields are converted to native `DateTime<Utc>` values up
//! front, before anything else looks at the document; raw timestamp
//! encodings never leave this module. Required fields that are absent or
//! have the wrong shape fail the conversion instead of being defaulted.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use clubdesk_model::{Announcement, Document, DocumentId, Event, Task, Value};

use crate::schema;

/// Why a raw document could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    /// A required field is absent.
    #[error("document {id}: missing required field `{field}`")]
    MissingField {
        /// Offending document.
        id: DocumentId,
        /// Field name.
        field: &'static str,
    },

    /// A date-bearing field holds something that is not a date.
    #[error("document {id}: field `{field}` is not a date ({found})")]
    NotADate {
        /// Offending document.
        id: DocumentId,
        /// Field name.
        field: &'static str,
        /// What was found instead.
        found: String,
    },

    /// A field is present but has the wrong type or an unknown value.
    #[error("document {id}: field `{field}` is invalid: {reason}")]
    InvalidField {
        /// Offending document.
        id: DocumentId,
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Entities that can be built from a document of their collection.
pub trait FromDocument: Sized {
    /// Collection the entity lives in.
    const COLLECTION: &'static str;

    /// Fields that must be present and convertible to dates.
    const DATE_FIELDS: &'static [&'static str];

    /// Converts one raw document.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizationError`] if a required field is missing or
    /// malformed.
    fn from_document(doc: &Document) -> Result<Self, NormalizationError>;
}

/// A document whose date fields have been converted.
///
/// Non-date fields are read straight from the underlying document.
#[derive(Debug)]
pub struct Normalized<'a> {
    doc: &'a Document,
    dates: HashMap<&'static str, DateTime<Utc>>,
}

/// Converts the given date fields of `doc`, leaving the rest untouched.
///
/// # Errors
///
/// Returns [`NormalizationError::MissingField`] if a date field is absent,
/// or [`NormalizationError::NotADate`] if it cannot be converted.
pub fn normalize<'a>(
    doc: &'a Document,
    date_fields: &[&'static str],
) -> Result<Normalized<'a>, NormalizationError> {
    let mut dates = HashMap::with_capacity(date_fields.len());
    for &field in date_fields {
        let value = doc.get(field).ok_or_else(|| NormalizationError::MissingField {
            id: doc.id.clone(),
            field,
        })?;
        let date = to_date(value).map_err(|found| NormalizationError::NotADate {
            id: doc.id.clone(),
            field,
            found,
        })?;
        dates.insert(field, date);
    }
    Ok(Normalized { doc, dates })
}

/// Converts one store value to a native date.
///
/// Accepts a store timestamp, an RFC 3339 string, or a `YYYY-MM-DD` string
/// (taken as midnight UTC). On failure returns a description of what was
/// found.
pub fn to_date(value: &Value) -> Result<DateTime<Utc>, String> {
    match value {
        Value::Timestamp(ts) => ts
            .to_datetime()
            .ok_or_else(|| "out-of-range timestamp".to_string()),
        Value::String(s) => parse_date_string(s).ok_or_else(|| format!("string {s:?}")),
        other => Err(other.type_name().to_string()),
    }
}

fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl Normalized<'_> {
    /// Identifier of the underlying document.
    #[must_use]
    pub const fn id(&self) -> &DocumentId {
        &self.doc.id
    }

    /// A converted date field.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizationError::MissingField`] if `field` was not among
    /// the date fields passed to [`normalize`].
    pub fn date(&self, field: &'static str) -> Result<DateTime<Utc>, NormalizationError> {
        self.dates
            .get(field)
            .copied()
            .ok_or_else(|| self.missing(field))
    }

    /// A string field that must be present.
    ///
    /// # Errors
    ///
    /// Missing or null → `MissingField`; any non-string → `InvalidField`.
    pub fn required_text(&self, field: &'static str) -> Result<String, NormalizationError> {
        self.optional(field)?.ok_or_else(|| self.missing(field))
    }

    /// A string field that defaults to empty when absent or null.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if the field holds a non-string.
    pub fn optional_text(&self, field: &'static str) -> Result<String, NormalizationError> {
        Ok(self.optional(field)?.unwrap_or_default())
    }

    /// A string field that may be absent or null.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if the field holds a non-string.
    pub fn optional(&self, field: &'static str) -> Result<Option<String>, NormalizationError> {
        match self.doc.get(field) {
            None => Ok(None),
            Some(v) if v.is_null() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(field, format!("expected string, found {}", other.type_name()))),
        }
    }

    /// A required string field parsed into `T`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` or `InvalidField` as for
    /// [`required_text`](Self::required_text), or `InvalidField` if parsing fails.
    pub fn parsed<T>(&self, field: &'static str) -> Result<T, NormalizationError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let text = self.required_text(field)?;
        text.parse().map_err(|e: T::Err| self.invalid(field, e.to_string()))
    }

    fn missing(&self, field: &'static str) -> NormalizationError {
        NormalizationError::MissingField {
            id: self.doc.id.clone(),
            field,
        }
    }

    fn invalid(&self, field: &'static str, reason: String) -> NormalizationError {
        NormalizationError::InvalidField {
            id: self.doc.id.clone(),
            field,
            reason,
        }
    }
}

impl FromDocument for Task {
    const COLLECTION: &'static str = schema::TASKS;
    const DATE_FIELDS: &'static [&'static str] = &[schema::DUE_DATE, schema::CREATED_AT];

    fn from_document(doc: &Document) -> Result<Self, NormalizationError> {
        let n = normalize(doc, Self::DATE_FIELDS)?;
        Ok(Self {
            id: n.id().clone(),
            title: n.required_text(schema::TITLE)?,
            description: n.optional_text(schema::DESCRIPTION)?,
            domain: n.required_text(schema::DOMAIN)?,
            priority: n.parsed(schema::PRIORITY)?,
            status: n.parsed(schema::STATUS)?,
            due_date: n.date(schema::DUE_DATE)?,
            created_by: n.required_text(schema::CREATED_BY)?,
            assigned_to: n.optional(schema::ASSIGNED_TO)?,
            created_at: n.date(schema::CREATED_AT)?,
        })
    }
}

impl FromDocument for Event {
    const COLLECTION: &'static str = schema::EVENTS;
    const DATE_FIELDS: &'static [&'static str] = &[schema::DATE, schema::CREATED_AT];

    fn from_document(doc: &Document) -> Result<Self, NormalizationError> {
        let n = normalize(doc, Self::DATE_FIELDS)?;
        Ok(Self {
            id: n.id().clone(),
            title: n.required_text(schema::TITLE)?,
            date: n.date(schema::DATE)?,
            time: n.optional_text(schema::TIME)?,
            location: n.optional_text(schema::LOCATION)?,
            description: n.optional_text(schema::DESCRIPTION)?,
            created_at: n.date(schema::CREATED_AT)?,
        })
    }
}

impl FromDocument for Announcement {
    const COLLECTION: &'static str = schema::ANNOUNCEMENTS;
    const DATE_FIELDS: &'static [&'static str] = &[schema::CREATED_AT];

    fn from_document(doc: &Document) -> Result<Self, NormalizationError> {
        let n = normalize(doc, Self::DATE_FIELDS)?;
        Ok(Self {
            id: n.id().clone(),
            title: n.required_text(schema::TITLE)?,
            content: n.required_text(schema::CONTENT)?,
            priority: n.parsed(schema::PRIORITY)?,
            created_by: n.required_text(schema::CREATED_BY)?,
            created_at: n.date(schema::CREATED_AT)?,
        })
    }
}
