//! Core domain types used across field type resolution

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU64;

use crate::error::{LogscopeError, Result};

/// Stream identifier, issued by the stream catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(pub String);

impl StreamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StreamId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StreamId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for StreamId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Time window scoping a field type query
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeRangeRepr", into = "TimeRangeRepr")]
pub enum TimeRange {
    #[default]
    AllTime,
    /// Last `range` seconds. Zero is not representable; it means all time.
    Relative { range: NonZeroU64 },
    Absolute { from: DateTime<Utc>, to: DateTime<Utc> },
}

impl TimeRange {
    pub fn all_time() -> Self {
        Self::AllTime
    }

    /// A relative range of zero seconds means all time.
    pub fn relative(range: u64) -> Self {
        NonZeroU64::new(range).map_or(Self::AllTime, |range| Self::Relative { range })
    }

    pub fn absolute(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        if from > to {
            return Err(LogscopeError::Validation(
                ValidationMessage::new(format!(
                    "Absolute time range starts after it ends: {} > {}",
                    from.to_rfc3339(),
                    to.to_rfc3339()
                ))
                .with_error_type("INVALID_TIMERANGE"),
            ));
        }
        Ok(Self::Absolute { from, to })
    }

    pub fn is_all_time(&self) -> bool {
        matches!(self, Self::AllTime)
    }

    /// Concrete bounds of the window relative to `now`; `None` for all time.
    pub fn window(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            Self::AllTime => None,
            Self::Relative { range } => {
                let span = i64::try_from(range.get())
                    .ok()
                    .and_then(Duration::try_seconds)
                    .unwrap_or(Duration::MAX);
                let from = now.checked_sub_signed(span).unwrap_or(DateTime::<Utc>::MIN_UTC);
                Some((from, now))
            }
            Self::Absolute { from, to } => Some((*from, *to)),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllTime => write!(f, "all time"),
            Self::Relative { range } => write!(f, "last {}s", range),
            Self::Absolute { from, to } => write!(f, "{} to {}", from.to_rfc3339(), to.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TimeRangeRepr {
    Relative { range: u64 },
    Absolute { from: DateTime<Utc>, to: DateTime<Utc> },
}

impl TryFrom<TimeRangeRepr> for TimeRange {
    type Error = LogscopeError;

    fn try_from(repr: TimeRangeRepr) -> Result<Self> {
        match repr {
            TimeRangeRepr::Relative { range } => Ok(Self::relative(range)),
            TimeRangeRepr::Absolute { from, to } => Self::absolute(from, to),
        }
    }
}

impl From<TimeRange> for TimeRangeRepr {
    fn from(range: TimeRange) -> Self {
        match range {
            TimeRange::AllTime => Self::Relative { range: 0 },
            TimeRange::Relative { range } => Self::Relative { range: range.get() },
            TimeRange::Absolute { from, to } => Self::Absolute { from, to },
        }
    }
}

pub const PROPERTY_NUMERIC: &str = "numeric";
pub const PROPERTY_ENUMERABLE: &str = "enumerable";
pub const PROPERTY_FULL_TEXT_SEARCH: &str = "full-text-search";
pub const PROPERTY_DECORATED: &str = "decorated";

/// Type descriptor: type name plus semantic property tags
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldType {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub properties: BTreeSet<String>,
}

impl FieldType {
    pub fn new<I, S>(type_name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.properties.contains(property)
    }
}

/// A resolved field: name and type descriptor
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MappedFieldType {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl MappedFieldType {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Request body for field types of an explicit stream set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTypesForStreamsRequest {
    #[serde(default)]
    pub streams: BTreeSet<StreamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timerange: Option<TimeRange>,
}

impl FieldTypesForStreamsRequest {
    pub fn new<I, S>(streams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StreamId>,
    {
        Self {
            streams: streams.into_iter().map(Into::into).collect(),
            timerange: None,
        }
    }

    pub fn with_timerange(mut self, timerange: TimeRange) -> Self {
        self.timerange = Some(timerange);
        self
    }

    /// Requested time range, all time when omitted.
    pub fn timerange(&self) -> TimeRange {
        self.timerange.clone().unwrap_or_default()
    }
}

/// Validation feedback with an optional source position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    pub error_message: String,
}

impl ValidationMessage {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            begin_line: None,
            begin_column: None,
            end_line: None,
            end_column: None,
            error_type: None,
            error_message: error_message.into(),
        }
    }

    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.begin_line = Some(line);
        self.begin_column = Some(column);
        self.end_line = Some(line);
        self.end_column = Some(column);
        self
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.begin_line, self.begin_column) {
            (Some(line), Some(column)) => {
                write!(f, "{} (line {}, column {})", self.error_message, line, column)
            }
            _ => write!(f, "{}", self.error_message),
        }
    }
}
