//! Error types for Logscope services

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::domain::{StreamId, ValidationMessage};

pub type Result<T> = std::result::Result<T, LogscopeError>;

#[derive(Error, Debug)]
pub enum LogscopeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error(transparent)]
    MissingStreamPermission(#[from] MissingStreamPermission),

    #[error("Validation error: {0}")]
    Validation(ValidationMessage),

    #[error("Stream catalog error: {0}")]
    Catalog(String),

    #[error("Field type lookup error: {0}")]
    Lookup(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LogscopeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ValidationMessage::new(message))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Auth(_) => 401,
            Self::MissingStreamPermission(_) => 403,
            Self::Unavailable(_) => 503,
            _ => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Auth(_) => "AUTH_ERROR",
            Self::MissingStreamPermission(_) => "MISSING_STREAM_PERMISSION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Catalog(_) => "CATALOG_ERROR",
            Self::Lookup(_) => "LOOKUP_ERROR",
            Self::Unavailable(_) => "UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<std::io::Error> for LogscopeError {
    fn from(err: std::io::Error) -> Self {
        LogscopeError::Unavailable(err.to_string())
    }
}

/// Denial raised when a caller names streams it may not read.
///
/// Always carries every denied stream, never just the first one found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingStreamPermission {
    streams: BTreeSet<StreamId>,
}

impl MissingStreamPermission {
    /// Returns `None` when nothing was denied.
    pub fn from_denied(streams: BTreeSet<StreamId>) -> Option<Self> {
        if streams.is_empty() {
            None
        } else {
            Some(Self { streams })
        }
    }

    pub fn streams_with_missing_permissions(&self) -> &BTreeSet<StreamId> {
        &self.streams
    }

    pub fn into_streams(self) -> BTreeSet<StreamId> {
        self.streams
    }
}

impl fmt::Display for MissingStreamPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Not authorized to access streams: ")?;
        for (i, stream) in self.streams.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", stream)?;
        }
        Ok(())
    }
}

impl std::error::Error for MissingStreamPermission {}
