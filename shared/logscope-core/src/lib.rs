//! Logscope Core - Shared domain types and service infrastructure
//!
//! This crate provides:
//! - Field type domain types (StreamId, TimeRange, MappedFieldType, etc.)
//! - The error taxonomy shared by every collaborator
//! - Standard service trait and runtime bootstrap
//! - Configuration management

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use domain::*;
pub use error::{LogscopeError, MissingStreamPermission, Result};
pub use service::{DependencyStatus, HealthStatus, LogscopeService, MicroserviceRuntime, ReadinessStatus};
