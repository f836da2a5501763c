//! Field Types Service
//!
//! Resolves the field types visible across log streams:
//! - All field types the caller may read (catalog-side predicate filtering)
//! - Field types for an explicit stream set (exhaustive authorization with aggregate denial)
//! - JWT caller identity with wildcard stream permissions
//! - REST surface with typed error payloads, health and readiness

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lookup;
pub mod metrics;
pub mod permissions;
pub mod resolver;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests;

pub use auth::{AuthService, AuthenticationDetails, UserDetails};
pub use catalog::{InMemoryStreamCatalog, StreamCatalog, StreamDescriptor};
pub use config::FieldTypesServiceConfig;
pub use error::ApiError;
pub use lookup::{IndexFieldTypes, InMemoryFieldTypeIndex, TypeLookupService};
pub use metrics::ApiMetrics;
pub use permissions::{PermissionOracle, PermissionSet, SearchUser};
pub use resolver::FieldTypeResolver;
pub use service::FieldTypesService;
