//! Stream read permissions
//!
//! Grants are colon-separated parts (`streams:read:4242`). Each part may list
//! several comma-separated values or `*`. A grant with fewer parts than the
//! checked permission implies every deeper part.

use logscope_core::StreamId;
use std::collections::HashSet;

pub const STREAMS_READ: &str = "streams:read";

/// Answers stream-level read-authorization queries for one caller
pub trait PermissionOracle: Send + Sync {
    fn can_read_stream(&self, stream_id: &StreamId) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    grants: HashSet<String>,
}

impl PermissionSet {
    pub fn new<I, S>(grants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            grants: grants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn grants(&self) -> impl Iterator<Item = &str> {
        self.grants.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Check whether any grant implies `permission`
    pub fn is_permitted(&self, permission: &str) -> bool {
        self.grants.iter().any(|grant| implies(grant, permission))
    }
}

fn implies(grant: &str, permission: &str) -> bool {
    let grant_parts: Vec<&str> = grant.split(':').collect();
    let required_parts: Vec<&str> = permission.split(':').collect();

    for (i, required) in required_parts.iter().enumerate() {
        // Shorter grants imply everything below them
        let Some(granted) = grant_parts.get(i) else {
            return true;
        };
        if !part_matches(granted, required) {
            return false;
        }
    }

    // Longer grants only imply the permission if their extra parts are wildcards
    grant_parts[required_parts.len()..].iter().all(|part| is_wildcard(part))
}

fn part_matches(granted: &str, required: &str) -> bool {
    if is_wildcard(granted) {
        return true;
    }
    let granted: HashSet<&str> = granted.split(',').map(str::trim).collect();
    required.split(',').map(str::trim).all(|value| granted.contains(value))
}

fn is_wildcard(part: &str) -> bool {
    part.split(',').any(|value| value.trim() == "*")
}

/// Caller identity used for search and field type queries
#[derive(Debug, Clone)]
pub struct SearchUser {
    username: String,
    permissions: PermissionSet,
}

impl SearchUser {
    pub fn new(username: impl Into<String>, permissions: PermissionSet) -> Self {
        Self {
            username: username.into(),
            permissions,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}

impl PermissionOracle for SearchUser {
    fn can_read_stream(&self, stream_id: &StreamId) -> bool {
        self.permissions
            .is_permitted(&format!("{}:{}", STREAMS_READ, stream_id))
    }
}
