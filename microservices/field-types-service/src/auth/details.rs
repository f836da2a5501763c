//! Authentication details
//!
//! The value object produced once a caller's credentials check out.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::permissions::{PermissionSet, SearchUser};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub username: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationDetails {
    pub user_details: UserDetails,
    #[serde(default)]
    pub session_attributes: HashMap<String, serde_json::Value>,
}

impl AuthenticationDetails {
    pub fn new(user_details: UserDetails) -> Self {
        Self {
            user_details,
            session_attributes: HashMap::new(),
        }
    }

    pub fn with_session_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.session_attributes.insert(key.into(), value);
        self
    }

    pub fn session_attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.session_attributes.get(key)
    }

    /// Build the permission-checking identity for search queries
    pub fn search_user(&self) -> SearchUser {
        SearchUser::new(
            self.user_details.username.clone(),
            PermissionSet::new(self.user_details.permissions.iter().cloned()),
        )
    }
}
