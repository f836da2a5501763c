//! Caller authentication

pub mod details;
pub mod service;

pub use details::{AuthenticationDetails, UserDetails};
pub use service::{AuthService, Claims};
