//! Tenant scoping for analytics delivery.
//!
//! A [`TenantContext`] is resolved once, when a handler is built, and is then
//! shared read-only by every stream that handler serves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The organization and environment that records are delivered to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TenantContext {
    organization: String,
    environment: String,
}

impl TenantContext {
    pub fn new(organization: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            environment: environment.into(),
        }
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }
}

impl fmt::Display for TenantContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.environment)
    }
}

/// Configuration for the `tenant` table.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    /// The organization records are delivered to.
    pub organization: String,

    /// The environment within the organization.
    pub environment: String,
}

impl TenantConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.organization.trim().is_empty() {
            errors.push("tenant.organization must not be empty".to_owned());
        }
        if self.environment.trim().is_empty() {
            errors.push("tenant.environment must not be empty".to_owned());
        }
        errors
    }

    pub fn build(&self) -> TenantContext {
        TenantContext::new(&self.organization, &self.environment)
    }
}
