//! The adapter's TOML configuration.

use serde::{Deserialize, Serialize};

use crate::{analytics::DeliveryConfig, sources::envoy_als::GrpcConfig, tenant::TenantConfig};

mod loading;
mod vars;

pub use loading::{load_from_path, load_from_str};
pub use vars::{interpolate, Interpolated};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub grpc: GrpcConfig,

    pub tenant: TenantConfig,

    #[serde(default)]
    pub delivery: DeliveryConfig,
}

impl Config {
    /// Checks the values serde cannot, returning every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .tenant
            .validate()
            .into_iter()
            .chain(self.delivery.validate())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
