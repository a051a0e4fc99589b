//! Codec configuration
//!
//! Lets a service declare which controller profile it talks to when the
//! Identity Object has not been read (or cannot be read). The loaded profile is
//! only ever handed back as a [`DeviceContext`] value; nothing here is kept as
//! process-wide state.
//!
//! Priority (highest to lowest):
//! 1. Environment variables (`CIP_` prefix, `__` separates nested keys,
//!    e.g. `CIP_DEFAULT_DEVICE__VENDOR_ID=47`)
//! 2. YAML config file
//! 3. Default values (the compatibility device)

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::device::DeviceContext;
use crate::error::{CipError, Result};

/// Environment variable prefix for codec configuration
pub const ENV_PREFIX: &str = "CIP_";

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Device profile used until a controller identity is known
    pub default_device: DeviceContext,
}

impl CodecConfig {
    /// Extract configuration from a prepared figment
    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|e| CipError::config(format!("Failed to load configuration: {}", e)))
    }

    /// Load configuration: defaults, then the optional YAML file, then environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(CodecConfig::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(CipError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading CIP codec config from {}", path.display());
            figment = figment.merge(Yaml::file(path));
        }

        let config = Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))?;
        debug!("CIP default device: {}", config.default_device);
        Ok(config)
    }

    /// The configured default device context, to be passed explicitly to the codec
    pub fn default_context(&self) -> DeviceContext {
        self.default_device.clone()
    }
}
