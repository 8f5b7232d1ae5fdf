//! Per-valve configuration.
//!
//! # TOML Example
//!
//! ```toml
//! [log]
//! level = "debug"
//!
//! [valve]
//! name = "Valve1"
//! serial = "SN-0001"
//! kind = "double_throw"
//! motion_timeout_ms = 5000
//!
//! [valve.points]
//! "OPENED?" = "rack1/slot3/di0"
//! ```
//!
//! An attribute without an entry in `[valve.points]` binds to the path
//! `<name><attribute>`, e.g. `Valve1OPENED?`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use valve_common::clock::Clock;
use valve_common::config::{ConfigError, ConfigLoader, LogConfig};
use valve_common::consts::DEFAULT_MOTION_TIMEOUT_US;
use valve_common::io::ProcessImage;

use crate::device::{Device, DeviceError, PointBinding};
use crate::valve::{Valve, ValveType};

fn default_motion_timeout_ms() -> u64 {
    DEFAULT_MOTION_TIMEOUT_US / 1_000
}

/// One valve: identity, hardware family, timeout and point paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValveConfig {
    pub name: String,
    #[serde(default)]
    pub serial: String,
    pub kind: ValveType,
    /// Motion and interlock wait timeout [ms].
    #[serde(default = "default_motion_timeout_ms")]
    pub motion_timeout_ms: u64,
    /// Attribute → process-image path overrides.
    #[serde(default)]
    pub points: BTreeMap<String, String>,
}

impl ValveConfig {
    /// Parse a bare `ValveConfig` (no `[valve]` header) and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg = Self::from_toml_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Semantic checks beyond what serde enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "valve name must not be empty".to_string(),
            ));
        }
        if self.motion_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(format!(
                "valve '{}': motion_timeout_ms must be > 0",
                self.name
            )));
        }
        let inputs = self.kind.required_inputs();
        let outputs = self.kind.required_outputs();
        if let Some(unknown) = self
            .points
            .keys()
            .find(|a| !inputs.contains(&a.as_str()) && !outputs.contains(&a.as_str()))
        {
            return Err(ConfigError::ValidationError(format!(
                "valve '{}': unknown point '{unknown}' for {} valve",
                self.name, self.kind
            )));
        }
        Ok(())
    }

    /// Configured timeout as a `Duration`.
    pub fn motion_timeout(&self) -> Duration {
        Duration::from_millis(self.motion_timeout_ms)
    }

    /// Process-image path for `attribute`.
    pub fn point_path(&self, attribute: &str) -> String {
        self.points
            .get(attribute)
            .cloned()
            .unwrap_or_else(|| format!("{}{attribute}", self.name))
    }

    /// Point table for the attributes the configured kind requires.
    pub fn bindings(&self) -> Vec<PointBinding> {
        let inputs = self
            .kind
            .required_inputs()
            .iter()
            .map(|a| PointBinding::input(*a, self.point_path(a)));
        let outputs = self
            .kind
            .required_outputs()
            .iter()
            .map(|a| PointBinding::output(*a, self.point_path(a)));
        inputs.chain(outputs).collect()
    }
}

/// Layout of a valve configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValveFileConfig {
    #[serde(default)]
    pub log: LogConfig,
    pub valve: ValveConfig,
}

/// Load and validate a valve configuration file.
pub fn load_valve_config(path: &Path) -> Result<ValveFileConfig, ConfigError> {
    let file = ValveFileConfig::load(path)?;
    file.valve.validate()?;
    Ok(file)
}

impl Valve {
    /// Bind the points of `config` in `image` and build the valve.
    ///
    /// # Errors
    /// `DeviceError` if a required point cannot be resolved.
    pub fn from_config(
        config: &ValveConfig,
        image: &ProcessImage,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DeviceError> {
        let device = Device::from_image(&config.name, &config.serial, image, &config.bindings());
        let valve = Valve::new(device, config.kind, clock)?.with_motion_timeout(config.motion_timeout());
        info!(
            device = %config.name,
            kind = %config.kind,
            timeout_ms = config.motion_timeout_ms,
            "valve configured"
        );
        Ok(valve)
    }
}
