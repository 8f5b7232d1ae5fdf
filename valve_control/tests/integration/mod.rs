mod config_driven;
mod cycle_driver;
mod double_throw;
mod single_throw;

use std::sync::Arc;

use valve_common::clock::ManualClock;
use valve_common::io::ProcessImage;
use valve_control::config::ValveConfig;
use valve_control::{Valve, ValveType};

/// A valve, the image its points live in, and the clock it reads.
pub struct Plant {
    pub image: ProcessImage,
    pub clock: Arc<ManualClock>,
}

impl Plant {
    pub fn new() -> Self {
        Self {
            image: ProcessImage::new(),
            clock: Arc::new(ManualClock::new(0)),
        }
    }

    /// Valve named `name` with default point paths and timeout.
    pub fn valve(&self, name: &str, kind: ValveType) -> Valve {
        let cfg = ValveConfig {
            name: name.to_string(),
            serial: String::new(),
            kind,
            motion_timeout_ms: 5_000,
            points: Default::default(),
        };
        Valve::from_config(&cfg, &self.image, self.clock.clone()).unwrap()
    }

    pub fn set(&self, path: &str, value: bool) {
        self.image.write(path, value);
    }

    pub fn get(&self, path: &str) -> bool {
        self.image.read(path).unwrap_or(false)
    }
}
