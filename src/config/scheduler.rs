// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::Path;
use std::time::Duration;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::parse_duration;
use crate::pool::DEFAULT_POOL_SIZE;

const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);
const DEFAULT_BACKEND: &str = "mock";

/// A YAML representation of the scheduler configuration.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct SchedulerConfig {
    /// The maximum number of pooled one-shot voices.
    pool_size: Option<usize>,

    /// Keep pooled state when a scope ends.
    persist: Option<bool>,

    /// Seed for the random source. Entropy is used when unset.
    seed: Option<u64>,

    /// How often the driver ticks the scheduler.
    frame_interval: Option<String>,

    /// The playback backend.
    backend: Option<String>,
}

impl SchedulerConfig {
    /// Creates a configuration with the given pool size and defaults for everything else.
    pub fn new(pool_size: usize) -> SchedulerConfig {
        SchedulerConfig {
            pool_size: Some(pool_size),
            ..Default::default()
        }
    }

    pub fn with_persist(mut self, persist: bool) -> SchedulerConfig {
        self.persist = Some(persist);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> SchedulerConfig {
        self.seed = Some(seed);
        self
    }

    pub fn with_frame_interval(mut self, frame_interval: &str) -> SchedulerConfig {
        self.frame_interval = Some(frame_interval.to_string());
        self
    }

    pub fn with_backend(mut self, backend: &str) -> SchedulerConfig {
        self.backend = Some(backend.to_string());
        self
    }

    /// Parses and validates a scheduler configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<SchedulerConfig, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<SchedulerConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that can't be expressed in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == Some(0) {
            return Err(ConfigError::Invalid(
                "pool_size must be at least 1".to_string(),
            ));
        }
        self.frame_interval()?;
        Ok(())
    }

    /// Gets the pool size (default: 30).
    pub fn pool_size(&self) -> usize {
        self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Whether pooled state survives the end of a scope (default: false).
    pub fn persist(&self) -> bool {
        self.persist.unwrap_or(false)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Gets the driver tick interval (default: 16ms).
    pub fn frame_interval(&self) -> Result<Duration, ConfigError> {
        match &self.frame_interval {
            Some(frame_interval) => parse_duration("frame_interval", frame_interval),
            None => Ok(DEFAULT_FRAME_INTERVAL),
        }
    }

    /// Gets the backend name (default: mock).
    pub fn backend(&self) -> &str {
        self.backend.as_deref().unwrap_or(DEFAULT_BACKEND)
    }
}
