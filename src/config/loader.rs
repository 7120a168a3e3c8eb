//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{CalculationError, CalculationResult};

use super::types::{PayrollConfig, ShiftSchedule, StatutorySchedule};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── schedule.yaml   # Working-day timetable
/// └── statutory.yaml  # SSS, PhilHealth, Pag-IBIG and income tax tables
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Day starts at {}", loader.config().schedule().nominal_start);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Either file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML or an inconsistent table (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> CalculationResult<Self> {
        let path = path.as_ref();

        let schedule = Self::load_yaml::<ShiftSchedule>(&path.join("schedule.yaml"))?;

        let statutory_path = path.join("statutory.yaml");
        let statutory = Self::load_yaml::<StatutorySchedule>(&statutory_path)?;

        let config = PayrollConfig::new(schedule, statutory);
        config
            .validate()
            .map_err(|message| CalculationError::ConfigParseError {
                path: path.display().to_string(),
                message,
            })?;

        debug!(path = %path.display(), "Loaded payroll configuration");
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> CalculationResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| CalculationError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| CalculationError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }
}
