//! Configuration loading and management for the payroll engine.
//!
//! This module provides the working-day timetable and the statutory tables,
//! either built in via [`PayrollConfig::default`] or loaded from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap().into_config();
//! println!("SSS maximum: {}", config.statutory().sss.maximum);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    IncomeTaxSchedule, PagIbigSchedule, PayrollConfig, PhilHealthSchedule, ShiftSchedule,
    SssBand, SssSchedule, StatutorySchedule, TaxBracket,
};
