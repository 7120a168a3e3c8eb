//! Payroll Engine for period-based employee pay
//!
//! This crate computes an employee's payroll for an inclusive pay period by
//! aggregating attendance, approved leave, overtime, fixed allowances and
//! statutory contributions read from injected record providers into gross
//! pay, itemised deductions, net pay and an audit trace.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
