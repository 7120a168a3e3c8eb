//! Parallel payroll runs.
//!
//! Each request is calculated on its own tokio blocking worker with provider
//! handles built for that worker alone. Workers share only the read-only
//! configuration.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PayrollConfig;
use crate::error::{CalculationError, CalculationResult};
use crate::models::PayrollResult;
use crate::providers::{RecordSources, RecordStore};

use super::assembler::PayrollCalculator;

/// One employee and period to calculate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The employee to calculate.
    pub employee_id: i64,
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
}

/// Calculates many payrolls in parallel.
///
/// `factory` is called once per request, on the worker, to open that
/// worker's provider handles. Results come back in request order, one per
/// request; a failed calculation does not affect the others.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use payroll_engine::calculation::{calculate_batch, BatchRequest};
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::providers::InMemoryRecords;
/// use chrono::NaiveDate;
///
/// # tokio_test();
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn tokio_test() {
/// let requests = vec![BatchRequest {
///     employee_id: 7,
///     period_start: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     period_end: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
/// }];
///
/// let results = calculate_batch(
///     InMemoryRecords::new,
///     Arc::new(PayrollConfig::default()),
///     requests,
/// )
/// .await;
///
/// assert_eq!(results.len(), 1);
/// assert!(results[0].is_err()); // no such employee
/// # }
/// ```
pub async fn calculate_batch<S, F>(
    factory: F,
    config: Arc<PayrollConfig>,
    requests: Vec<BatchRequest>,
) -> Vec<CalculationResult<PayrollResult>>
where
    S: RecordStore + 'static,
    F: Fn() -> S + Send + Sync + 'static,
{
    let factory = Arc::new(factory);
    let total = requests.len();

    let workers: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let factory = Arc::clone(&factory);
            let config = Arc::clone(&config);
            let handle = tokio::task::spawn_blocking(move || {
                let store = factory();
                PayrollCalculator::new(RecordSources::from_store(&store), &config)
                    .calculate_payroll(
                        request.employee_id,
                        request.period_start,
                        request.period_end,
                    )
            });
            (request.employee_id, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(total);
    for (employee_id, handle) in workers {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_error) => {
                warn!(employee_id, error = %join_error, "Payroll worker failed");
                Err(CalculationError::WorkerFailed {
                    employee_id,
                    message: join_error.to_string(),
                })
            }
        };
        results.push(result);
    }

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(total, failed, "Payroll batch finished");
    results
}
