//! Per-test-case result record accumulated during a run.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::prelude::Decimal;
use sea_orm::{NotSet, Set};

use crate::entity::test_data::ActiveModel;
use crate::error::{AppError, AppResult};

/// Maximum display name length accepted by the `test_data` table.
pub const MAX_DISPLAY_NAME_LEN: usize = 500;

/// Fractional digits kept for run times (seconds), matching `DECIMAL(7, 3)`.
pub const RUN_TIME_SCALE: u32 = 3;

/// Total digits of the run time column.
pub const RUN_TIME_PRECISION: u32 = 7;

/// Result of one test case.
#[derive(Debug, Clone, PartialEq)]
pub struct TestData {
    /// Fully qualified name of the test (assembly.method)
    pub display_name: String,
    /// True if the test passed
    pub passed: bool,
    /// In seconds
    pub run_time: Decimal,
    /// Time that the test completed
    pub time: Option<DateTime<Utc>>,
}

impl TestData {
    /// A freshly started test case: not passed, no run time, not completed.
    pub fn new(display_name: impl Into<String>) -> Self {
        TestData {
            display_name: display_name.into(),
            passed: false,
            run_time: Decimal::ZERO,
            time: None,
        }
    }

    /// Record completion of the test with its execution time.
    pub fn finish(&mut self, execution_time: Duration, completed_at: DateTime<Utc>) {
        self.run_time = run_time_seconds(execution_time);
        self.time = Some(completed_at);
    }

    /// Convert into a row for insertion, enforcing the table's constraints.
    pub fn to_active_model(&self) -> AppResult<ActiveModel> {
        if self.display_name.is_empty() {
            return Err(AppError::InvalidRecord(
                "display name must not be empty".to_string(),
            ));
        }

        let name_len = self.display_name.chars().count();
        if name_len > MAX_DISPLAY_NAME_LEN {
            return Err(AppError::InvalidRecord(format!(
                "display name of {} characters exceeds {}",
                name_len, MAX_DISPLAY_NAME_LEN
            )));
        }

        if self.run_time.is_sign_negative() || self.run_time >= max_run_time_exclusive() {
            return Err(AppError::InvalidRecord(format!(
                "run time {}s of '{}' does not fit DECIMAL({}, {})",
                self.run_time, self.display_name, RUN_TIME_PRECISION, RUN_TIME_SCALE
            )));
        }

        let time = self.time.ok_or_else(|| {
            AppError::InvalidRecord(format!(
                "'{}' has no completion time (finish message never received)",
                self.display_name
            ))
        })?;

        Ok(ActiveModel {
            id: NotSet,
            display_name: Set(self.display_name.clone()),
            passed: Set(self.passed),
            run_time: Set(self.run_time),
            time: Set(time),
        })
    }
}

/// Execution time as decimal seconds, rounded half up to millisecond scale.
pub fn run_time_seconds(execution_time: Duration) -> Decimal {
    let millis = (execution_time.as_nanos() + NANOS_PER_MILLI / 2) / NANOS_PER_MILLI;
    Decimal::new(i64::try_from(millis).unwrap_or(i64::MAX), RUN_TIME_SCALE)
}

const NANOS_PER_MILLI: u128 = 1_000_000;

/// Smallest value that no longer fits the run time column (10^(precision - scale)).
fn max_run_time_exclusive() -> Decimal {
    Decimal::from(10i64.pow(RUN_TIME_PRECISION - RUN_TIME_SCALE))
}
