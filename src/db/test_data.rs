//! Database queries for test results.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, TransactionTrait};
use tracing::{debug, info};

use crate::entity::test_data::{self, Entity as TestDataEntity};
use crate::error::{AppError, AppResult};
use crate::models::TestData;

use super::DbPool;

/// Destination for a run's accumulated results.
#[async_trait]
pub trait TestDataSink: Send + Sync {
    /// Persist every record as a new row, all or nothing. Returns the number of rows written.
    async fn save_batch(&self, records: Vec<TestData>) -> AppResult<usize>;
}

impl DbPool {
    /// Insert a batch of results in a single transaction.
    ///
    /// Every record is validated before the transaction opens, so a bad record
    /// writes nothing. An empty batch commits nothing and returns 0.
    pub async fn insert_test_data_batch(&self, records: &[TestData]) -> AppResult<usize> {
        let models = records
            .iter()
            .map(TestData::to_active_model)
            .collect::<AppResult<Vec<_>>>()?;

        if models.is_empty() {
            debug!("No test results to save");
            return Ok(0);
        }

        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let count = models.len();
        for model in models {
            // Dropping `txn` on error rolls the batch back.
            model
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to insert test data: {}", e)))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit test data: {}", e)))?;

        info!("Saved {} test result(s)", count);
        Ok(count)
    }

    /// Get all stored results, oldest first.
    pub async fn list_test_data(&self) -> AppResult<Vec<test_data::Model>> {
        let result = TestDataEntity::find()
            .order_by_asc(test_data::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test data: {}", e)))?;

        Ok(result)
    }
}

#[async_trait]
impl TestDataSink for DbPool {
    async fn save_batch(&self, records: Vec<TestData>) -> AppResult<usize> {
        self.insert_test_data_batch(&records).await
    }
}
