//! Migration: Create test_data table.
//!
//! One row per test case result, written in a single batch when a run finishes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum TestData {
    Table,
    Id,
    DisplayName,
    Passed,
    RunTime,
    Time,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestData::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestData::DisplayName).string_len(500).not_null())
                    .col(ColumnDef::new(TestData::Passed).boolean().not_null())
                    .col(ColumnDef::new(TestData::RunTime).decimal_len(7, 3).not_null())
                    .col(
                        ColumnDef::new(TestData::Time)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup by test name across runs
        manager
            .create_index(
                Index::create()
                    .name("idx_test_data_display_name")
                    .table(TestData::Table)
                    .col(TestData::DisplayName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestData::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
