//! End-to-end runs: messages in, rows out.

use std::time::Duration;

use chrono::Utc;
use sea_orm::prelude::Decimal;
use testrun_visitors::models::{TestCase, TestMessage};
use testrun_visitors::visitor::RunSummary;

use super::test_helpers::*;

#[tokio::test]
async fn test_passing_case_persists_one_row() {
    let harness = create_harness().await;
    let tc = TestCase::new("A.Foo");
    let before = Utc::now();

    let mut messages = vec![TestMessage::assembly_starting(ASSEMBLY)];
    messages.extend(case_messages(&tc, Duration::from_millis(125), true));
    messages.push(assembly_finished(1, 0));
    harness.deliver(messages).await.unwrap();

    let rows = harness.pool.list_test_data().await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.display_name, "A.Foo");
    assert!(row.passed);
    assert_eq!(row.run_time, Decimal::new(125, 3));
    assert!(row.time >= before - chrono::Duration::seconds(1));
    assert!(row.time <= Utc::now() + chrono::Duration::seconds(1));

    assert!(harness.observer.is_finished());
}

#[tokio::test]
async fn test_case_without_pass_persists_failed_row() {
    let harness = create_harness().await;
    let tc = TestCase::new("A.Foo");

    let mut messages = vec![TestMessage::assembly_starting(ASSEMBLY)];
    messages.extend(case_messages(&tc, Duration::from_millis(125), false));
    messages.push(assembly_finished(1, 1));
    harness.deliver(messages).await.unwrap();

    let rows = harness.pool.list_test_data().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].display_name, "A.Foo");
    assert!(!rows[0].passed);
    assert_eq!(rows[0].run_time, Decimal::new(125, 3));
}

#[tokio::test]
async fn test_interleaved_cases_stay_independent() {
    let harness = create_harness().await;
    let tc1 = TestCase::new("A.First");
    let tc2 = TestCase::new("A.Second");

    harness
        .deliver(vec![
            TestMessage::assembly_starting(ASSEMBLY),
            TestMessage::test_case_starting(&tc1),
            TestMessage::test_finished(&tc1, Duration::from_millis(250)),
            TestMessage::test_case_starting(&tc2),
            TestMessage::test_passed(&tc1, Duration::from_millis(250)),
            TestMessage::test_finished(&tc2, Duration::from_millis(1_500)),
            assembly_finished(2, 1),
        ])
        .await
        .unwrap();

    let mut rows = harness.pool.list_test_data().await.unwrap();
    rows.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].display_name, "A.First");
    assert!(rows[0].passed);
    assert_eq!(rows[0].run_time, Decimal::new(250, 3));

    assert_eq!(rows[1].display_name, "A.Second");
    assert!(!rows[1].passed);
    assert_eq!(rows[1].run_time, Decimal::new(1_500, 3));

    assert_eq!(
        harness.summary.summary(),
        RunSummary {
            started: 2,
            passed: 1,
            failed: 0,
            skipped: 0
        }
    );
}

#[tokio::test]
async fn test_empty_run_persists_nothing() {
    let harness = create_harness().await;

    harness
        .deliver(vec![
            TestMessage::assembly_starting(ASSEMBLY),
            assembly_finished(0, 0),
        ])
        .await
        .unwrap();

    assert!(harness.pool.list_test_data().await.unwrap().is_empty());
    assert!(harness.observer.is_finished());
}

#[tokio::test]
async fn test_rows_match_accumulated_records() {
    let harness = create_harness().await;
    let cases: Vec<_> = (1..=5)
        .map(|i| TestCase::new(format!("A.Case{}", i)))
        .collect();

    let mut messages = vec![TestMessage::assembly_starting(ASSEMBLY)];
    for (i, tc) in cases.iter().enumerate() {
        messages.extend(case_messages(tc, Duration::from_millis(101 * (i as u64 + 1)), i != 2));
    }
    messages.push(assembly_finished(5, 1));
    harness.deliver(messages).await.unwrap();

    let rows = harness.pool.list_test_data().await.unwrap();
    assert_eq!(rows.len(), 5);

    // The store keeps the run's records after saving
    let store = harness.accumulator.store();
    assert_eq!(store.len(), 5);
    for tc in &cases {
        let record = store.get(tc.id).unwrap();
        let row = rows
            .iter()
            .find(|r| r.display_name == record.display_name)
            .expect("row for every record");
        assert_eq!(row.passed, record.passed);
        assert_eq!(row.run_time, record.run_time);
        let recorded = record.time.unwrap();
        assert!((row.time - recorded).num_milliseconds().abs() <= 1);
    }
}

#[tokio::test]
async fn test_second_run_starts_from_empty_store() {
    let harness = create_harness().await;
    let first = TestCase::new("A.Foo");
    let second = TestCase::new("A.Bar");

    for tc in [&first, &second] {
        let mut messages = vec![TestMessage::assembly_starting(ASSEMBLY)];
        messages.extend(case_messages(tc, Duration::from_millis(125), true));
        messages.push(assembly_finished(1, 0));
        harness.deliver(messages).await.unwrap();
    }

    // Each run inserts only its own records
    let rows = harness.pool.list_test_data().await.unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["A.Foo", "A.Bar"]);

    assert_eq!(harness.accumulator.store().len(), 1);
    assert!(harness.accumulator.store().get(second.id).is_some());
}

#[tokio::test]
async fn test_unknown_case_aborts_delivery() {
    let harness = create_harness().await;
    let ghost = TestCase::new("A.Ghost");

    let result = harness
        .deliver(vec![
            TestMessage::assembly_starting(ASSEMBLY),
            TestMessage::test_finished(&ghost, Duration::from_millis(125)),
        ])
        .await;

    assert!(matches!(
        result,
        Err(testrun_visitors::error::AppError::UnknownTestCase(id)) if id == ghost.id
    ));
    assert!(!harness.observer.is_finished());
}
