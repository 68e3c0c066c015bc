//! Test-run message visitors.
//!
//! Two pieces that plug into a test runner's message stream:
//! - [`visitor::VisitorObserver`] fans each lifecycle message out to several visitors.
//! - [`visitor::TestFinishedVisitor`] accumulates one result per test case and
//!   saves the whole batch to the database when the run finishes.

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod migration;
pub mod models;
pub mod replay;
pub mod store;
pub mod visitor;
