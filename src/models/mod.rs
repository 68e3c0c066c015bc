//! Domain models for test-run messages and results.

pub mod message;
pub mod test_data;

pub use message::{
    AssemblyFinished, AssemblyStarting, MessageKind, TestCase, TestCaseFinished, TestCaseId,
    TestCaseStarting, TestFailed, TestFinished, TestMessage, TestPassed, TestSkipped,
    TestStarting,
};
pub use test_data::TestData;
