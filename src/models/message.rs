//! Lifecycle messages emitted by the host test runner.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, comparable identity of a test case for the duration of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestCaseId(Uuid);

impl TestCaseId {
    /// Allocate a fresh, time-ordered id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TestCaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TestCaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A test case as seen by the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: TestCaseId,
    /// Fully qualified name (assembly.method)
    pub display_name: String,
}

impl TestCase {
    pub fn new(display_name: impl Into<String>) -> Self {
        TestCase {
            id: TestCaseId::new(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyStarting {
    pub assembly_name: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyFinished {
    pub assembly_name: String,
    pub tests_run: u32,
    pub tests_failed: u32,
    pub tests_skipped: u32,
    pub execution_time: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseStarting {
    pub test_case: TestCase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseFinished {
    pub test_case: TestCase,
    pub execution_time: Duration,
    pub tests_run: u32,
    pub tests_failed: u32,
    pub tests_skipped: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStarting {
    pub test_case: TestCase,
}

/// A single test finished, whatever its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestFinished {
    pub test_case: TestCase,
    pub execution_time: Duration,
    #[serde(default)]
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPassed {
    pub test_case: TestCase,
    pub execution_time: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestFailed {
    pub test_case: TestCase,
    pub execution_time: Duration,
    #[serde(default)]
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSkipped {
    pub test_case: TestCase,
    pub reason: String,
}

/// One lifecycle message from the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestMessage {
    AssemblyStarting(AssemblyStarting),
    TestCaseStarting(TestCaseStarting),
    TestStarting(TestStarting),
    TestFinished(TestFinished),
    TestPassed(TestPassed),
    TestFailed(TestFailed),
    TestSkipped(TestSkipped),
    TestCaseFinished(TestCaseFinished),
    AssemblyFinished(AssemblyFinished),
}

/// Payload-free discriminant of [`TestMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    AssemblyStarting,
    TestCaseStarting,
    TestStarting,
    TestFinished,
    TestPassed,
    TestFailed,
    TestSkipped,
    TestCaseFinished,
    AssemblyFinished,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssemblyStarting => "assembly_starting",
            Self::TestCaseStarting => "test_case_starting",
            Self::TestStarting => "test_starting",
            Self::TestFinished => "test_finished",
            Self::TestPassed => "test_passed",
            Self::TestFailed => "test_failed",
            Self::TestSkipped => "test_skipped",
            Self::TestCaseFinished => "test_case_finished",
            Self::AssemblyFinished => "assembly_finished",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TestMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::AssemblyStarting(_) => MessageKind::AssemblyStarting,
            Self::TestCaseStarting(_) => MessageKind::TestCaseStarting,
            Self::TestStarting(_) => MessageKind::TestStarting,
            Self::TestFinished(_) => MessageKind::TestFinished,
            Self::TestPassed(_) => MessageKind::TestPassed,
            Self::TestFailed(_) => MessageKind::TestFailed,
            Self::TestSkipped(_) => MessageKind::TestSkipped,
            Self::TestCaseFinished(_) => MessageKind::TestCaseFinished,
            Self::AssemblyFinished(_) => MessageKind::AssemblyFinished,
        }
    }

    /// The test case this message concerns, or `None` for assembly-level messages.
    pub fn test_case(&self) -> Option<&TestCase> {
        match self {
            Self::AssemblyStarting(_) | Self::AssemblyFinished(_) => None,
            Self::TestCaseStarting(m) => Some(&m.test_case),
            Self::TestStarting(m) => Some(&m.test_case),
            Self::TestFinished(m) => Some(&m.test_case),
            Self::TestPassed(m) => Some(&m.test_case),
            Self::TestFailed(m) => Some(&m.test_case),
            Self::TestSkipped(m) => Some(&m.test_case),
            Self::TestCaseFinished(m) => Some(&m.test_case),
        }
    }

    pub fn assembly_starting(assembly_name: impl Into<String>) -> Self {
        Self::AssemblyStarting(AssemblyStarting {
            assembly_name: assembly_name.into(),
            start_time: Utc::now(),
        })
    }

    pub fn assembly_finished(
        assembly_name: impl Into<String>,
        tests_run: u32,
        tests_failed: u32,
        tests_skipped: u32,
        execution_time: Duration,
    ) -> Self {
        Self::AssemblyFinished(AssemblyFinished {
            assembly_name: assembly_name.into(),
            tests_run,
            tests_failed,
            tests_skipped,
            execution_time,
        })
    }

    pub fn test_case_starting(test_case: &TestCase) -> Self {
        Self::TestCaseStarting(TestCaseStarting {
            test_case: test_case.clone(),
        })
    }

    pub fn test_finished(test_case: &TestCase, execution_time: Duration) -> Self {
        Self::TestFinished(TestFinished {
            test_case: test_case.clone(),
            execution_time,
            output: String::new(),
        })
    }

    pub fn test_passed(test_case: &TestCase, execution_time: Duration) -> Self {
        Self::TestPassed(TestPassed {
            test_case: test_case.clone(),
            execution_time,
        })
    }

    pub fn test_failed(
        test_case: &TestCase,
        execution_time: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self::TestFailed(TestFailed {
            test_case: test_case.clone(),
            execution_time,
            messages: vec![message.into()],
        })
    }

    pub fn test_skipped(test_case: &TestCase, reason: impl Into<String>) -> Self {
        Self::TestSkipped(TestSkipped {
            test_case: test_case.clone(),
            reason: reason.into(),
        })
    }
}
