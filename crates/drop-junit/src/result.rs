//! JUnit result types.

use crate::category::{TestCategory, TestNaming};
use crate::stacktrace::filter_stacktrace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single test method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestOutcome {
    /// The test ran and passed.
    Success,
    /// An assertion failed.
    Failure,
    /// The test threw an unexpected exception.
    Error,
    /// The test was skipped.
    Ignored,
    /// The test was expected but never ran.
    Empty,
}

impl TestOutcome {
    /// Whether this outcome counts against the submission.
    pub fn is_problem(&self) -> bool {
        matches!(self, TestOutcome::Failure | TestOutcome::Error)
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Success => write!(f, "SUCCESS"),
            TestOutcome::Failure => write!(f, "FAILURE"),
            TestOutcome::Error => write!(f, "ERROR"),
            TestOutcome::Ignored => write!(f, "IGNORED"),
            TestOutcome::Empty => write!(f, "EMPTY"),
        }
    }
}

/// Result of one test method, as read from a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JUnitMethodResult {
    /// Method name (e.g., "testInsert")
    pub method_name: String,
    /// Fully qualified "<classname>.<method>"
    pub full_method_name: String,
    pub outcome: TestOutcome,
    /// Exception type of the failure or error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_type: Option<String>,
    /// Line of the test method where the failure surfaced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_line: Option<u32>,
    /// Stack trace, or the failure message when the report carries no trace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_detail: Option<String>,
}

impl JUnitMethodResult {
    /// Sentinel for an expected test that did not run at all.
    pub fn empty() -> Self {
        Self {
            method_name: String::new(),
            full_method_name: String::new(),
            outcome: TestOutcome::Empty,
            failure_type: None,
            failure_line: None,
            failure_detail: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outcome == TestOutcome::Empty
    }

    /// Simple class name, taken from the qualified method name.
    pub fn class_name(&self) -> &str {
        let qualified_class = self
            .full_method_name
            .rsplit_once('.')
            .map(|(class, _)| class)
            .unwrap_or("");
        qualified_class
            .rsplit_once('.')
            .map(|(_, simple)| simple)
            .unwrap_or(qualified_class)
    }

    /// Render the outcome header and the failure detail, dropping stack
    /// frames that belong to `package_prefix`.
    pub fn render(&self, package_prefix: &str) -> String {
        let mut rendered = format!("{}: {}", self.outcome, self.method_name);
        if let Some(detail) = &self.failure_detail {
            let filtered = filter_stacktrace(detail, package_prefix);
            if !filtered.is_empty() {
                rendered.push('\n');
                rendered.push_str(&filtered);
            }
        }
        rendered
    }
}

/// Parsed report of one test class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JUnitResults {
    /// Simple class name (e.g., "TestTeacherProject")
    pub test_class_name: String,
    /// Fully qualified class name
    pub full_class_name: String,
    /// Tests that ran (skipped tests excluded)
    pub num_tests: u32,
    pub num_errors: u32,
    pub num_failures: u32,
    pub num_skipped: u32,
    /// Elapsed seconds
    pub time_elapsed: f64,
    pub method_results: Vec<JUnitMethodResult>,
}

impl JUnitResults {
    /// Authored by the submitter.
    pub fn is_student(&self, naming: &TestNaming) -> bool {
        self.test_class_name.starts_with(&naming.student_prefix)
            && !self.test_class_name.starts_with(&naming.teacher_prefix)
    }

    /// Authored by the instructor and visible to the submitter.
    pub fn is_teacher_public(&self, naming: &TestNaming) -> bool {
        self.test_class_name.starts_with(&naming.teacher_prefix) && !self.is_teacher_hidden(naming)
    }

    /// Authored by the instructor with configurable visibility.
    pub fn is_teacher_hidden(&self, naming: &TestNaming) -> bool {
        self.test_class_name.starts_with(&naming.hidden_prefix)
    }

    /// The category of this class, if its name follows any convention.
    pub fn category(&self, naming: &TestNaming) -> Option<TestCategory> {
        if self.is_teacher_hidden(naming) {
            Some(TestCategory::Hidden)
        } else if self.is_teacher_public(naming) {
            Some(TestCategory::Teacher)
        } else if self.is_student(naming) {
            Some(TestCategory::Student)
        } else {
            None
        }
    }

    pub fn belongs_to(&self, category: TestCategory, naming: &TestNaming) -> bool {
        match category {
            TestCategory::Student => self.is_student(naming),
            TestCategory::Teacher => self.is_teacher_public(naming),
            TestCategory::Hidden => self.is_teacher_hidden(naming),
        }
    }
}
