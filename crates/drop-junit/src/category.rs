//! Test categories and the class naming conventions that select them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a test class, and how it is shown to the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestCategory {
    /// Written by the submitter; checked against a minimum count
    Student,
    /// Written by the instructor; always shown in full
    Teacher,
    /// Written by the instructor; visibility set per assignment
    Hidden,
}

impl TestCategory {
    pub const ALL: [TestCategory; 3] = [TestCategory::Student, TestCategory::Teacher, TestCategory::Hidden];

    /// Whether the category holds instructor-authored tests.
    pub fn is_instructor(&self) -> bool {
        matches!(self, TestCategory::Teacher | TestCategory::Hidden)
    }
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestCategory::Student => write!(f, "STUDENT"),
            TestCategory::Teacher => write!(f, "TEACHER"),
            TestCategory::Hidden => write!(f, "HIDDEN"),
        }
    }
}

/// Class-name prefixes that assign a test class to a category.
///
/// The hidden prefix extends the teacher prefix, which extends the student
/// prefix; a class therefore matches at most one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestNaming {
    pub student_prefix: String,
    pub teacher_prefix: String,
    pub hidden_prefix: String,
}

impl Default for TestNaming {
    fn default() -> Self {
        Self {
            student_prefix: "Test".to_string(),
            teacher_prefix: "TestTeacher".to_string(),
            hidden_prefix: "TestTeacherHidden".to_string(),
        }
    }
}

impl TestNaming {
    /// Check that the prefixes nest, returning a description of the first problem.
    pub fn check(&self) -> Result<(), String> {
        if self.student_prefix.is_empty()
            || self.teacher_prefix.is_empty()
            || self.hidden_prefix.is_empty()
        {
            return Err("test naming prefixes must not be empty".to_string());
        }
        if !self.teacher_prefix.starts_with(&self.student_prefix) {
            return Err(format!(
                "teacher prefix '{}' must start with student prefix '{}'",
                self.teacher_prefix, self.student_prefix
            ));
        }
        if self.hidden_prefix == self.teacher_prefix
            || !self.hidden_prefix.starts_with(&self.teacher_prefix)
        {
            return Err(format!(
                "hidden prefix '{}' must extend teacher prefix '{}'",
                self.hidden_prefix, self.teacher_prefix
            ));
        }
        Ok(())
    }
}
