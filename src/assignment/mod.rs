//! Assignment settings consumed by the evaluation pipeline
//!
//! An assignment selects the build engine and language, the student-test
//! policy and the visibility of hidden tests. It is read from an
//! `assignment.toml` document (see [`config`]).

mod config;

pub use config::ConfigError;

use drop_junit::{ReportFlavor, TestNaming};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Build tool used to compile and test a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildEngine {
    Maven,
    Gradle,
    /// Gradle with the Android plugin
    Android,
}

impl BuildEngine {
    /// Generator of the JUnit XML reports
    pub fn report_flavor(&self) -> ReportFlavor {
        match self {
            BuildEngine::Maven => ReportFlavor::Surefire,
            BuildEngine::Gradle | BuildEngine::Android => ReportFlavor::Gradle,
        }
    }
}

impl fmt::Display for BuildEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildEngine::Maven => write!(f, "MAVEN"),
            BuildEngine::Gradle => write!(f, "GRADLE"),
            BuildEngine::Android => write!(f, "ANDROID"),
        }
    }
}

/// Unrecognized build engine name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported build engine '{0}'")]
pub struct UnknownEngine(pub String);

impl FromStr for BuildEngine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAVEN" => Ok(BuildEngine::Maven),
            "GRADLE" => Ok(BuildEngine::Gradle),
            "ANDROID" => Ok(BuildEngine::Android),
            _ => Err(UnknownEngine(s.to_string())),
        }
    }
}

/// Source language of the submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    Java,
    Kotlin,
}

impl Language {
    /// Source folder name under `src/main` and `src/test`
    pub fn source_folder(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Kotlin => "kotlin",
        }
    }
}

/// How much of the hidden tests' result the submitter may see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestVisibility {
    /// No hidden-test indicator at all
    HideEverything,
    /// Only the OK/NOK verdict
    ShowOkNok,
    /// Verdict plus passed/total counts
    ShowProgress,
}

/// A test the instructor expects every submission to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentTestMethod {
    /// Simple class name (e.g., "TestTeacherProject")
    pub test_class: String,
    pub test_method: String,
}

impl AssignmentTestMethod {
    pub fn new(test_class: impl Into<String>, test_method: impl Into<String>) -> Self {
        Self {
            test_class: test_class.into(),
            test_method: test_method.into(),
        }
    }
}

/// Assignment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Assignment identifier
    pub id: String,

    /// Build engine name as stored (MAVEN, GRADLE or ANDROID); checked when
    /// a report is built, see [`Assignment::engine`]
    pub build_engine: String,

    pub language: Language,

    /// Package of the submitted code; its frames are dropped from rendered
    /// stack traces
    #[serde(default)]
    pub package_name: Option<String>,

    #[serde(default)]
    pub accepts_student_tests: bool,

    /// Minimum number of student tests (requires `accepts_student_tests`)
    #[serde(default)]
    pub min_student_tests: Option<u32>,

    /// Suffix marking mandatory instructor tests (e.g., "_MANDATORY")
    #[serde(default)]
    pub mandatory_tests_suffix: Option<String>,

    /// Visibility of hidden tests; hidden tests are fully hidden when unset
    #[serde(default)]
    pub hidden_tests_visibility: Option<TestVisibility>,

    /// Re-run the student tests alone to measure their coverage
    #[serde(default)]
    pub calculate_student_tests_coverage: bool,

    #[serde(default)]
    pub test_naming: TestNaming,

    /// Expected instructor tests, in display order
    #[serde(default)]
    pub test_methods: Vec<AssignmentTestMethod>,
}

impl Assignment {
    /// Minimal assignment with defaults for everything optional
    pub fn new(id: impl Into<String>, build_engine: BuildEngine, language: Language) -> Self {
        Self {
            id: id.into(),
            build_engine: build_engine.to_string(),
            language,
            package_name: None,
            accepts_student_tests: false,
            min_student_tests: None,
            mandatory_tests_suffix: None,
            hidden_tests_visibility: None,
            calculate_student_tests_coverage: false,
            test_naming: TestNaming::default(),
            test_methods: Vec::new(),
        }
    }

    /// The configured build engine
    pub fn engine(&self) -> Result<BuildEngine, UnknownEngine> {
        self.build_engine.parse()
    }

    /// Package prefix used to filter stack traces ("" when not set)
    pub fn package_prefix(&self) -> &str {
        self.package_name.as_deref().unwrap_or("")
    }

    /// Effective hidden-test visibility
    pub fn hidden_visibility(&self) -> TestVisibility {
        self.hidden_tests_visibility.unwrap_or(TestVisibility::HideEverything)
    }
}
