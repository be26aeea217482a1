//! Build report: the assignment-aware view of one build
//!
//! A [`BuildReport`] holds the console output of a build together with the
//! parsed JUnit and coverage reports, and answers the questions the
//! evaluation asks: per-category test summaries, rendered test failures, the
//! student-test shortfall, the instructor test matrix, and (through the
//! engine's [`EngineDiagnostics`]) compilation and style problems.
//!
//! Every query is a pure function of the report; the report is never
//! mutated once built.

pub mod detekt;
pub mod diagnostics;
pub mod extract;

mod android;
mod gradle;
mod maven;

pub use android::AndroidDiagnostics;
pub use diagnostics::{for_engine, EngineDiagnostics};
pub use gradle::GradleDiagnostics;
pub use maven::MavenDiagnostics;

use crate::assignment::{Assignment, AssignmentTestMethod, BuildEngine, UnknownEngine};
use crate::store::StoreError;
use drop_coverage::{CoverageParseError, CoverageReport};
use drop_junit::{JUnitMethodResult, JUnitParseError, JUnitResults, TestCategory, TestOutcome};
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error types for building a report
#[derive(Debug, thiserror::Error)]
pub enum BuildReportError {
    #[error(transparent)]
    UnsupportedEngine(#[from] UnknownEngine),

    #[error("Invalid marker pattern: {0}")]
    Pattern(#[from] regex_lite::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed JUnit report {name}: {source}")]
    JUnit {
        name: String,
        #[source]
        source: JUnitParseError,
    },

    #[error("Malformed coverage report {path}: {source}")]
    Coverage {
        path: PathBuf,
        #[source]
        source: CoverageParseError,
    },

    #[error("Failed to list reports: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Test counts folded over the classes of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JUnitSummary {
    pub num_tests: u32,
    pub num_failures: u32,
    pub num_errors: u32,
    pub num_skipped: u32,
    /// Elapsed seconds
    pub time_elapsed: f64,
    /// Passed mandatory tests (instructor categories only)
    pub num_mandatory_ok: u32,
}

impl JUnitSummary {
    /// Tests that ran without failure or error
    pub fn num_passed(&self) -> u32 {
        self.num_tests.saturating_sub(self.num_failures + self.num_errors)
    }
}

impl fmt::Display for JUnitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tests run: {}, Failures: {}, Errors: {}, Time elapsed: {:.3} sec",
            self.num_tests, self.num_failures, self.num_errors, self.time_elapsed
        )
    }
}

/// Evaluation-ready view of one build
#[derive(Debug)]
pub struct BuildReport {
    output_lines: Vec<String>,
    project_folder: PathBuf,
    assignment: Assignment,
    junit_results: Vec<JUnitResults>,
    coverage: Option<CoverageReport>,
    test_methods: Vec<AssignmentTestMethod>,
    diagnostics: Box<dyn EngineDiagnostics>,
}

impl BuildReport {
    /// Report over the console output alone, with the diagnostics of the
    /// assignment's build engine
    pub fn new(
        output_lines: Vec<String>,
        project_folder: impl Into<PathBuf>,
        assignment: Assignment,
    ) -> Result<Self, BuildReportError> {
        let project_folder = project_folder.into();
        let engine = assignment.engine()?;
        let diagnostics = for_engine(engine, assignment.language, &project_folder)?;
        Ok(Self {
            output_lines,
            project_folder,
            assignment,
            junit_results: Vec::new(),
            coverage: None,
            test_methods: Vec::new(),
            diagnostics,
        })
    }

    pub fn with_junit_results(mut self, junit_results: Vec<JUnitResults>) -> Self {
        self.junit_results = junit_results;
        self
    }

    pub fn with_coverage(mut self, coverage: Option<CoverageReport>) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_test_methods(mut self, test_methods: Vec<AssignmentTestMethod>) -> Self {
        self.test_methods = test_methods;
        self
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn project_folder(&self) -> &Path {
        &self.project_folder
    }

    pub fn engine(&self) -> BuildEngine {
        self.diagnostics.engine()
    }

    pub fn junit_results(&self) -> &[JUnitResults] {
        &self.junit_results
    }

    pub fn output_lines(&self) -> &[String] {
        &self.output_lines
    }

    /// Console output as stored with the submission
    pub fn output(&self) -> String {
        self.output_lines.join("\n")
    }

    fn results_in(&self, category: TestCategory) -> impl Iterator<Item = &JUnitResults> {
        let naming = &self.assignment.test_naming;
        self.junit_results
            .iter()
            .filter(move |r| r.belongs_to(category, naming))
    }

    /// Summary of the category, absent when no class belongs to it
    pub fn junit_summary_as_object(&self, category: TestCategory) -> Option<JUnitSummary> {
        let suffix = match category {
            TestCategory::Student => None,
            TestCategory::Teacher | TestCategory::Hidden => self.assignment.mandatory_tests_suffix.as_deref(),
        };

        let mut results = self.results_in(category).peekable();
        results.peek()?;

        let mut summary = JUnitSummary {
            num_tests: 0,
            num_failures: 0,
            num_errors: 0,
            num_skipped: 0,
            time_elapsed: 0.0,
            num_mandatory_ok: 0,
        };
        for result in results {
            summary.num_tests += result.num_tests;
            summary.num_failures += result.num_failures;
            summary.num_errors += result.num_errors;
            summary.num_skipped += result.num_skipped;
            summary.time_elapsed += result.time_elapsed;
            if let Some(suffix) = suffix {
                summary.num_mandatory_ok += result
                    .method_results
                    .iter()
                    .filter(|m| m.outcome == TestOutcome::Success && m.full_method_name.ends_with(suffix))
                    .count() as u32;
            }
        }
        Some(summary)
    }

    /// Rendered summary of the category
    pub fn junit_summary(&self, category: TestCategory) -> Option<String> {
        self.junit_summary_as_object(category).map(|s| s.to_string())
    }

    /// Seconds spent in instructor tests; absent when no teacher class ran
    pub fn elapsed_time_junit(&self) -> Option<f64> {
        let teacher = self.junit_summary_as_object(TestCategory::Teacher)?;
        let hidden = self
            .junit_summary_as_object(TestCategory::Hidden)
            .map(|s| s.time_elapsed)
            .unwrap_or(0.0);
        Some(((teacher.time_elapsed + hidden) * 1000.0).round() / 1000.0)
    }

    pub fn has_junit_errors(&self, category: TestCategory) -> Option<bool> {
        self.junit_summary_as_object(category)
            .map(|s| s.num_errors + s.num_failures > 0)
    }

    /// Failures and errors of the category, stack traces filtered of the
    /// submitter's package; absent when there are none
    pub fn junit_errors(&self, category: TestCategory) -> Option<String> {
        let prefix = self.assignment.package_prefix();
        let rendered: Vec<String> = self
            .results_in(category)
            .flat_map(|r| r.method_results.iter())
            .filter(|m| !matches!(m.outcome, TestOutcome::Success | TestOutcome::Ignored))
            .map(|m| m.render(prefix))
            .collect();

        if rendered.is_empty() {
            None
        } else {
            Some(rendered.join("\n\n"))
        }
    }

    /// Shortfall against the assignment's minimum number of student tests
    ///
    /// # Panics
    ///
    /// If the assignment does not accept student tests.
    pub fn not_enough_student_tests_message(&self) -> Option<String> {
        assert!(
            self.assignment.accepts_student_tests,
            "assignment '{}' does not accept student tests",
            self.assignment.id
        );

        let min = self.assignment.min_student_tests?;
        let num_tests = self
            .junit_summary_as_object(TestCategory::Student)
            .map(|s| s.num_tests)
            .unwrap_or(0);

        if num_tests >= min {
            None
        } else if num_tests == 0 {
            Some(format!(
                "The submission doesn't include unit tests. The assignment requires a minimum of {} tests.",
                min
            ))
        } else {
            Some(format!(
                "The submission only includes {} unit tests. The assignment requires a minimum of {} tests.",
                num_tests, min
            ))
        }
    }

    /// Results of the expected instructor tests, in inventory order, with
    /// the empty sentinel for tests that did not run; absent when the
    /// assignment declares no tests
    pub fn test_results(&self) -> Option<Vec<JUnitMethodResult>> {
        if self.test_methods.is_empty() {
            return None;
        }

        let pooled: Vec<(&str, &JUnitMethodResult)> = self
            .results_in(TestCategory::Teacher)
            .chain(self.results_in(TestCategory::Hidden))
            .flat_map(|r| {
                r.method_results
                    .iter()
                    .map(move |m| (r.test_class_name.as_str(), m))
            })
            .collect();

        Some(
            self.test_methods
                .iter()
                .map(|expected| {
                    pooled
                        .iter()
                        .find(|(class, m)| *class == expected.test_class && m.method_name == expected.test_method)
                        .map(|(_, m)| (*m).clone())
                        .unwrap_or_else(JUnitMethodResult::empty)
                })
                .collect(),
        )
    }

    pub fn execution_failed(&self) -> bool {
        self.diagnostics.execution_failed(&self.output_lines)
    }

    pub fn compilation_errors(&self) -> Vec<String> {
        self.diagnostics.compilation_errors(&self.output_lines)
    }

    pub fn checkstyle_validation_active(&self) -> bool {
        self.diagnostics.checkstyle_validation_active(&self.output_lines)
    }

    pub fn checkstyle_errors(&self) -> Vec<String> {
        self.diagnostics.checkstyle_errors(&self.output_lines)
    }

    pub fn coverage(&self) -> Option<&CoverageReport> {
        self.coverage.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::Language;

    fn method(class: &str, name: &str, outcome: TestOutcome) -> JUnitMethodResult {
        JUnitMethodResult {
            method_name: name.to_string(),
            full_method_name: format!("org.sample.{}.{}", class, name),
            outcome,
            failure_type: None,
            failure_line: None,
            failure_detail: match outcome {
                TestOutcome::Failure | TestOutcome::Error => Some(format!("java.lang.AssertionError: {}", name)),
                _ => None,
            },
        }
    }

    fn class(name: &str, methods: Vec<JUnitMethodResult>, time: f64) -> JUnitResults {
        let count = |o: TestOutcome| methods.iter().filter(|m| m.outcome == o).count() as u32;
        JUnitResults {
            test_class_name: name.to_string(),
            full_class_name: format!("org.sample.{}", name),
            num_tests: methods.len() as u32 - count(TestOutcome::Ignored),
            num_errors: count(TestOutcome::Error),
            num_failures: count(TestOutcome::Failure),
            num_skipped: count(TestOutcome::Ignored),
            time_elapsed: time,
            method_results: methods,
        }
    }

    fn report(assignment: Assignment, results: Vec<JUnitResults>) -> BuildReport {
        BuildReport::new(vec![], "/tmp/project", assignment)
            .unwrap()
            .with_junit_results(results)
    }

    fn maven_assignment() -> Assignment {
        Assignment::new("sample", BuildEngine::Maven, Language::Java)
    }

    #[test]
    fn test_unknown_engine_is_rejected() {
        let mut assignment = maven_assignment();
        assignment.build_engine = "ANT".to_string();
        let err = BuildReport::new(vec![], "/tmp/project", assignment).unwrap_err();
        assert!(matches!(err, BuildReportError::UnsupportedEngine(_)));
        assert_eq!(err.to_string(), "unsupported build engine 'ANT'");
    }

    #[test]
    fn test_output_joins_lines() {
        let report = BuildReport::new(
            vec!["[INFO] one".to_string(), "[INFO] two".to_string()],
            "/tmp/project",
            maven_assignment(),
        )
        .unwrap();
        assert_eq!(report.output(), "[INFO] one\n[INFO] two");
        assert_eq!(report.engine(), BuildEngine::Maven);
    }

    #[test]
    fn test_absent_category_has_no_summary() {
        let report = report(
            maven_assignment(),
            vec![class("TestTeacherProject", vec![method("TestTeacherProject", "t1", TestOutcome::Success)], 0.5)],
        );
        assert!(report.junit_summary_as_object(TestCategory::Hidden).is_none());
        assert!(report.junit_summary(TestCategory::Student).is_none());
        assert!(report.has_junit_errors(TestCategory::Hidden).is_none());
        assert!(report.junit_errors(TestCategory::Hidden).is_none());
    }

    #[test]
    fn test_summary_display() {
        let report = report(
            maven_assignment(),
            vec![class(
                "TestTeacherProject",
                vec![
                    method("TestTeacherProject", "t1", TestOutcome::Success),
                    method("TestTeacherProject", "t2", TestOutcome::Failure),
                ],
                0.25,
            )],
        );
        assert_eq!(
            report.junit_summary(TestCategory::Teacher).unwrap(),
            "Tests run: 2, Failures: 1, Errors: 0, Time elapsed: 0.250 sec"
        );
        assert_eq!(report.has_junit_errors(TestCategory::Teacher), Some(true));
    }

    #[test]
    fn test_summary_folds_classes() {
        let report = report(
            maven_assignment(),
            vec![
                class("TestTeacherA", vec![method("TestTeacherA", "a", TestOutcome::Error)], 0.5),
                class(
                    "TestTeacherB",
                    vec![
                        method("TestTeacherB", "b", TestOutcome::Success),
                        method("TestTeacherB", "c", TestOutcome::Ignored),
                    ],
                    1.0,
                ),
                class("TestStudent", vec![method("TestStudent", "s", TestOutcome::Success)], 0.1),
            ],
        );
        let summary = report.junit_summary_as_object(TestCategory::Teacher).unwrap();
        assert_eq!(summary.num_tests, 2);
        assert_eq!(summary.num_errors, 1);
        assert_eq!(summary.num_skipped, 1);
        assert_eq!(summary.num_passed(), 1);
        assert!((summary.time_elapsed - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_elapsed_time_sums_instructor_categories() {
        let report = report(
            maven_assignment(),
            vec![
                class("TestTeacherA", vec![method("TestTeacherA", "a", TestOutcome::Success)], 0.1),
                class("TestTeacherHiddenA", vec![method("TestTeacherHiddenA", "h", TestOutcome::Success)], 0.2),
                class("TestMine", vec![method("TestMine", "m", TestOutcome::Success)], 5.0),
            ],
        );
        assert_eq!(report.elapsed_time_junit(), Some(0.3));
    }

    #[test]
    fn test_elapsed_time_requires_teacher_summary() {
        let report = report(
            maven_assignment(),
            vec![class("TestTeacherHiddenA", vec![method("TestTeacherHiddenA", "h", TestOutcome::Success)], 0.2)],
        );
        assert_eq!(report.elapsed_time_junit(), None);
    }

    #[test]
    fn test_mandatory_suffix_not_counted_for_students() {
        let mut assignment = maven_assignment();
        assignment.accepts_student_tests = true;
        assignment.mandatory_tests_suffix = Some("_MANDATORY".to_string());
        let report = report(
            assignment,
            vec![class("TestMine", vec![method("TestMine", "t_MANDATORY", TestOutcome::Success)], 0.1)],
        );
        assert_eq!(report.junit_summary_as_object(TestCategory::Student).unwrap().num_mandatory_ok, 0);
    }

    #[test]
    fn test_junit_errors_render_problems_only() {
        let mut assignment = maven_assignment();
        assignment.package_name = Some("org.sample".to_string());
        let report = report(
            assignment,
            vec![class(
                "TestTeacherProject",
                vec![
                    method("TestTeacherProject", "ok", TestOutcome::Success),
                    method("TestTeacherProject", "skipped", TestOutcome::Ignored),
                    method("TestTeacherProject", "broken", TestOutcome::Failure),
                    method("TestTeacherProject", "crashed", TestOutcome::Error),
                ],
                0.1,
            )],
        );
        assert_eq!(
            report.junit_errors(TestCategory::Teacher).unwrap(),
            "FAILURE: broken\njava.lang.AssertionError: broken\n\nERROR: crashed\njava.lang.AssertionError: crashed"
        );
    }

    #[test]
    fn test_no_minimum_means_no_message() {
        let mut assignment = maven_assignment();
        assignment.accepts_student_tests = true;
        let report = report(assignment, vec![]);
        assert_eq!(report.not_enough_student_tests_message(), None);
    }

    #[test]
    fn test_zero_student_tests_message() {
        let mut assignment = maven_assignment();
        assignment.accepts_student_tests = true;
        assignment.min_student_tests = Some(2);
        let report = report(assignment, vec![]);
        assert_eq!(
            report.not_enough_student_tests_message().unwrap(),
            "The submission doesn't include unit tests. The assignment requires a minimum of 2 tests."
        );
    }

    #[test]
    #[should_panic(expected = "does not accept student tests")]
    fn test_message_requires_student_tests() {
        report(maven_assignment(), vec![]).not_enough_student_tests_message();
    }

    #[test]
    fn test_empty_inventory_has_no_matrix() {
        assert!(report(maven_assignment(), vec![]).test_results().is_none());
    }

    #[test]
    fn test_matrix_ignores_student_classes() {
        let report = report(
            maven_assignment(),
            vec![class("TestMine", vec![method("TestMine", "t1", TestOutcome::Success)], 0.1)],
        )
        .with_test_methods(vec![AssignmentTestMethod::new("TestMine", "t1")]);
        assert_eq!(report.test_results().unwrap(), vec![JUnitMethodResult::empty()]);
    }

    #[test]
    fn test_matrix_first_match_wins() {
        let mut other_package = class(
            "TestTeacherProject",
            vec![method("TestTeacherProject", "testSum", TestOutcome::Success)],
            0.1,
        );
        other_package.full_class_name = "org.other.TestTeacherProject".to_string();
        let report = report(
            maven_assignment(),
            vec![
                class(
                    "TestTeacherProject",
                    vec![
                        method("TestTeacherProject", "testSum", TestOutcome::Failure),
                        method("TestTeacherProject", "testSum", TestOutcome::Success),
                    ],
                    0.1,
                ),
                other_package,
            ],
        )
        .with_test_methods(vec![AssignmentTestMethod::new("TestTeacherProject", "testSum")]);

        let matrix = report.test_results().unwrap();
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix[0].outcome, TestOutcome::Failure);
        assert_eq!(matrix[0].full_method_name, "org.sample.TestTeacherProject.testSum");
    }

    #[test]
    fn test_report_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BuildReport>();
    }
}
