//! Outcome of evaluating one submission

use super::indicator::{derive_indicators, Indicator, IndicatorKey};
use crate::assignment::TestVisibility;
use crate::report::BuildReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal status of a submission's evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    /// Built and evaluated; indicators are available
    Validated,
    /// The build toolchain itself failed
    Failed,
    /// The build exceeded its time limit
    AbortedByTimeout,
    /// The build printed more output than allowed
    TooMuchOutput,
}

impl SubmissionStatus {
    /// Stable short code, as stored with the submission
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionStatus::Validated => "V",
            SubmissionStatus::Failed => "F",
            SubmissionStatus::AbortedByTimeout => "AT",
            SubmissionStatus::TooMuchOutput => "TO",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SubmissionStatus::Validated => "Validated",
            SubmissionStatus::Failed => "Build failed",
            SubmissionStatus::AbortedByTimeout => "Aborted by timeout",
            SubmissionStatus::TooMuchOutput => "Too much output",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// What is persisted about an evaluated submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub status: SubmissionStatus,
    pub indicators: Vec<Indicator>,
    /// Console output of the build (empty when the build never completed)
    pub output: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compilation_errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checkstyle_errors: Vec<String>,
    /// Seconds spent in instructor tests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_time_junit: Option<f64>,
    /// Line coverage of the submitter's own tests, in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_coverage: Option<u32>,
    pub hidden_tests_visibility: TestVisibility,
    pub evaluated_at: DateTime<Utc>,
}

impl Evaluation {
    /// Evaluation of a build that never produced a usable report
    pub fn terminal(status: SubmissionStatus, output: String, hidden_tests_visibility: TestVisibility) -> Self {
        Self {
            status,
            indicators: Vec::new(),
            output,
            compilation_errors: Vec::new(),
            checkstyle_errors: Vec::new(),
            elapsed_time_junit: None,
            student_coverage: None,
            hidden_tests_visibility,
            evaluated_at: Utc::now(),
        }
    }

    /// Evaluate a built report
    ///
    /// A failed toolchain yields [`SubmissionStatus::Failed`] and no
    /// indicators.
    pub fn from_report(report: &BuildReport) -> Self {
        let visibility = report.assignment().hidden_visibility();
        if report.execution_failed() {
            return Self::terminal(SubmissionStatus::Failed, report.output(), visibility);
        }

        Self {
            status: SubmissionStatus::Validated,
            indicators: derive_indicators(report),
            output: report.output(),
            compilation_errors: report.compilation_errors(),
            checkstyle_errors: report.checkstyle_errors(),
            elapsed_time_junit: report.elapsed_time_junit(),
            student_coverage: None,
            hidden_tests_visibility: visibility,
            evaluated_at: Utc::now(),
        }
    }

    pub fn indicator(&self, key: IndicatorKey) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.key == key)
    }

    /// The evaluation as the submitter may see it
    pub fn visible_to_student(&self) -> Evaluation {
        let mut visible = self.clone();
        match self.hidden_tests_visibility {
            TestVisibility::HideEverything => {
                visible.indicators.retain(|i| i.key != IndicatorKey::HiddenUnitTests);
            }
            TestVisibility::ShowOkNok => {
                for indicator in &mut visible.indicators {
                    if indicator.key == IndicatorKey::HiddenUnitTests {
                        indicator.progress = None;
                        indicator.goal = None;
                    }
                }
            }
            TestVisibility::ShowProgress => {}
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::indicator::IndicatorValue;

    fn evaluation(visibility: TestVisibility) -> Evaluation {
        let mut evaluation = Evaluation::terminal(SubmissionStatus::Validated, String::new(), visibility);
        evaluation.indicators = vec![
            Indicator {
                key: IndicatorKey::TeacherUnitTests,
                value: IndicatorValue::Ok,
                progress: Some(3),
                goal: Some(3),
            },
            Indicator {
                key: IndicatorKey::HiddenUnitTests,
                value: IndicatorValue::Nok,
                progress: Some(1),
                goal: Some(2),
            },
        ];
        evaluation
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(SubmissionStatus::AbortedByTimeout.code(), "AT");
        assert_eq!(SubmissionStatus::TooMuchOutput.code(), "TO");
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::AbortedByTimeout).unwrap(),
            r#""ABORTED_BY_TIMEOUT""#
        );
    }

    #[test]
    fn test_hide_everything_drops_hidden_indicator() {
        let visible = evaluation(TestVisibility::HideEverything).visible_to_student();
        assert!(visible.indicator(IndicatorKey::HiddenUnitTests).is_none());
        assert!(visible.indicator(IndicatorKey::TeacherUnitTests).is_some());
    }

    #[test]
    fn test_ok_nok_drops_counts() {
        let visible = evaluation(TestVisibility::ShowOkNok).visible_to_student();
        let hidden = visible.indicator(IndicatorKey::HiddenUnitTests).unwrap();
        assert_eq!(hidden.value, IndicatorValue::Nok);
        assert_eq!((hidden.progress, hidden.goal), (None, None));
        let teacher = visible.indicator(IndicatorKey::TeacherUnitTests).unwrap();
        assert_eq!(teacher.progress, Some(3));
    }

    #[test]
    fn test_show_progress_keeps_everything() {
        let original = evaluation(TestVisibility::ShowProgress);
        assert_eq!(original.visible_to_student(), original);
    }
}
