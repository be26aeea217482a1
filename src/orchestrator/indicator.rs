//! Per-category verdicts derived from a build report

use crate::report::BuildReport;
use drop_junit::TestCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Evaluation category an indicator reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKey {
    Compilation,
    Checkstyle,
    StudentUnitTests,
    TeacherUnitTests,
    HiddenUnitTests,
}

impl IndicatorKey {
    pub fn description(&self) -> &'static str {
        match self {
            IndicatorKey::Compilation => "Compilation",
            IndicatorKey::Checkstyle => "Code quality",
            IndicatorKey::StudentUnitTests => "Student unit tests",
            IndicatorKey::TeacherUnitTests => "Teacher unit tests",
            IndicatorKey::HiddenUnitTests => "Hidden unit tests",
        }
    }
}

/// Short categorical verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorValue {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NOK")]
    Nok,
    #[serde(rename = "Not Enough Tests")]
    NotEnoughTests,
}

impl IndicatorValue {
    fn from_ok(ok: bool) -> Self {
        if ok {
            IndicatorValue::Ok
        } else {
            IndicatorValue::Nok
        }
    }
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorValue::Ok => write!(f, "OK"),
            IndicatorValue::Nok => write!(f, "NOK"),
            IndicatorValue::NotEnoughTests => write!(f, "Not Enough Tests"),
        }
    }
}

/// Verdict on one category, with passed/total test counts where they apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub key: IndicatorKey,
    pub value: IndicatorValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<u32>,
}

impl Indicator {
    fn new(key: IndicatorKey, value: IndicatorValue) -> Self {
        Self {
            key,
            value,
            progress: None,
            goal: None,
        }
    }

    fn with_counts(mut self, report: &BuildReport, category: TestCategory) -> Self {
        if let Some(summary) = report.junit_summary_as_object(category) {
            self.progress = Some(summary.num_passed());
            self.goal = Some(summary.num_tests);
        }
        self
    }
}

/// Indicators of a build whose toolchain did not fail
pub fn derive_indicators(report: &BuildReport) -> Vec<Indicator> {
    let mut indicators = vec![Indicator::new(
        IndicatorKey::Compilation,
        IndicatorValue::from_ok(report.compilation_errors().is_empty()),
    )];

    if report.checkstyle_validation_active() {
        indicators.push(Indicator::new(
            IndicatorKey::Checkstyle,
            IndicatorValue::from_ok(report.checkstyle_errors().is_empty()),
        ));
    }

    if report.assignment().accepts_student_tests {
        let value = if report.has_junit_errors(TestCategory::Student) == Some(true) {
            IndicatorValue::Nok
        } else if report.junit_summary_as_object(TestCategory::Student).is_none()
            || report.not_enough_student_tests_message().is_some()
        {
            IndicatorValue::NotEnoughTests
        } else {
            IndicatorValue::Ok
        };
        indicators.push(Indicator::new(IndicatorKey::StudentUnitTests, value).with_counts(report, TestCategory::Student));
    }

    for (key, category) in [
        (IndicatorKey::TeacherUnitTests, TestCategory::Teacher),
        (IndicatorKey::HiddenUnitTests, TestCategory::Hidden),
    ] {
        if let Some(has_errors) = report.has_junit_errors(category) {
            indicators.push(Indicator::new(key, IndicatorValue::from_ok(!has_errors)).with_counts(report, category));
        }
    }

    indicators
}
