//! JUnit XML report parser.
//!
//! Parses one test-class report (a single `<testsuite>`) into [`JUnitResults`].
//! Both Maven Surefire and Gradle write the common JUnit XML schema; the
//! [`ReportFlavor`] only covers the generator quirks.

use crate::result::{JUnitMethodResult, JUnitResults, TestOutcome};
use crate::stacktrace::test_method_line;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

const TAG_TEST_SUITE: &[u8] = b"testsuite";
const TAG_TEST_CASE: &[u8] = b"testcase";
const TAG_FAILURE: &[u8] = b"failure";
const TAG_ERROR: &[u8] = b"error";
const TAG_SKIPPED: &[u8] = b"skipped";

/// Parse errors. A report that fails to parse must not feed a build report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JUnitParseError {
    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("expected exactly one testsuite, found {0}")]
    SuiteCount(usize),

    #[error("testsuite has no name")]
    SuiteName,

    #[error("invalid value '{value}' for attribute '{attribute}'")]
    InvalidNumber { attribute: String, value: String },
}

/// Which tool generated the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFlavor {
    /// Maven Surefire (`target/surefire-reports/TEST-*.xml`)
    Surefire,
    /// Gradle test task (`build/test-results/<task>/TEST-*.xml`)
    Gradle,
}

impl ReportFlavor {
    /// Surefire formats large durations with a thousands separator ("1,234.5").
    fn parse_seconds(&self, value: &str) -> Option<f64> {
        match self {
            ReportFlavor::Surefire => value.replace(',', "").trim().parse().ok(),
            ReportFlavor::Gradle => value.trim().parse().ok(),
        }
    }

    /// The JUnit Platform on Gradle reports methods as "testSum()".
    fn method_name(&self, name: &str) -> String {
        match self {
            ReportFlavor::Surefire => name.to_string(),
            ReportFlavor::Gradle => name.strip_suffix("()").unwrap_or(name).to_string(),
        }
    }
}

/// Status element found inside a test case.
#[derive(Debug, Default)]
struct StatusDetail {
    failure_type: Option<String>,
    message: Option<String>,
    text: String,
}

impl StatusDetail {
    fn detail(&self) -> Option<String> {
        if !self.text.is_empty() {
            Some(self.text.clone())
        } else {
            self.message.clone()
        }
    }
}

#[derive(Debug, Default)]
struct CaseBuilder {
    name: String,
    class_name: String,
    error: Option<StatusDetail>,
    failure: Option<StatusDetail>,
    skipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Error,
    Failure,
    Skipped,
}

#[derive(Debug, Default)]
struct SuiteAttributes {
    name: Option<String>,
    tests: Option<String>,
    errors: Option<String>,
    failures: Option<String>,
    skipped: Option<String>,
    time: Option<String>,
}

struct ReportParser {
    flavor: ReportFlavor,
    suite_count: usize,
    suite: SuiteAttributes,
    current_case: Option<CaseBuilder>,
    capture: Option<Capture>,
    methods: Vec<JUnitMethodResult>,
}

/// Parse a single-suite JUnit XML document.
pub fn parse(flavor: ReportFlavor, xml: &str) -> Result<JUnitResults, JUnitParseError> {
    let mut parser = ReportParser {
        flavor,
        suite_count: 0,
        suite: SuiteAttributes::default(),
        current_case: None,
        capture: None,
        methods: Vec::new(),
    };

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        let event = reader.read_event().map_err(|e| {
            JUnitParseError::Xml(format!("at position {}: {}", reader.buffer_position(), e))
        })?;
        match event {
            Event::Start(e) => parser.open(&e, false)?,
            Event::Empty(e) => parser.open(&e, true)?,
            Event::End(e) => parser.close(e.local_name().as_ref()),
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| JUnitParseError::Xml(e.to_string()))?;
                parser.text(&text);
            }
            Event::CData(c) => parser.text(&String::from_utf8_lossy(&c.into_inner())),
            Event::Eof => break,
            _ => {}
        }
    }

    parser.finish()
}

impl ReportParser {
    fn open(&mut self, e: &BytesStart, empty: bool) -> Result<(), JUnitParseError> {
        match e.local_name().as_ref() {
            TAG_TEST_SUITE => {
                self.suite_count += 1;
                if self.suite_count == 1 {
                    self.suite = SuiteAttributes {
                        name: attribute(e, b"name")?,
                        tests: attribute(e, b"tests")?,
                        errors: attribute(e, b"errors")?,
                        failures: attribute(e, b"failures")?,
                        skipped: attribute(e, b"skipped")?,
                        time: attribute(e, b"time")?,
                    };
                }
            }
            TAG_TEST_CASE => {
                self.current_case = Some(CaseBuilder {
                    name: attribute(e, b"name")?.unwrap_or_default(),
                    class_name: attribute(e, b"classname")?.unwrap_or_default(),
                    ..Default::default()
                });
                if empty {
                    self.close(TAG_TEST_CASE);
                }
            }
            tag @ (TAG_FAILURE | TAG_ERROR | TAG_SKIPPED) => {
                let Some(case) = self.current_case.as_mut() else {
                    return Ok(());
                };
                let detail = StatusDetail {
                    failure_type: attribute(e, b"type")?,
                    message: attribute(e, b"message")?,
                    text: String::new(),
                };
                let capture = match tag {
                    TAG_ERROR => {
                        case.error.get_or_insert(detail);
                        Capture::Error
                    }
                    TAG_FAILURE => {
                        case.failure.get_or_insert(detail);
                        Capture::Failure
                    }
                    _ => {
                        case.skipped = true;
                        Capture::Skipped
                    }
                };
                if !empty {
                    self.capture = Some(capture);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        let (Some(capture), Some(case)) = (self.capture, self.current_case.as_mut()) else {
            return;
        };
        let target = match capture {
            Capture::Error => case.error.as_mut(),
            Capture::Failure => case.failure.as_mut(),
            Capture::Skipped => None,
        };
        if let Some(detail) = target {
            detail.text.push_str(text);
        }
    }

    fn close(&mut self, tag: &[u8]) {
        match tag {
            TAG_FAILURE | TAG_ERROR | TAG_SKIPPED => self.capture = None,
            TAG_TEST_CASE => {
                self.capture = None;
                if let Some(case) = self.current_case.take() {
                    self.methods.push(self.method_result(case));
                }
            }
            _ => {}
        }
    }

    fn method_result(&self, case: CaseBuilder) -> JUnitMethodResult {
        let method_name = self.flavor.method_name(&case.name);
        // error > failure > skipped > success
        let (outcome, detail) = if let Some(error) = case.error {
            (TestOutcome::Error, Some(error))
        } else if let Some(failure) = case.failure {
            (TestOutcome::Failure, Some(failure))
        } else if case.skipped {
            (TestOutcome::Ignored, None)
        } else {
            (TestOutcome::Success, None)
        };

        let failure_detail = detail.as_ref().and_then(StatusDetail::detail);
        let failure_line = failure_detail
            .as_deref()
            .and_then(|trace| test_method_line(trace, &case.class_name, &method_name));

        JUnitMethodResult {
            full_method_name: format!("{}.{}", case.class_name, method_name),
            method_name,
            outcome,
            failure_type: detail.and_then(|d| d.failure_type),
            failure_line,
            failure_detail,
        }
    }

    fn finish(self) -> Result<JUnitResults, JUnitParseError> {
        if self.suite_count != 1 {
            return Err(JUnitParseError::SuiteCount(self.suite_count));
        }

        let full_class_name = self.suite.name.clone().ok_or(JUnitParseError::SuiteName)?;
        let test_class_name = full_class_name
            .rsplit_once('.')
            .map(|(_, simple)| simple.to_string())
            .unwrap_or_else(|| full_class_name.clone());

        let count = |outcome: TestOutcome| {
            self.methods.iter().filter(|m| m.outcome == outcome).count() as u32
        };
        let tests = count_attribute("tests", &self.suite.tests)?
            .unwrap_or(self.methods.len() as u32);
        let num_errors =
            count_attribute("errors", &self.suite.errors)?.unwrap_or_else(|| count(TestOutcome::Error));
        let num_failures = count_attribute("failures", &self.suite.failures)?
            .unwrap_or_else(|| count(TestOutcome::Failure));
        let num_skipped = count_attribute("skipped", &self.suite.skipped)?
            .unwrap_or_else(|| count(TestOutcome::Ignored));

        let time_elapsed = match &self.suite.time {
            Some(value) => self.flavor.parse_seconds(value).ok_or_else(|| {
                JUnitParseError::InvalidNumber {
                    attribute: "time".to_string(),
                    value: value.clone(),
                }
            })?,
            None => 0.0,
        };

        Ok(JUnitResults {
            test_class_name,
            full_class_name,
            num_tests: tests.saturating_sub(num_skipped),
            num_errors,
            num_failures,
            num_skipped,
            time_elapsed,
            method_results: self.methods,
        })
    }
}

fn attribute(e: &BytesStart, key: &[u8]) -> Result<Option<String>, JUnitParseError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| JUnitParseError::Xml(err.to_string()))?;
        if attr.key.local_name().as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| JUnitParseError::Xml(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn count_attribute(name: &str, value: &Option<String>) -> Result<Option<u32>, JUnitParseError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| JUnitParseError::InvalidNumber {
                attribute: name.to_string(),
                value: v.clone(),
            }),
        None => Ok(None),
    }
}
