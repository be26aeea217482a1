//! JaCoCo CSV parser.

use crate::report::{ClassCoverage, Counter, CoverageReport};
use serde::Deserialize;

/// Coverage parse errors.
#[derive(Debug, thiserror::Error)]
pub enum CoverageParseError {
    #[error("invalid coverage CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct JacocoRow {
    #[serde(rename = "PACKAGE")]
    package: String,
    #[serde(rename = "CLASS")]
    class: String,
    #[serde(rename = "INSTRUCTION_MISSED")]
    instruction_missed: u64,
    #[serde(rename = "INSTRUCTION_COVERED")]
    instruction_covered: u64,
    #[serde(rename = "BRANCH_MISSED")]
    branch_missed: u64,
    #[serde(rename = "BRANCH_COVERED")]
    branch_covered: u64,
    #[serde(rename = "LINE_MISSED")]
    line_missed: u64,
    #[serde(rename = "LINE_COVERED")]
    line_covered: u64,
    #[serde(rename = "METHOD_MISSED")]
    method_missed: u64,
    #[serde(rename = "METHOD_COVERED")]
    method_covered: u64,
}

impl From<JacocoRow> for ClassCoverage {
    fn from(row: JacocoRow) -> Self {
        Self {
            package: row.package,
            class: row.class,
            instructions: Counter::new(row.instruction_missed, row.instruction_covered),
            branches: Counter::new(row.branch_missed, row.branch_covered),
            lines: Counter::new(row.line_missed, row.line_covered),
            methods: Counter::new(row.method_missed, row.method_covered),
        }
    }
}

/// Parse the text of a `jacoco.csv` report.
pub fn parse(csv_text: &str) -> Result<CoverageReport, CoverageParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let mut classes = Vec::new();
    for row in reader.deserialize::<JacocoRow>() {
        classes.push(row?.into());
    }

    Ok(CoverageReport { classes })
}
