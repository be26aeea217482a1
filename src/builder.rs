//! Build report construction
//!
//! Gathers everything a [`BuildReport`] needs after a build has run: the JUnit
//! reports (from the project folder, or from the store when a submission is
//! re-evaluated), the JaCoCo coverage report and the assignment's test
//! inventory.

use crate::assignment::{Assignment, BuildEngine};
use crate::report::{BuildReport, BuildReportError};
use crate::store::{ReportStore, StoredReport};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Submission a build belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRef {
    pub id: String,
    /// Re-evaluation from the stored reports instead of the project folder
    pub rebuild: bool,
}

impl SubmissionRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rebuild: false,
        }
    }

    pub fn rebuild(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rebuild: true,
        }
    }
}

/// Directory holding the JUnit XML reports, relative to the project folder
pub fn junit_report_dir(engine: BuildEngine) -> &'static str {
    match engine {
        BuildEngine::Maven => "target/surefire-reports",
        BuildEngine::Gradle => "build/test-results/test",
        BuildEngine::Android => "app/build/test-results/testDebugUnitTest",
    }
}

/// JaCoCo CSV report, relative to the project folder
pub fn coverage_report_path(engine: BuildEngine) -> &'static str {
    match engine {
        BuildEngine::Maven => "target/site/jacoco/jacoco.csv",
        BuildEngine::Gradle => "build/reports/jacoco/test/jacocoTestReport.csv",
        BuildEngine::Android => "app/build/reports/jacoco/jacocoTestReport/jacocoTestReport.csv",
    }
}

/// Builds [`BuildReport`]s
pub struct BuildReportBuilder {
    store: Arc<dyn ReportStore>,
}

impl BuildReportBuilder {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Build the report of one build of `project_folder`
    ///
    /// Fails on an unsupported build engine and on any malformed report
    /// document; a report is never built from part of the documents.
    pub fn build(
        &self,
        output_lines: Vec<String>,
        project_folder: &Path,
        assignment: Assignment,
        submission: Option<&SubmissionRef>,
    ) -> Result<BuildReport, BuildReportError> {
        let report = BuildReport::new(output_lines, project_folder, assignment)?;
        let engine = report.engine();

        let documents = match submission {
            Some(submission) if submission.rebuild => {
                debug!("Reloading stored JUnit reports of submission {}", submission.id);
                self.store.stored_junit_reports(&submission.id)?
            }
            _ => read_junit_reports(&project_folder.join(junit_report_dir(engine)))?,
        };

        let flavor = engine.report_flavor();
        let mut junit_results = Vec::with_capacity(documents.len());
        for document in &documents {
            let results = drop_junit::parse(flavor, &document.xml).map_err(|source| BuildReportError::JUnit {
                name: document.file_name.clone(),
                source,
            })?;
            junit_results.push(results);
        }

        if let Some(submission) = submission.filter(|s| !s.rebuild) {
            for document in documents {
                self.store.save_junit_report(&submission.id, document)?;
            }
        }

        let coverage = read_coverage(&project_folder.join(coverage_report_path(engine)))?;
        let test_methods = self.store.test_methods(&report.assignment().id)?;

        info!(
            "Built {} report for assignment {}: {} test classes, coverage {}",
            engine,
            report.assignment().id,
            junit_results.len(),
            if coverage.is_some() { "present" } else { "absent" }
        );

        Ok(report
            .with_junit_results(junit_results)
            .with_coverage(coverage)
            .with_test_methods(test_methods))
    }
}

/// `TEST-*.xml` files of a report directory, sorted by file name
///
/// A missing directory means no tests ran.
pub fn read_junit_reports(dir: &Path) -> Result<Vec<StoredReport>, BuildReportError> {
    if !dir.is_dir() {
        debug!("No JUnit report directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let mut reports = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !entry.file_type().is_file() || !file_name.starts_with("TEST-") || !file_name.ends_with(".xml") {
            continue;
        }
        let xml = read(entry.path())?;
        reports.push(StoredReport { file_name, xml });
    }
    Ok(reports)
}

fn read_coverage(path: &Path) -> Result<Option<drop_coverage::CoverageReport>, BuildReportError> {
    if !path.is_file() {
        return Ok(None);
    }
    let csv = read(path)?;
    drop_coverage::parse(&csv)
        .map(Some)
        .map_err(|source| BuildReportError::Coverage {
            path: path.to_path_buf(),
            source,
        })
}

fn read(path: &Path) -> Result<String, BuildReportError> {
    fs::read_to_string(path).map_err(|source| BuildReportError::Io {
        path: PathBuf::from(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_dirs_per_engine() {
        assert_eq!(junit_report_dir(BuildEngine::Maven), "target/surefire-reports");
        assert!(coverage_report_path(BuildEngine::Gradle).ends_with(".csv"));
    }

    #[test]
    fn test_read_junit_reports_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("TEST-b.xml"), "<b/>").unwrap();
        fs::write(dir.path().join("TEST-a.xml"), "<a/>").unwrap();
        fs::write(dir.path().join("a.txt"), "summary").unwrap();
        fs::write(dir.path().join("other.xml"), "<x/>").unwrap();

        let reports = read_junit_reports(dir.path()).unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["TEST-a.xml", "TEST-b.xml"]);
        assert_eq!(reports[0].xml, "<a/>");
    }

    #[test]
    fn test_missing_report_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(read_junit_reports(&dir.path().join("target/surefire-reports"))
            .unwrap()
            .is_empty());
    }
}
