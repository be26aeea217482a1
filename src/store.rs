//! Persistence boundary of the evaluation pipeline
//!
//! The grading service keeps submissions, assignments and evaluations in its
//! own database. The pipeline only needs the few operations of
//! [`ReportStore`]; [`MemoryReportStore`] implements them in process for the
//! CLI and for tests.

use crate::assignment::{Assignment, AssignmentTestMethod};
use crate::orchestrator::Evaluation;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Raw JUnit XML of one test class, kept so a submission can be re-evaluated
/// without re-running its build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    /// Report file name (e.g., "TEST-org.sample.TestTeacherProject.xml")
    pub file_name: String,
    pub xml: String,
}

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Operations the pipeline needs from the surrounding persistence layer
pub trait ReportStore: Send + Sync {
    /// JUnit reports stored for a submission, in file-name order
    fn stored_junit_reports(&self, submission_id: &str) -> Result<Vec<StoredReport>, StoreError>;

    /// Keep the raw XML of one report of a submission
    fn save_junit_report(&self, submission_id: &str, report: StoredReport) -> Result<(), StoreError>;

    /// Instructor test inventory of an assignment, in declared order
    fn test_methods(&self, assignment_id: &str) -> Result<Vec<AssignmentTestMethod>, StoreError>;

    /// Persist the outcome of evaluating a submission
    fn record_evaluation(&self, submission_id: &str, evaluation: &Evaluation) -> Result<(), StoreError>;
}

/// Thread-safe in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryReportStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    /// Reports by submission id
    reports: HashMap<String, Vec<StoredReport>>,
    /// Test inventories by assignment id
    test_methods: HashMap<String, Vec<AssignmentTestMethod>>,
    /// Evaluations by submission id, latest last
    evaluations: HashMap<String, Vec<Evaluation>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the test inventory declared by an assignment
    pub fn register_assignment(&self, assignment: &Assignment) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        inner
            .test_methods
            .insert(assignment.id.clone(), assignment.test_methods.clone());
        Ok(())
    }

    /// Latest evaluation recorded for a submission
    pub fn latest_evaluation(&self, submission_id: &str) -> Option<Evaluation> {
        let inner = self.inner.read().ok()?;
        inner.evaluations.get(submission_id)?.last().cloned()
    }

    /// Number of evaluations recorded for a submission
    pub fn evaluation_count(&self, submission_id: &str) -> usize {
        self.inner
            .read()
            .map(|inner| inner.evaluations.get(submission_id).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

impl ReportStore for MemoryReportStore {
    fn stored_junit_reports(&self, submission_id: &str) -> Result<Vec<StoredReport>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut reports = inner.reports.get(submission_id).cloned().unwrap_or_default();
        reports.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(reports)
    }

    fn save_junit_report(&self, submission_id: &str, report: StoredReport) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let reports = inner.reports.entry(submission_id.to_string()).or_default();
        // A rebuild of the same class replaces the earlier report
        reports.retain(|r| r.file_name != report.file_name);
        reports.push(report);
        Ok(())
    }

    fn test_methods(&self, assignment_id: &str) -> Result<Vec<AssignmentTestMethod>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.test_methods.get(assignment_id).cloned().unwrap_or_default())
    }

    fn record_evaluation(&self, submission_id: &str, evaluation: &Evaluation) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        inner
            .evaluations
            .entry(submission_id.to_string())
            .or_default()
            .push(evaluation.clone());
        Ok(())
    }
}
