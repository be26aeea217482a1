//! Evaluation of a submission from build to recorded verdict
//!
//! One [`Orchestrator::evaluate`] call is one independent unit of work:
//!
//! 1. run the build through the [`BuildRunner`]
//! 2. stop on a timed-out or overflowing build, before any report is read
//! 3. build the report and derive the indicators
//! 4. record the evaluation
//! 5. optionally re-run the submitter's tests alone for coverage, and record
//!    again with the coverage figure
//!
//! Nothing is shared between units; the runner and the store are the only
//! collaborators.

mod evaluation;
mod indicator;

pub use evaluation::{Evaluation, SubmissionStatus};
pub use indicator::{derive_indicators, Indicator, IndicatorKey, IndicatorValue};

use crate::assignment::Assignment;
use crate::builder::{BuildReportBuilder, SubmissionRef};
use crate::report::BuildReportError;
use crate::store::{ReportStore, StoreError};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

/// Which tests a build runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Compile, style-check and run every test
    Full,
    /// Run only the submitter's tests, with coverage instrumentation
    StudentTestsCoverage,
}

/// What the build tool left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub output_lines: Vec<String>,
    pub exit_code: i32,
    pub expired_by_timeout: bool,
    pub too_much_output: bool,
}

/// Build runner errors
#[derive(Debug, thiserror::Error)]
#[error("Build runner failed: {0}")]
pub struct RunnerError(pub String);

/// Runs the build tool against a project folder
///
/// Enforcing time and output limits is the runner's job; it reports them
/// through [`BuildOutcome`].
pub trait BuildRunner: Send + Sync {
    fn run(&self, project_folder: &Path, mode: RunMode) -> Result<BuildOutcome, RunnerError>;
}

/// Orchestrator errors
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Report(#[from] BuildReportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Orchestrator {
    runner: Arc<dyn BuildRunner>,
    store: Arc<dyn ReportStore>,
    builder: BuildReportBuilder,
}

impl Orchestrator {
    pub fn new(runner: Arc<dyn BuildRunner>, store: Arc<dyn ReportStore>) -> Self {
        Self {
            runner,
            builder: BuildReportBuilder::new(Arc::clone(&store)),
            store,
        }
    }

    /// Build and evaluate a submission, returning the last recorded evaluation
    pub fn evaluate(
        &self,
        project_folder: &Path,
        assignment: &Assignment,
        submission: &SubmissionRef,
    ) -> Result<Evaluation, OrchestratorError> {
        info!("Evaluating submission {} of assignment {}", submission.id, assignment.id);
        let outcome = self.runner.run(project_folder, RunMode::Full)?;
        debug!(
            "Build of submission {} exited with {} ({} lines)",
            submission.id,
            outcome.exit_code,
            outcome.output_lines.len()
        );

        let visibility = assignment.hidden_visibility();
        if outcome.expired_by_timeout {
            return self.record(submission, Evaluation::terminal(SubmissionStatus::AbortedByTimeout, String::new(), visibility));
        }
        if outcome.too_much_output {
            return self.record(submission, Evaluation::terminal(SubmissionStatus::TooMuchOutput, String::new(), visibility));
        }

        let report = self
            .builder
            .build(outcome.output_lines, project_folder, assignment.clone(), Some(submission))?;
        let mut evaluation = self.record(submission, Evaluation::from_report(&report))?;

        if evaluation.status == SubmissionStatus::Validated
            && assignment.calculate_student_tests_coverage
            && assignment.accepts_student_tests
        {
            match self.student_coverage(project_folder, assignment) {
                Ok(Some(percent)) => {
                    evaluation.student_coverage = Some(percent);
                    evaluation = self.record(submission, evaluation)?;
                }
                Ok(None) => debug!("No coverage report for submission {}", submission.id),
                Err(e) => warn!("Coverage run of submission {} failed: {}", submission.id, e),
            }
        }

        info!("Submission {}: {}", submission.id, evaluation.status);
        Ok(evaluation)
    }

    fn record(&self, submission: &SubmissionRef, evaluation: Evaluation) -> Result<Evaluation, OrchestratorError> {
        self.store.record_evaluation(&submission.id, &evaluation)?;
        Ok(evaluation)
    }

    /// Line coverage of the submitter's tests run alone
    fn student_coverage(&self, project_folder: &Path, assignment: &Assignment) -> Result<Option<u32>, OrchestratorError> {
        let outcome = self.runner.run(project_folder, RunMode::StudentTestsCoverage)?;
        if outcome.expired_by_timeout || outcome.too_much_output {
            return Err(RunnerError("coverage build did not complete".to_string()).into());
        }

        let report = self
            .builder
            .build(outcome.output_lines, project_folder, assignment.clone(), None)?;
        Ok(report.coverage().and_then(|c| c.line_coverage_percent()))
    }
}
