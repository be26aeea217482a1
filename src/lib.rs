//! drop-grader - build-report evaluation for programming assignments
//!
//! Turns the console output of a Maven, Gradle or Android build, together
//! with the JUnit and JaCoCo reports it wrote, into an assignment-aware
//! evaluation: compilation and style verdicts, per-category test summaries
//! and the indicators shown to the submitter.

pub mod assignment;
pub mod builder;
pub mod orchestrator;
pub mod replay;
pub mod report;
pub mod store;

pub use assignment::{Assignment, AssignmentTestMethod, BuildEngine, ConfigError, Language, TestVisibility};
pub use builder::{BuildReportBuilder, SubmissionRef};
pub use orchestrator::{
    BuildOutcome, BuildRunner, Evaluation, Indicator, IndicatorKey, IndicatorValue, Orchestrator,
    OrchestratorError, RunMode, RunnerError, SubmissionStatus,
};
pub use replay::ReplayRunner;
pub use report::{BuildReport, BuildReportError, JUnitSummary};
pub use store::{MemoryReportStore, ReportStore, StoreError, StoredReport};
