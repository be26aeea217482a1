//! Evaluation of a captured build, as the `evaluate` command runs it

mod fixtures;

use drop_grader::{
    Assignment, BuildEngine, IndicatorKey, IndicatorValue, MemoryReportStore, Orchestrator, ReplayRunner,
    SubmissionRef, SubmissionStatus, TestVisibility,
};
use fixtures::*;
use std::sync::Arc;

fn sample_assignment() -> Assignment {
    Assignment::from_file(&fixture_path("assignment.toml")).unwrap()
}

#[test]
fn test_sample_assignment_file() {
    let assignment = sample_assignment();
    assert_eq!(assignment.engine(), Ok(BuildEngine::Maven));
    assert_eq!(assignment.package_prefix(), PACKAGE);
    assert_eq!(assignment.hidden_visibility(), TestVisibility::ShowProgress);
    assert_eq!(assignment.test_methods, teacher_inventory());
}

#[test]
fn test_replayed_build_evaluation() {
    let project = ProjectFolder::new(BuildEngine::Maven).with_junit(&[TEACHER_REPORT, HIDDEN_REPORT, STUDENT_REPORT]);
    let assignment = sample_assignment();
    let store = MemoryReportStore::new();
    store.register_assignment(&assignment).unwrap();
    let runner = ReplayRunner::new(fixture_path("logs/maven-java-success.log"));

    let evaluation = Orchestrator::new(Arc::new(runner), Arc::new(store.clone()))
        .evaluate(project.path(), &assignment, &SubmissionRef::new("local"))
        .unwrap();

    assert_eq!(evaluation.status, SubmissionStatus::Validated);
    assert!(evaluation.output.starts_with("[INFO] Scanning for projects..."));

    // progress is shown for hidden tests under SHOW_PROGRESS
    let visible = evaluation.visible_to_student();
    let hidden = visible.indicator(IndicatorKey::HiddenUnitTests).unwrap();
    assert_eq!(hidden.value, IndicatorValue::Nok);
    assert_eq!((hidden.progress, hidden.goal), (Some(1), Some(2)));

    let json = serde_json::to_value(&visible).unwrap();
    assert_eq!(json["status"], "VALIDATED");
    assert_eq!(json["indicators"][0]["key"], "COMPILATION");
}

#[test]
fn test_replayed_timeout() {
    let project = ProjectFolder::new(BuildEngine::Maven);
    let runner = ReplayRunner::new(fixture_path("logs/maven-java-success.log")).expired_by_timeout(true);

    let evaluation = Orchestrator::new(Arc::new(runner), Arc::new(MemoryReportStore::new()))
        .evaluate(project.path(), &sample_assignment(), &SubmissionRef::new("local"))
        .unwrap();

    assert_eq!(evaluation.status, SubmissionStatus::AbortedByTimeout);
    assert_eq!(evaluation.status.code(), "AT");
}

#[test]
fn test_replayed_output_overflow() {
    let project = ProjectFolder::new(BuildEngine::Maven);
    let runner = ReplayRunner::new(fixture_path("logs/maven-java-success.log")).max_output_lines(Some(10));

    let evaluation = Orchestrator::new(Arc::new(runner), Arc::new(MemoryReportStore::new()))
        .evaluate(project.path(), &sample_assignment(), &SubmissionRef::new("local"))
        .unwrap();

    assert_eq!(evaluation.status, SubmissionStatus::TooMuchOutput);
}
