//! Test fixtures
//!
//! This module provides:
//! - Captured console logs of Maven and Gradle builds (`logs/`)
//! - Surefire and Gradle JUnit XML reports (`junit/`)
//! - A JaCoCo CSV report (`coverage/`)
//! - Temporary project folders laid out the way each build engine leaves them
//! - A scripted build runner for orchestrator tests

#![allow(dead_code)]

use drop_grader::builder::{coverage_report_path, junit_report_dir};
use drop_grader::{
    Assignment, AssignmentTestMethod, BuildEngine, BuildOutcome, BuildRunner, Language, RunMode, RunnerError,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

pub const PACKAGE: &str = "org.dropproject.samples";

pub const TEACHER_REPORT: &str = "TEST-org.dropproject.samples.TestTeacherProject.xml";
pub const HIDDEN_REPORT: &str = "TEST-org.dropproject.samples.TestTeacherHiddenProject.xml";
pub const STUDENT_REPORT: &str = "TEST-org.dropproject.samples.TestProject.xml";
pub const COUNTING_REPORT: &str = "TEST-org.dropproject.samples.TestCounting.xml";
pub const TWO_SUITES_REPORT: &str = "TEST-two-suites.xml";

/// Path of a file under `tests/fixtures`
pub fn fixture_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(relative)
}

pub fn read_fixture(relative: &str) -> String {
    fs::read_to_string(fixture_path(relative)).unwrap()
}

/// Lines of a captured console log
pub fn log_lines(name: &str) -> Vec<String> {
    read_fixture(&format!("logs/{}", name)).lines().map(String::from).collect()
}

/// Directory of the JUnit fixtures written by `engine`
fn junit_fixture_dir(engine: BuildEngine) -> &'static str {
    match engine {
        BuildEngine::Maven => "junit/surefire",
        BuildEngine::Gradle | BuildEngine::Android => "junit/gradle",
    }
}

pub fn junit_xml(engine: BuildEngine, name: &str) -> String {
    read_fixture(&format!("{}/{}", junit_fixture_dir(engine), name))
}

/// Assignment in the sample package with the default test naming
pub fn assignment(engine: BuildEngine, language: Language) -> Assignment {
    let mut assignment = Assignment::new("sampleProject", engine, language);
    assignment.package_name = Some(PACKAGE.to_string());
    assignment
}

/// The instructor tests of the surefire fixtures
pub fn teacher_inventory() -> Vec<AssignmentTestMethod> {
    vec![
        AssignmentTestMethod::new("TestTeacherProject", "testFuncaoParaTestar"),
        AssignmentTestMethod::new("TestTeacherProject", "testFuncaoLentaParaTestar_MANDATORY"),
        AssignmentTestMethod::new("TestTeacherProject", "testSomaNegativos"),
        AssignmentTestMethod::new("TestTeacherHiddenProject", "testHidden_MANDATORY"),
        AssignmentTestMethod::new("TestTeacherHiddenProject", "testHiddenDivisao"),
    ]
}

/// A temporary project folder as a build leaves it
pub struct ProjectFolder {
    dir: TempDir,
    engine: BuildEngine,
}

impl ProjectFolder {
    pub fn new(engine: BuildEngine) -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            engine,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy JUnit fixtures into the engine's report directory
    pub fn with_junit(self, names: &[&str]) -> Self {
        for name in names {
            let xml = junit_xml(self.engine, name);
            self.write_junit(name, &xml);
        }
        self
    }

    /// Write a JUnit report into the engine's report directory
    pub fn write_junit(&self, file_name: &str, xml: &str) {
        let dir = self.dir.path().join(junit_report_dir(self.engine));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file_name), xml).unwrap();
    }

    /// Copy the JaCoCo fixture to the engine's coverage report path
    pub fn with_coverage(self) -> Self {
        self.write_coverage(&read_fixture("coverage/jacoco.csv"));
        self
    }

    pub fn write_coverage(&self, csv: &str) {
        let path = self.dir.path().join(coverage_report_path(self.engine));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, csv).unwrap();
    }
}

/// Completed build with the given console output
pub fn completed(output_lines: Vec<String>) -> BuildOutcome {
    BuildOutcome {
        output_lines,
        exit_code: 0,
        expired_by_timeout: false,
        too_much_output: false,
    }
}

/// Build runner answering each mode with a fixed outcome, and recording calls
#[derive(Default)]
pub struct ScriptedRunner {
    outcomes: HashMap<String, Result<BuildOutcome, String>>,
    calls: Mutex<Vec<RunMode>>,
}

fn mode_key(mode: RunMode) -> String {
    format!("{:?}", mode)
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, mode: RunMode, outcome: BuildOutcome) -> Self {
        self.outcomes.insert(mode_key(mode), Ok(outcome));
        self
    }

    pub fn failing(mut self, mode: RunMode, message: &str) -> Self {
        self.outcomes.insert(mode_key(mode), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RunMode> {
        self.calls.lock().unwrap().clone()
    }
}

impl BuildRunner for ScriptedRunner {
    fn run(&self, _project_folder: &Path, mode: RunMode) -> Result<BuildOutcome, RunnerError> {
        self.calls.lock().unwrap().push(mode);
        match self.outcomes.get(&mode_key(mode)) {
            Some(Ok(outcome)) => Ok(outcome.clone()),
            Some(Err(message)) => Err(RunnerError(message.clone())),
            None => Err(RunnerError(format!("no outcome scripted for {:?}", mode))),
        }
    }
}
