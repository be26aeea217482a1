//! Android (Gradle plugin) console conventions

use super::diagnostics::{folder_prefix, EngineDiagnostics, MarkerTable};
use super::gradle::{marker_table, GradleLayout};
use crate::assignment::{BuildEngine, Language};
use std::path::Path;

const ANDROID: GradleLayout = GradleLayout {
    task_prefix: ":app:",
    source_root: "app/src",
    tolerated_tasks: r"(compile\w*|test\w*)",
};

/// Kotlin sources of Android projects often live under `java/`
const SOURCE_FOLDERS: &[&str] = &["java", "kotlin"];

/// Diagnostics for Android builds; no style checker is configured for them
#[derive(Debug, Clone)]
pub struct AndroidDiagnostics {
    table: MarkerTable,
}

impl AndroidDiagnostics {
    pub fn new(language: Language, project_folder: &Path) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            table: marker_table(ANDROID, language, &folder_prefix(project_folder), SOURCE_FOLDERS)?,
        })
    }
}

impl EngineDiagnostics for AndroidDiagnostics {
    fn engine(&self) -> BuildEngine {
        BuildEngine::Android
    }

    fn execution_failed(&self, output: &[String]) -> bool {
        self.table.fatal.matches(output)
    }

    fn compilation_errors(&self, output: &[String]) -> Vec<String> {
        self.table.compilation_errors(output)
    }

    fn checkstyle_validation_active(&self, _output: &[String]) -> bool {
        false
    }

    fn checkstyle_errors(&self, _output: &[String]) -> Vec<String> {
        Vec::new()
    }
}
