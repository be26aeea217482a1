//! Gradle console conventions
//!
//! Plain Gradle and the Android plugin print the same task headers and
//! failure banners; they differ in the task path prefix and in where the
//! sources live. [`GradleLayout`] captures that difference and
//! [`marker_table`] is shared by both engines.

use super::detekt;
use super::diagnostics::{folder_prefix, EngineDiagnostics, FatalMarkers, MarkerTable};
use super::extract::{dedup, DiagnosticRule, EndSearch, MissingEnd, Region};
use crate::assignment::{BuildEngine, Language};
use regex_lite::Regex;
use std::path::Path;

/// Line closing the output of a task
const TASK_END: &str = r"^(> Task |FAILURE: |BUILD FAILED|BUILD SUCCESSFUL)";

const CRASH_MARKERS: &[&str] = &[
    r"Could not start Gradle Test Executor",
    r"Gradle Test Executor \d+ finished with non-zero exit value",
    r"Could not create the Java Virtual Machine",
    r"Process 'Gradle Test Executor \d+' finished with non-zero exit value",
];

const FAILURE: &str = r"^(Execution failed for task '|A problem occurred |Could not resolve )";

/// Where a Gradle-based project keeps its tasks and sources
#[derive(Debug, Clone, Copy)]
pub(crate) struct GradleLayout {
    /// Task path prefix (":" or ":app:")
    pub task_prefix: &'static str,
    /// Source root relative to the project folder ("src" or "app/src")
    pub source_root: &'static str,
    /// Tasks whose failure is an ordinary build failure
    pub tolerated_tasks: &'static str,
}

pub(crate) const GRADLE: GradleLayout = GradleLayout {
    task_prefix: ":",
    source_root: "src",
    tolerated_tasks: r"(compile\w*|test\w*|checkstyle\w*|detekt\w*)",
};

/// Diagnostics for plain Gradle builds
#[derive(Debug, Clone)]
pub struct GradleDiagnostics {
    language: Language,
    table: MarkerTable,
}

impl GradleDiagnostics {
    pub fn new(language: Language, project_folder: &Path) -> Result<Self, regex_lite::Error> {
        let folder = folder_prefix(project_folder);
        let mut table = marker_table(GRADLE, language, &folder, &[language.source_folder()])?;
        let (marker, style) = style_rule(language, &folder)?;
        table.style_marker = Some(marker);
        table.style = Some(style);
        Ok(Self { language, table })
    }
}

impl EngineDiagnostics for GradleDiagnostics {
    fn engine(&self) -> BuildEngine {
        BuildEngine::Gradle
    }

    fn execution_failed(&self, output: &[String]) -> bool {
        self.table.fatal.matches(output)
    }

    fn compilation_errors(&self, output: &[String]) -> Vec<String> {
        self.table.compilation_errors(output)
    }

    fn checkstyle_validation_active(&self, output: &[String]) -> bool {
        self.table.style_active(output)
    }

    fn checkstyle_errors(&self, output: &[String]) -> Vec<String> {
        let lines = self.table.style_lines(output);
        match self.language {
            Language::Java => dedup(lines),
            Language::Kotlin => dedup(lines.iter().map(|l| detekt::translate(l)).collect()),
        }
    }
}

/// Compilation and fatal markers for a Gradle-based layout, without any
/// style tool
pub(crate) fn marker_table(
    layout: GradleLayout,
    language: Language,
    folder: &str,
    source_folders: &[&str],
) -> Result<MarkerTable, regex_lite::Error> {
    let start = format!(r"^> Task {}compile\w*(Java|Kotlin)", regex_lite::escape(layout.task_prefix));
    let region = Region::new(&start, TASK_END)?.ending(EndSearch::FirstAfterStart, MissingEnd::ToEndOfOutput);

    let mut rule = match language {
        Language::Java => DiagnosticRule::new(region)
            .keep(": error: ")?
            .keep(r"^\s+symbol:")?
            .keep(r"^\s+location:")?,
        Language::Kotlin => DiagnosticRule::new(region).keep("^e: ")?,
    };
    for sources in source_folders {
        let main = format!("{}/{}/main/{}/", folder, layout.source_root, sources);
        let test = format!("{}/{}/test/{}/", folder, layout.source_root, sources);
        rule = match language {
            Language::Java => rule.rewrite(main, "").rewrite(test, "[TEST] "),
            Language::Kotlin => rule
                .rewrite(format!("e: file://{}", main), "")
                .rewrite(format!("e: file://{}", test), "[TEST] ")
                .rewrite(format!("e: {}", main), "")
                .rewrite(format!("e: {}", test), "[TEST] "),
        };
    }

    let mut fatal = FatalMarkers::new(FAILURE)?.tolerate(&format!(
        r"^Execution failed for task '{}{}'",
        regex_lite::escape(layout.task_prefix),
        layout.tolerated_tasks
    ))?;
    for marker in CRASH_MARKERS {
        fatal = fatal.crash(marker)?;
    }

    Ok(MarkerTable {
        compilation: vec![rule],
        style_marker: None,
        style: None,
        fatal,
    })
}

fn style_rule(language: Language, folder: &str) -> Result<(Regex, DiagnosticRule), regex_lite::Error> {
    Ok(match language {
        Language::Java => {
            let start = r"^> Task :checkstyleMain";
            let rule = DiagnosticRule::new(
                Region::new(start, TASK_END)?.ending(EndSearch::FirstAfterStart, MissingEnd::ToEndOfOutput),
            )
            .keep(r"^\[ant:checkstyle\] \[(WARN|ERROR)\] ")?
            .rewrite(format!("[ant:checkstyle] [WARN] {}/src/main/java/", folder), "")
            .rewrite(format!("[ant:checkstyle] [ERROR] {}/src/main/java/", folder), "");
            (Regex::new(start)?, rule)
        }
        Language::Kotlin => {
            let start = r"^> Task :detekt";
            let rule = DiagnosticRule::new(
                Region::new(start, TASK_END)?.ending(EndSearch::FirstAfterStart, MissingEnd::ToEndOfOutput),
            )
            .keep(r"\.kt:\d+:\d+")?
            .rewrite(format!("{}/src/main/kotlin/", folder), "");
            (Regex::new(start)?, rule)
        }
    })
}
