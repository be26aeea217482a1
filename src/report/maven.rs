//! Maven console conventions

use super::detekt;
use super::diagnostics::{folder_prefix, EngineDiagnostics, FatalMarkers, MarkerTable};
use super::extract::{dedup, DiagnosticRule, EndSearch, MissingEnd, Region};
use crate::assignment::{BuildEngine, Language};
use regex_lite::Regex;
use std::path::Path;

const BUILD_FAILURE: &str = r"^\[INFO\] BUILD FAILURE";
const JAVA_COMPILATION_START: &str = r"^\[ERROR\] COMPILATION ERROR :";
const KOTLIN_COMPILATION_START: &str = r"^\[INFO\] --- kotlin-maven-plugin:\d+\.\d+\.\d+:compile";
const KOTLIN_COMPILATION_END: &str = r"^\[INFO\] (--- |BUILD )";
const KOTLIN_TEST_COMPILATION_START: &str =
    r"^\[ERROR\] Failed to execute goal org\.jetbrains\.kotlin:kotlin-maven-plugin.*test-compile";
const HELP_FOOTER: &str = r"^\[ERROR\] -> \[Help 1\]";
const CHECKSTYLE_START: &str = r"^\[INFO\] Starting audit\.\.\.";
const CHECKSTYLE_END: &str = r"^Audit done\.";
const DETEKT_START: &str = r"^\[INFO\] --- detekt-maven-plugin";
const DETEKT_END: &str = r"^(\[INFO\] --- |\[INFO\] BUILD |detekt finished)";

/// Maven's own error chatter, never a compiler message
const ERROR_NOISE: &[&str] = &[
    r"^\[ERROR\]\s*$",
    r"^\[ERROR\] Failed to execute goal",
    r"^\[ERROR\] -> \[Help 1\]",
    r"^\[ERROR\] \[Help 1\]",
    r"^\[ERROR\] To see the full stack trace",
    r"^\[ERROR\] Re-run Maven",
    r"^\[ERROR\] For more information",
    r"^\[ERROR\] COMPILATION ERROR",
];

/// Forked test JVM crashes
const CRASH_MARKERS: &[&str] = &[
    "The forked VM terminated without properly saying goodbye",
    "There was an error in the forked process",
];

/// Diagnostics for Maven builds
#[derive(Debug, Clone)]
pub struct MavenDiagnostics {
    language: Language,
    table: MarkerTable,
}

impl MavenDiagnostics {
    pub fn new(language: Language, project_folder: &Path) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            language,
            table: marker_table(language, &folder_prefix(project_folder))?,
        })
    }
}

impl EngineDiagnostics for MavenDiagnostics {
    fn engine(&self) -> BuildEngine {
        BuildEngine::Maven
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

fn compiler_rule(region: Region, folder: &str, language: Language) -> Result<DiagnosticRule, regex_lite::Error> {
    let sources = language.source_folder();
    let mut rule = DiagnosticRule::new(region).keep(r"^\[ERROR\] ")?.keep("^  ")?;
    for noise in ERROR_NOISE {
        rule = rule.skip(noise)?;
    }
    Ok(rule
        .rewrite(format!("[ERROR] file://{}/src/main/{}/", folder, sources), "")
        .rewrite(format!("[ERROR] file://{}/src/test/{}/", folder, sources), "[TEST] ")
        .rewrite(format!("[ERROR] {}/src/main/{}/", folder, sources), "")
        .rewrite(format!("[ERROR] {}/src/test/{}/", folder, sources), "[TEST] "))
}

fn marker_table(language: Language, folder: &str) -> Result<MarkerTable, regex_lite::Error> {
    let compilation = match language {
        Language::Java => vec![compiler_rule(
            Region::new(JAVA_COMPILATION_START, BUILD_FAILURE)?,
            folder,
            language,
        )?],
        Language::Kotlin => vec![
            compiler_rule(
                Region::new(KOTLIN_COMPILATION_START, KOTLIN_COMPILATION_END)?
                    .ending(EndSearch::FirstAfterStart, MissingEnd::ToEndOfOutput),
                folder,
                language,
            )?,
            compiler_rule(
                Region::new(KOTLIN_TEST_COMPILATION_START, HELP_FOOTER)?
                    .ending(EndSearch::LastInOutput, MissingEnd::ToEndOfOutput),
                folder,
                language,
            )?,
        ],
    };

    let (style_marker, style) = match language {
        Language::Java => (
            Regex::new(CHECKSTYLE_START)?,
            DiagnosticRule::new(
                Region::new(CHECKSTYLE_START, CHECKSTYLE_END)?
                    .ending(EndSearch::FirstAfterStart, MissingEnd::ToEndOfOutput),
            )
            .keep(r"^\[WARN\] ")?
            .rewrite(format!("[WARN] {}/src/main/java/", folder), ""),
        ),
        Language::Kotlin => (
            Regex::new(DETEKT_START)?,
            DiagnosticRule::new(
                Region::new(DETEKT_START, DETEKT_END)?
                    .ending(EndSearch::FirstAfterStart, MissingEnd::ToEndOfOutput),
            )
            .keep(r"^\t")?
            .skip(r"^\t- ")?
            .rewrite("\t", "")
            .rewrite(format!("{}/src/main/kotlin/", folder), ""),
        ),
    };

    let mut fatal = FatalMarkers::new(r"^\[ERROR\] Failed to execute goal ")?
        .tolerate(r"^\[ERROR\] Failed to execute goal org\.apache\.maven\.plugins:maven-surefire-plugin")?
        .tolerate(r"^\[ERROR\] Failed to execute goal org\.apache\.maven\.plugins:maven-compiler-plugin")?
        .tolerate(r"^\[ERROR\] Failed to execute goal org\.jetbrains\.kotlin:kotlin-maven-plugin")?;
    for marker in CRASH_MARKERS {
        fatal = fatal.crash(&regex_lite::escape(marker))?;
    }

    Ok(MarkerTable {
        compilation,
        style_marker: Some(style_marker),
        style: Some(style),
        fatal,
    })
}
