//! Engine-specific reading of the console output
//!
//! The aggregation in [`BuildReport`](super::BuildReport) is engine-agnostic;
//! everything that depends on the textual conventions of a build tool sits
//! behind [`EngineDiagnostics`]. The engines differ only in their marker
//! tables ([`MarkerTable`]).

use super::android::AndroidDiagnostics;
use super::extract::{dedup, DiagnosticRule};
use super::gradle::GradleDiagnostics;
use super::maven::MavenDiagnostics;
use crate::assignment::{BuildEngine, Language};
use regex_lite::Regex;
use std::fmt;
use std::path::Path;

/// What a build engine's console output says about the build itself
pub trait EngineDiagnostics: fmt::Debug + Send + Sync {
    /// Engine these diagnostics read
    fn engine(&self) -> BuildEngine;

    /// The toolchain itself failed (e.g., the test JVM crashed); no report
    /// data can be trusted
    fn execution_failed(&self, output: &[String]) -> bool;

    /// Compiler diagnostics, project paths stripped
    fn compilation_errors(&self, output: &[String]) -> Vec<String>;

    /// Whether a style checker ran at all
    fn checkstyle_validation_active(&self, output: &[String]) -> bool;

    /// Style-checker findings, translated and de-duplicated
    fn checkstyle_errors(&self, output: &[String]) -> Vec<String>;
}

/// Markers telling a toolchain crash apart from ordinary build failures
#[derive(Debug, Clone)]
pub struct FatalMarkers {
    /// Any match means the toolchain crashed
    crash: Vec<Regex>,
    /// Lines reporting a failed build step
    failure: Regex,
    /// Failed steps that are ordinary compile/test/style failures
    tolerated: Vec<Regex>,
}

impl FatalMarkers {
    pub fn new(failure: &str) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            crash: Vec::new(),
            failure: Regex::new(failure)?,
            tolerated: Vec::new(),
        })
    }

    pub fn crash(mut self, pattern: &str) -> Result<Self, regex_lite::Error> {
        self.crash.push(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn tolerate(mut self, pattern: &str) -> Result<Self, regex_lite::Error> {
        self.tolerated.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// True if the toolchain crashed or a step other than the tolerated ones failed
    pub fn matches(&self, output: &[String]) -> bool {
        if output.iter().any(|l| self.crash.iter().any(|c| c.is_match(l))) {
            return true;
        }
        output
            .iter()
            .filter(|l| self.failure.is_match(l))
            .any(|l| !self.tolerated.iter().any(|t| t.is_match(l)))
    }
}

/// The markers of one (engine, language) combination
#[derive(Debug, Clone)]
pub struct MarkerTable {
    pub compilation: Vec<DiagnosticRule>,
    /// Line showing the style checker ran; `None` when no style tool is configured
    pub style_marker: Option<Regex>,
    pub style: Option<DiagnosticRule>,
    pub fatal: FatalMarkers,
}

impl MarkerTable {
    pub fn compilation_errors(&self, output: &[String]) -> Vec<String> {
        dedup(
            self.compilation
                .iter()
                .flat_map(|rule| rule.apply(output))
                .collect(),
        )
    }

    pub fn style_active(&self, output: &[String]) -> bool {
        match &self.style_marker {
            Some(marker) => output.iter().any(|l| marker.is_match(l)),
            None => false,
        }
    }

    /// Raw style lines, before any engine-specific translation
    pub fn style_lines(&self, output: &[String]) -> Vec<String> {
        match &self.style {
            Some(rule) => rule.apply(output),
            None => Vec::new(),
        }
    }
}

/// Path prefix of a project folder, as printed by the build tools
pub(crate) fn folder_prefix(project_folder: &Path) -> String {
    project_folder
        .to_string_lossy()
        .trim_end_matches('/')
        .to_string()
}

/// Diagnostics for `engine`, reading `language` sources under `project_folder`
pub fn for_engine(
    engine: BuildEngine,
    language: Language,
    project_folder: &Path,
) -> Result<Box<dyn EngineDiagnostics>, regex_lite::Error> {
    Ok(match engine {
        BuildEngine::Maven => Box::new(MavenDiagnostics::new(language, project_folder)?),
        BuildEngine::Gradle => Box::new(GradleDiagnostics::new(language, project_folder)?),
        BuildEngine::Android => Box::new(AndroidDiagnostics::new(language, project_folder)?),
    })
}
