//! Build runner over an already captured console log

use crate::orchestrator::{BuildOutcome, BuildRunner, RunMode, RunnerError};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Replays a console log captured from an earlier build
///
/// Every run, whatever its mode, yields the same log; the reports are read
/// from the project folder as the build left them.
#[derive(Debug, Clone)]
pub struct ReplayRunner {
    log_path: PathBuf,
    expired_by_timeout: bool,
    max_output_lines: Option<usize>,
}

impl ReplayRunner {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            expired_by_timeout: false,
            max_output_lines: None,
        }
    }

    /// Report the build as aborted by its time limit
    pub fn expired_by_timeout(mut self, expired: bool) -> Self {
        self.expired_by_timeout = expired;
        self
    }

    /// Report logs longer than `max` lines as overflowing
    pub fn max_output_lines(mut self, max: Option<usize>) -> Self {
        self.max_output_lines = max;
        self
    }
}

impl BuildRunner for ReplayRunner {
    fn run(&self, _project_folder: &Path, mode: RunMode) -> Result<BuildOutcome, RunnerError> {
        debug!("Replaying {} for {:?} run", self.log_path.display(), mode);
        let log = fs::read_to_string(&self.log_path)
            .map_err(|e| RunnerError(format!("{}: {}", self.log_path.display(), e)))?;
        let output_lines: Vec<String> = log.lines().map(String::from).collect();
        let too_much_output = self.max_output_lines.is_some_and(|max| output_lines.len() > max);

        Ok(BuildOutcome {
            output_lines,
            exit_code: 0,
            expired_by_timeout: self.expired_by_timeout,
            too_much_output,
        })
    }
}
