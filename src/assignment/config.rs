//! Assignment file loading (assignment.toml)

use super::Assignment;
use std::fs;
use std::io;
use std::path::Path;

/// Error types for assignment loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read assignment file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl Assignment {
    /// Load and validate an assignment from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate an assignment from a TOML string
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let assignment: Assignment = toml::from_str(s)?;
        assignment.validate()?;
        Ok(assignment)
    }

    /// Validate the assignment settings
    ///
    /// The build engine is not checked here: an unknown engine is reported
    /// when a build report is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Assignment 'id' cannot be empty".to_string(),
            ));
        }

        if self.min_student_tests.is_some() && !self.accepts_student_tests {
            return Err(ConfigError::ValidationError(
                "'min_student_tests' requires 'accepts_student_tests = true'".to_string(),
            ));
        }

        if self.calculate_student_tests_coverage && !self.accepts_student_tests {
            return Err(ConfigError::ValidationError(
                "'calculate_student_tests_coverage' requires 'accepts_student_tests = true'"
                    .to_string(),
            ));
        }

        if let Some(suffix) = &self.mandatory_tests_suffix {
            if suffix.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "'mandatory_tests_suffix' cannot be empty".to_string(),
                ));
            }
        }

        self.test_naming
            .check()
            .map_err(ConfigError::ValidationError)?;

        for method in &self.test_methods {
            if method.test_class.is_empty() || method.test_method.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid test method entry '{}.{}'",
                    method.test_class, method.test_method
                )));
            }
        }

        Ok(())
    }
}
