//! Coverage model.

use serde::{Deserialize, Serialize};

/// Missed/covered pair for one JaCoCo counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub missed: u64,
    pub covered: u64,
}

impl Counter {
    pub fn new(missed: u64, covered: u64) -> Self {
        Self { missed, covered }
    }

    pub fn total(&self) -> u64 {
        self.missed + self.covered
    }

    /// Covered share as a rounded percentage; `None` when nothing was counted.
    pub fn percent(&self) -> Option<u32> {
        if self.total() == 0 {
            return None;
        }
        Some(((self.covered as f64 * 100.0) / self.total() as f64).round() as u32)
    }
}

impl std::ops::Add for Counter {
    type Output = Counter;

    fn add(self, other: Counter) -> Counter {
        Counter::new(self.missed + other.missed, self.covered + other.covered)
    }
}

/// Coverage of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCoverage {
    pub package: String,
    pub class: String,
    pub instructions: Counter,
    pub branches: Counter,
    pub lines: Counter,
    pub methods: Counter,
}

/// Coverage of a whole build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub classes: Vec<ClassCoverage>,
}

impl CoverageReport {
    pub fn lines(&self) -> Counter {
        self.total(|c| c.lines)
    }

    pub fn branches(&self) -> Counter {
        self.total(|c| c.branches)
    }

    pub fn instructions(&self) -> Counter {
        self.total(|c| c.instructions)
    }

    /// Line coverage percentage, the figure shown to students.
    pub fn line_coverage_percent(&self) -> Option<u32> {
        self.lines().percent()
    }

    pub fn branch_coverage_percent(&self) -> Option<u32> {
        self.branches().percent()
    }

    fn total(&self, counter: impl Fn(&ClassCoverage) -> Counter) -> Counter {
        self.classes
            .iter()
            .map(counter)
            .fold(Counter::default(), |acc, c| acc + c)
    }
}
