//! Marker-delimited extraction of diagnostics from console output
//!
//! Compiler and style-checker messages are buried in the build log between
//! tool-specific markers. A [`Region`] finds the slice of lines between a
//! start marker and an end marker; a [`DiagnosticRule`] then keeps the
//! message lines of that slice and strips project-path prefixes.
//!
//! A missing start marker yields no lines. "No errors" and "the tool did not
//! report" are deliberately indistinguishable.

use regex_lite::Regex;
use std::collections::HashSet;
use std::ops::Range;

/// Where to look for the end marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndSearch {
    /// Last matching line anywhere in the output
    LastInOutput,
    /// First matching line after the start marker
    FirstAfterStart,
}

/// What to do when no end marker follows the start marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEnd {
    /// No region at all
    NoRegion,
    /// The region runs to the end of the output
    ToEndOfOutput,
}

/// A start/end marker pair delimiting a region of the console output
#[derive(Debug, Clone)]
pub struct Region {
    start: Regex,
    end: Regex,
    end_search: EndSearch,
    missing_end: MissingEnd,
}

impl Region {
    /// Region from the last `start` match to the last `end` match
    pub fn new(start: &str, end: &str) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            start: Regex::new(start)?,
            end: Regex::new(end)?,
            end_search: EndSearch::LastInOutput,
            missing_end: MissingEnd::NoRegion,
        })
    }

    /// Change how the end marker is located
    pub fn ending(mut self, end_search: EndSearch, missing_end: MissingEnd) -> Self {
        self.end_search = end_search;
        self.missing_end = missing_end;
        self
    }

    /// Line range of the region, excluding both markers
    pub fn bounds(&self, lines: &[String]) -> Option<Range<usize>> {
        let start = lines.iter().rposition(|l| self.start.is_match(l))? + 1;

        let end = match self.end_search {
            EndSearch::LastInOutput => lines
                .iter()
                .rposition(|l| self.end.is_match(l))
                .filter(|&idx| idx >= start),
            EndSearch::FirstAfterStart => lines[start..]
                .iter()
                .position(|l| self.end.is_match(l))
                .map(|offset| start + offset),
        };

        match (end, self.missing_end) {
            (Some(end), _) => Some(start..end),
            (None, MissingEnd::ToEndOfOutput) => Some(start..lines.len()),
            (None, MissingEnd::NoRegion) => None,
        }
    }

    /// Lines of the region (empty when there is none)
    pub fn slice<'a>(&self, lines: &'a [String]) -> &'a [String] {
        match self.bounds(lines) {
            Some(range) => &lines[range],
            None => &[],
        }
    }
}

/// Extraction of diagnostic lines from one region
#[derive(Debug, Clone)]
pub struct DiagnosticRule {
    region: Region,
    keep: Vec<Regex>,
    skip: Vec<Regex>,
    rewrites: Vec<(String, String)>,
}

impl DiagnosticRule {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            keep: Vec::new(),
            skip: Vec::new(),
            rewrites: Vec::new(),
        }
    }

    /// Keep lines matching `pattern` (any of the keep patterns)
    pub fn keep(mut self, pattern: &str) -> Result<Self, regex_lite::Error> {
        self.keep.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Drop lines matching `pattern`, even when a keep pattern matches
    pub fn skip(mut self, pattern: &str) -> Result<Self, regex_lite::Error> {
        self.skip.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Replace every occurrence of `from` with `to` in kept lines
    pub fn rewrite(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rewrites.push((from.into(), to.into()));
        self
    }

    /// Diagnostic lines of the region, in output order
    pub fn apply(&self, lines: &[String]) -> Vec<String> {
        self.region
            .slice(lines)
            .iter()
            .filter(|l| self.keep.iter().any(|k| k.is_match(l)))
            .filter(|l| !self.skip.iter().any(|s| s.is_match(l)))
            .map(|l| {
                self.rewrites
                    .iter()
                    .fold(l.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
            })
            .collect()
    }
}

/// Remove repeated lines, keeping the first occurrence
pub fn dedup(lines: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .filter(|l| seen.insert(l.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    #[test]
    fn test_region_between_markers() {
        let output = lines("a\nSTART\nb\nc\nEND\nd");
        let region = Region::new("^START", "^END").unwrap();
        assert_eq!(region.bounds(&output), Some(2..4));
        assert_eq!(region.slice(&output), &output[2..4]);
    }

    #[test]
    fn test_last_start_wins() {
        let output = lines("START\nx\nSTART\ny\nEND");
        let region = Region::new("^START", "^END").unwrap();
        assert_eq!(region.slice(&output), &["y".to_string()]);
    }

    #[test]
    fn test_no_start_no_region() {
        let output = lines("a\nb\nEND");
        let region = Region::new("^START", "^END").unwrap();
        assert_eq!(region.bounds(&output), None);
        assert!(region.slice(&output).is_empty());
    }

    #[test]
    fn test_missing_end() {
        let output = lines("START\na\nb");
        let strict = Region::new("^START", "^END").unwrap();
        assert_eq!(strict.bounds(&output), None);

        let open = Region::new("^START", "^END")
            .unwrap()
            .ending(EndSearch::LastInOutput, MissingEnd::ToEndOfOutput);
        assert_eq!(open.bounds(&output), Some(1..3));
    }

    #[test]
    fn test_end_before_start_is_missing() {
        let output = lines("END\nSTART\na");
        let region = Region::new("^START", "^END").unwrap();
        assert_eq!(region.bounds(&output), None);
    }

    #[test]
    fn test_adjacent_end_is_empty_region() {
        let output = lines("START\nEND\nx");
        let last = Region::new("^START", "^END").unwrap();
        let first = Region::new("^START", "^END")
            .unwrap()
            .ending(EndSearch::FirstAfterStart, MissingEnd::NoRegion);
        assert_eq!(last.bounds(&output), Some(1..1));
        assert_eq!(first.bounds(&output), Some(1..1));
    }

    #[test]
    fn test_first_end_after_start() {
        let output = lines("START\na\n[INFO] one\nb\n[INFO] two");
        let region = Region::new("^START", r"^\[INFO\]")
            .unwrap()
            .ending(EndSearch::FirstAfterStart, MissingEnd::ToEndOfOutput);
        assert_eq!(region.slice(&output), &["a".to_string()]);
    }

    #[test]
    fn test_rule_keep_skip_rewrite() {
        let output = lines(
            "START\n[ERROR] /p/src/Main.java:[1,1] boom\nnoise\n[ERROR] \n  symbol: x\nEND",
        );
        let rule = DiagnosticRule::new(Region::new("^START", "^END").unwrap())
            .keep(r"^\[ERROR\] ")
            .unwrap()
            .keep("^  ")
            .unwrap()
            .skip(r"^\[ERROR\]\s*$")
            .unwrap()
            .rewrite("[ERROR] /p/src/", "");
        assert_eq!(
            rule.apply(&output),
            vec!["Main.java:[1,1] boom".to_string(), "  symbol: x".to_string()]
        );
    }

    #[test]
    fn test_dedup_keeps_order() {
        let deduped = dedup(vec!["b".into(), "a".into(), "b".into(), "c".into(), "a".into()]);
        assert_eq!(deduped, vec!["b", "a", "c"]);
    }
}
