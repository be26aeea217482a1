//! JUnit report model and parser for graded submissions.
//!
//! Each build produces one XML report per executed test class. The parser
//! turns a report into [`JUnitResults`]; the category predicates on
//! [`JUnitResults`] decide whether a class holds student, teacher or hidden
//! tests.

mod category;
mod parser;
mod result;
mod stacktrace;

pub use category::{TestCategory, TestNaming};
pub use parser::{parse, JUnitParseError, ReportFlavor};
pub use result::{JUnitMethodResult, JUnitResults, TestOutcome};
pub use stacktrace::{filter_stacktrace, test_method_line};
