//! Stack-trace helpers.

/// Remove the stack frames (`at ...` lines) that belong to `package_prefix`.
///
/// Non-frame lines such as the exception message and `Caused by:` headers are
/// kept. An empty prefix leaves the trace unchanged.
pub fn filter_stacktrace(stacktrace: &str, package_prefix: &str) -> String {
    if package_prefix.is_empty() {
        return stacktrace.to_string();
    }

    stacktrace
        .lines()
        .filter(|line| match frame_target(line) {
            Some(target) => !in_package(target, package_prefix),
            None => true,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Line number of the frame pointing at `<class_name>.<method_name>`, if any.
pub fn test_method_line(stacktrace: &str, class_name: &str, method_name: &str) -> Option<u32> {
    let frame = format!("{}.{}(", class_name, method_name);
    stacktrace
        .lines()
        .filter_map(frame_target)
        .find(|target| target.starts_with(&frame))
        .and_then(|target| {
            let location = target.rsplit_once(':')?.1;
            location.trim_end_matches(')').parse().ok()
        })
}

fn frame_target(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix("at ")
}

fn in_package(target: &str, package_prefix: &str) -> bool {
    match target.strip_prefix(package_prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.') || package_prefix.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = "java.lang.AssertionError: expected:<3> but was:<2>\n\
\tat org.junit.Assert.fail(Assert.java:88)\n\
\tat org.junit.Assert.assertEquals(Assert.java:645)\n\
\tat org.dropproject.samples.Main.sum(Main.java:7)\n\
\tat org.dropproject.samples.TestTeacherProject.testSum(TestTeacherProject.java:14)";

    #[test]
    fn test_filter_removes_package_frames() {
        let filtered = filter_stacktrace(TRACE, "org.dropproject.samples");
        assert!(filtered.starts_with("java.lang.AssertionError"));
        assert!(filtered.contains("org.junit.Assert.fail"));
        assert!(!filtered.contains("org.dropproject.samples"));
    }

    #[test]
    fn test_filter_requires_package_boundary() {
        let filtered = filter_stacktrace(TRACE, "org.dropproject.sam");
        assert_eq!(filtered, TRACE);
    }

    #[test]
    fn test_empty_prefix_keeps_trace() {
        assert_eq!(filter_stacktrace(TRACE, ""), TRACE);
    }

    #[test]
    fn test_method_line_found() {
        assert_eq!(
            test_method_line(TRACE, "org.dropproject.samples.TestTeacherProject", "testSum"),
            Some(14)
        );
        assert_eq!(
            test_method_line(TRACE, "org.dropproject.samples.TestTeacherProject", "testOther"),
            None
        );
    }
}
