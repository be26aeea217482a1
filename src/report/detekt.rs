//! Readable messages for detekt findings
//!
//! detekt reports findings by rule id; students get a sentence instead.

const RULE_MESSAGES: &[(&str, &str)] = &[
    ("VariableNaming", "Variable names must start with a lowercase letter (camelCase)"),
    ("FunctionNaming", "Function names must start with a lowercase letter (camelCase)"),
    ("FunctionParameterNaming", "Parameter names must start with a lowercase letter (camelCase)"),
    ("ClassNaming", "Class names must start with an uppercase letter (PascalCase)"),
    ("ObjectPropertyNaming", "Constant names must be written in UPPER_CASE"),
    ("TopLevelPropertyNaming", "Top-level constants must be written in UPPER_CASE"),
    ("MagicNumber", "Avoid magic numbers, use a named constant"),
    ("MaxLineLength", "Line is too long"),
    ("EmptyFunctionBlock", "Function body is empty"),
    ("EmptyIfBlock", "If block is empty"),
    ("EmptyElseBlock", "Else block is empty"),
    ("UnusedPrivateMember", "Private member is never used"),
    ("UnusedImports", "Import is never used"),
    ("WildcardImport", "Wildcard imports are not allowed"),
    ("ComplexCondition", "Condition is too complex"),
    ("LongMethod", "Function is too long"),
    ("LongParameterList", "Function has too many parameters"),
    ("NestedBlockDepth", "Too many nested blocks"),
    ("ReturnCount", "Too many return statements"),
    ("ForbiddenComment", "Comment contains a forbidden marker (TODO, FIXME, STOPSHIP)"),
    ("OptionalUnit", "Unnecessary explicit Unit return type"),
    ("VarCouldBeVal", "Variable is never reassigned, use val"),
];

/// Replace the rule id of a finding with a readable message.
///
/// Handles the Maven plugin form
/// (`VariableNaming - [X] at Main.kt:3:9 - Signature=...`) and the Gradle
/// form (`Main.kt:3:9: Private property name ... [VariableNaming]`).
/// Unknown rules are returned unchanged, minus the signature.
pub fn translate(finding: &str) -> String {
    let finding = match finding.find(" - Signature=") {
        Some(idx) => &finding[..idx],
        None => finding,
    };

    for (rule, message) in RULE_MESSAGES {
        if let Some(rest) = finding.strip_prefix(&format!("{} - ", rule)) {
            return format!("{} - {}", message, rest);
        }
        if let Some(body) = finding.strip_suffix(&format!(" [{}]", rule)) {
            let location = body.split_once(": ").map(|(loc, _)| loc).unwrap_or(body);
            return format!("{}: {}", location, message);
        }
    }

    finding.to_string()
}
