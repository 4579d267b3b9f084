//! Issues, per-check results and summaries

use atdd_rules::{CheckCategory, Severity};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// One rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Rule id from the catalog
    pub rule: &'static str,
    /// Error or warning
    pub severity: Severity,
    /// Human-readable explanation
    pub message: String,
    /// 1-based source line
    pub line: usize,
}

impl Issue {
    /// Error-severity issue
    #[must_use]
    pub fn error(rule: &'static str, message: impl Into<String>, line: usize) -> Self {
        Self {
            rule,
            severity: Severity::Error,
            message: message.into(),
            line: line.max(1),
        }
    }

    /// Warning-severity issue
    #[must_use]
    pub fn warning(rule: &'static str, message: impl Into<String>, line: usize) -> Self {
        Self {
            rule,
            severity: Severity::Warning,
            message: message.into(),
            line: line.max(1),
        }
    }

    /// Blocks acceptance
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} [{}] {}",
            self.line, self.severity, self.rule, self.message
        )
    }
}

/// Issues of every check, keyed by category in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    checks: IndexMap<CheckCategory, Vec<Issue>>,
}

impl ValidationResult {
    /// Empty result
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the issues of one check, replacing earlier ones
    pub fn insert(&mut self, category: CheckCategory, issues: Vec<Issue>) {
        self.checks.insert(category, issues);
    }

    /// Issues of one check; empty when the check did not run
    #[must_use]
    pub fn get(&self, category: CheckCategory) -> &[Issue] {
        self.checks
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `(category, issues)` in execution order
    pub fn iter(&self) -> impl Iterator<Item = (CheckCategory, &[Issue])> {
        self.checks
            .iter()
            .map(|(category, issues)| (*category, issues.as_slice()))
    }

    /// All issues, check by check
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.checks.values().flatten()
    }

    /// Summary over the current issues
    #[must_use]
    pub fn summary(&self) -> Summary {
        summarize(self)
    }
}

/// Totals over a [`ValidationResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of issues
    pub total_issues: usize,
    /// Error-severity issues
    pub errors: usize,
    /// Warning-severity issues
    pub warnings: usize,
    /// No errors
    pub passed: bool,
    /// Every issue, check by check
    pub issues: Vec<Issue>,
}

impl Summary {
    /// Passed and, when `strict`, free of warnings too
    #[inline]
    #[must_use]
    pub fn accepted(&self, strict: bool) -> bool {
        self.passed && !(strict && self.warnings > 0)
    }
}

/// Count issues by severity; `passed` is derived here, never stored upstream
#[must_use]
pub fn summarize(result: &ValidationResult) -> Summary {
    let issues: Vec<Issue> = result.issues().cloned().collect();
    let errors = issues.iter().filter(|issue| issue.is_error()).count();
    Summary {
        total_issues: issues.len(),
        errors,
        warnings: issues.len() - errors,
        passed: errors == 0,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atdd_rules::ids;

    #[test]
    fn summary_counts_and_passes() {
        let mut result = ValidationResult::new();
        result.insert(
            CheckCategory::Naming,
            vec![Issue::warning(ids::TEST_NAMING_LENGTH, "long", 3)],
        );
        let summary = summarize(&result);
        assert_eq!(summary.total_issues, 1);
        assert!(summary.passed);
        assert!(!summary.accepted(true));

        result.insert(
            CheckCategory::Commit,
            vec![Issue::error(ids::FORBIDDEN_COMMIT_IN_TEST, "commit", 9)],
        );
        let summary = result.summary();
        assert_eq!((summary.errors, summary.warnings), (1, 1));
        assert!(!summary.passed);
    }

    #[test]
    fn serializes_with_category_keys() {
        let mut result = ValidationResult::new();
        result.insert(CheckCategory::ObjectLength, Vec::new());
        result.insert(
            CheckCategory::ScenarioCount,
            vec![Issue::error(ids::SCENARIO_COUNT_MISMATCH, "m", 0)],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["objectLength"], serde_json::json!([]));
        assert_eq!(json["scenarioCount"][0]["severity"], "error");
        assert_eq!(json["scenarioCount"][0]["line"], 1);

        let summary = serde_json::to_value(summarize(&result)).unwrap();
        assert_eq!(summary["totalIssues"], 1);
        assert_eq!(summary["passed"], false);
    }

    #[test]
    fn missing_category_reads_empty() {
        assert!(ValidationResult::new().get(CheckCategory::Library).is_empty());
    }
}
