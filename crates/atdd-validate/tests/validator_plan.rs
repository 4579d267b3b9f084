//! Functional tests for the validator as a whole.
//!
//! Core guarantees exercised here:
//! - Checks never panic and always report lines inside the input.
//! - Parity between `[Test]` procedures and `[SCENARIO]` tags is exact.
//! - Masked regions (comments, string literals) never feed structural checks.

use atdd_test_utils::{line_of, CodeunitBuilder};
use atdd_validate::{summarize, validate_all, CheckCategory, Severity};
use proptest::prelude::*;

/// Helper: a codeunit with `n` conforming tests numbered 1..=n.
fn conforming_codeunit(n: u32) -> String {
    (1..=n)
        .fold(CodeunitBuilder::new(50100, "DemoTests"), |builder, id| {
            builder.conforming_test(id)
        })
        .build()
}

/// Tenet: a well-formed codeunit passes with no issues at all.
#[test]
fn conforming_codeunit_has_no_issues() {
    let summary = summarize(&validate_all(&conforming_codeunit(4)));
    assert_eq!(summary.total_issues, 0, "{:#?}", summary.issues);
    assert!(summary.passed);
}

/// Tenet: a missing scenario tag is one mismatch, reported at line 1.
#[test]
fn extra_test_without_tag_is_single_mismatch() {
    let code = CodeunitBuilder::new(50100, "DemoTests")
        .conforming_test(1)
        .conforming_test(2)
        .raw("    [Test]\n    procedure T0003_Untagged()\n    begin\n    end;\n")
        .build();
    let result = validate_all(&code);
    let parity = result.get(CheckCategory::ScenarioCount);
    assert_eq!(parity.len(), 1);
    assert_eq!(parity[0].rule, "SCENARIO_COUNT_MISMATCH");
    assert_eq!(parity[0].severity, Severity::Error);
    assert_eq!(parity[0].line, 1);
}

/// Tenet: only the first numbering gap is reported.
#[test]
fn first_gap_only() {
    let code = CodeunitBuilder::new(50100, "DemoTests")
        .conforming_test(1)
        .conforming_test(3)
        .conforming_test(7)
        .build();
    let result = validate_all(&code);
    let parity = result.get(CheckCategory::ScenarioCount);
    assert_eq!(parity.len(), 1);
    assert_eq!(parity[0].severity, Severity::Warning);
    assert!(parity[0].message.contains("expected 2"));
    assert!(summarize(&result).passed);
}

/// Tenet: commit calls and keywords inside comments or strings are inert.
#[test]
fn masked_text_is_ignored() {
    let code = CodeunitBuilder::new(50100, "DemoTests")
        .raw(
            "    [Test]
    procedure T0001_Masked()
    begin
        // [SCENARIO 1] Commit() in a tag is text
        // [GIVEN] TestPermissions = Disabled
        Initialize();
        Message('end; Commit(); // [SCENARIO 9]');
        // [WHEN] begin
        // [THEN] done
    end;
",
        )
        .build();
    let summary = summarize(&validate_all(&code));
    assert_eq!(summary.total_issues, 0, "{:#?}", summary.issues);
}

/// Tenet: every issue points at the construct it is about.
#[test]
fn issues_point_at_offending_lines() {
    let code = CodeunitBuilder::new(50100, "DemoTests")
        .raw(
            "    [Test]
    procedure T0001_Chatty()
    var
        Mgt: Codeunit \"Sales Mgt\";
        Cust: Record Customer;
    begin
        // [SCENARIO 1] Chatty
        // [GIVEN] data
        // remember to clean up
        Initialize();
        // [WHEN] run
        // [THEN] ok
        Commit();
    end;
",
        )
        .build();
    let summary = summarize(&validate_all(&code));
    let found: Vec<_> = summary
        .issues
        .iter()
        .map(|issue| (issue.rule, issue.line))
        .collect();
    assert_eq!(
        found,
        [
            ("FORBIDDEN_COMMENT", line_of(&code, "remember to clean up")),
            ("FORBIDDEN_COMMIT_IN_TEST", line_of(&code, "Commit();")),
            ("VARIABLE_ORDER", line_of(&code, "Cust: Record")),
        ]
    );
}

proptest! {
    /// Tenet: checks are total over arbitrary text and cite real lines.
    #[test]
    fn never_panics_and_lines_in_range(code in "[ -~\n]{0,400}") {
        let result = validate_all(&code);
        let line_count = code.lines().count().max(1);
        for issue in result.issues() {
            prop_assert!(issue.line >= 1);
            prop_assert!(issue.line <= line_count);
        }
    }

    /// Tenet: parity holds for any number of conforming tests.
    #[test]
    fn parity_for_any_count(n in 0u32..25) {
        let result = validate_all(&conforming_codeunit(n));
        prop_assert!(result.get(CheckCategory::ScenarioCount).is_empty());
    }

    /// Tenet: `passed` is derived from error count alone.
    #[test]
    fn passed_iff_no_errors(code in "[ -~\n]{0,300}") {
        let summary = summarize(&validate_all(&code));
        prop_assert_eq!(summary.passed, summary.errors == 0);
        prop_assert_eq!(summary.total_issues, summary.errors + summary.warnings);
    }
}
