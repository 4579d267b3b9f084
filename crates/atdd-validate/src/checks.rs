//! The eight convention checks
//!
//! Each public `check_*` takes raw AL source and never fails; malformed input
//! simply yields fewer matches. [`validate_all`] scans the source once and
//! runs every check against the shared scan.

use crate::report::{Issue, ValidationResult};
use crate::scan::{scan_routines, scan_var_blocks, Routine, RoutineKind, VarBlock};
use crate::source::{Comment, SourceText};
use atdd_rules::{ids, CheckCategory};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Longest test procedure name before a warning
pub const MAX_TEST_NAME_LEN: usize = 120;

/// Longest object name
pub const MAX_OBJECT_NAME_LEN: usize = 30;

/// Canonical order of declared types inside a `var` block
pub const TYPE_ORDER: [&str; 13] = [
    "Record",
    "Report",
    "Codeunit",
    "XmlPort",
    "Page",
    "Query",
    "Notification",
    "BigText",
    "DateFormula",
    "RecordId",
    "RecordRef",
    "FieldRef",
    "FilterPageBuilder",
];

/// Comment openers allowed inside a test body
pub const STRUCTURAL_TAGS: [&str; 4] = ["[SCENARIO", "[GIVEN]", "[WHEN]", "[THEN]"];

static TEST_NAME_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^T\d{4}_").unwrap());

static PERMISSIONS_DISABLED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bTestPermissions\s*=\s*Disabled\b").unwrap());

static COMMIT_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bCommit\s*\(").unwrap());

static OBJECT_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(codeunit|table|page|report|xmlport|query|enum)\s+\d+\s+("[^"\n]*"|[A-Za-z0-9_]+)"#,
    )
    .unwrap()
});

static SCENARIO_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[SCENARIO\s+(\d+)\]").unwrap());

static LIBRARY_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bLibrary[A-Za-z0-9_]+\s*:").unwrap());

static LIBRARY_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bcodeunit\s+\d+\s+"?Library"#).unwrap());

/// One scan of the source shared by all checks
#[derive(Debug)]
pub struct Analysis<'a> {
    source: SourceText<'a>,
    routines: Vec<Routine>,
    var_blocks: Vec<VarBlock>,
}

impl<'a> Analysis<'a> {
    /// Mask and scan `code`
    #[must_use]
    pub fn new(code: &'a str) -> Self {
        let source = SourceText::new(code);
        let routines = scan_routines(&source);
        let var_blocks = scan_var_blocks(&source);
        Self {
            source,
            routines,
            var_blocks,
        }
    }

    /// Masked source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &SourceText<'a> {
        &self.source
    }

    /// Procedures and triggers
    #[inline]
    #[must_use]
    pub fn routines(&self) -> &[Routine] {
        &self.routines
    }

    fn tests(&self) -> impl Iterator<Item = &Routine> {
        self.routines.iter().filter(|routine| routine.is_test())
    }

    /// Run one check
    #[must_use]
    pub fn run(&self, category: CheckCategory) -> Vec<Issue> {
        match category {
            CheckCategory::Naming => self.naming(),
            CheckCategory::Comments => self.comment_structure(),
            CheckCategory::Permissions => self.test_permissions(),
            CheckCategory::Commit => self.commit_usage(),
            CheckCategory::ObjectLength => self.object_name_length(),
            CheckCategory::ScenarioCount => self.scenario_count(),
            CheckCategory::Library => self.library_functions(),
            CheckCategory::VariableOrder => self.variable_order(),
        }
    }

    fn naming(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        for test in self.tests() {
            let name = &test.name;
            let display = name.trim_matches(['"', '\'']);
            let line = test.anchor_line();

            if !TEST_NAME_PREFIX.is_match(name) {
                issues.push(Issue::error(
                    ids::TEST_NAMING_PREFIX,
                    format!("Test procedure \"{display}\" must start with T#### prefix (e.g., T0001_)"),
                    line,
                ));
            }
            if name.contains(['"', '\'']) {
                issues.push(Issue::error(
                    ids::TEST_NAMING_QUOTES,
                    format!("Test procedure \"{display}\" must not contain quotation marks"),
                    line,
                ));
            }
            let len = name.chars().count();
            if len > MAX_TEST_NAME_LEN {
                issues.push(Issue::warning(
                    ids::TEST_NAMING_LENGTH,
                    format!(
                        "Test procedure \"{display}\" exceeds {MAX_TEST_NAME_LEN} characters ({len} chars)"
                    ),
                    line,
                ));
            }
        }
        issues
    }

    fn comment_structure(&self) -> Vec<Issue> {
        const MISSING: [(&str, &str, &str); 4] = [
            ("[SCENARIO", ids::MISSING_SCENARIO, "// [SCENARIO X]"),
            ("[GIVEN]", ids::MISSING_GIVEN, "// [GIVEN]"),
            ("[WHEN]", ids::MISSING_WHEN, "// [WHEN]"),
            ("[THEN]", ids::MISSING_THEN, "// [THEN]"),
        ];

        let mut issues = Vec::new();
        for test in self.tests() {
            let comments: Vec<&Comment> = self.source.comments_in(test.lines()).collect();

            for (tag, rule, shown) in MISSING {
                if !comments.iter().any(|c| c.content().starts_with(tag)) {
                    issues.push(Issue::error(
                        rule,
                        format!("Test \"{}\" missing {shown} comment", test.name),
                        test.anchor_line(),
                    ));
                }
            }

            for comment in comments {
                let content = comment.content();
                if content.trim().is_empty()
                    || STRUCTURAL_TAGS.iter().any(|tag| content.starts_with(tag))
                {
                    continue;
                }
                let excerpt: String = content.trim_end().chars().take(50).collect();
                issues.push(Issue::error(
                    ids::FORBIDDEN_COMMENT,
                    format!("Forbidden comment in test \"{}\": \"{excerpt}\"", test.name),
                    comment.line,
                ));
            }
        }
        issues
    }

    fn test_permissions(&self) -> Vec<Issue> {
        PERMISSIONS_DISABLED
            .find_iter(self.source.masked())
            .map(|m| {
                Issue::error(
                    ids::FORBIDDEN_TESTPERMISSIONS_DISABLED,
                    "TestPermissions = Disabled is forbidden. Use SetTestPermissions() procedure instead.",
                    self.source.line_of(m.start()),
                )
            })
            .collect()
    }

    fn commit_usage(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        for test in self.tests() {
            let span = test.lines();
            for (line_no, _, masked) in self.source.lines() {
                if !span.contains(&line_no) {
                    continue;
                }
                for _ in COMMIT_CALL.find_iter(masked) {
                    issues.push(Issue::error(
                        ids::FORBIDDEN_COMMIT_IN_TEST,
                        format!(
                            "Commit() is forbidden in test procedure \"{}\". Only allowed in Initialize().",
                            test.name
                        ),
                        line_no,
                    ));
                }
            }
        }
        issues
    }

    fn object_name_length(&self) -> Vec<Issue> {
        OBJECT_DECLARATION
            .captures_iter(self.source.masked())
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps[2].replace(['"', '\''], "");
                let name = name.trim();
                let len = name.chars().count();
                (len > MAX_OBJECT_NAME_LEN).then(|| {
                    Issue::error(
                        ids::OBJECT_NAME_LENGTH,
                        format!(
                            "Object name \"{name}\" exceeds {MAX_OBJECT_NAME_LEN} characters ({len} chars)"
                        ),
                        self.source.line_of(whole.start()),
                    )
                })
            })
            .collect()
    }

    fn scenario_count(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        let test_count = self.tests().count();

        let tags: Vec<(&Comment, Option<u64>)> = self
            .source
            .comments()
            .iter()
            .filter_map(|comment| {
                let caps = SCENARIO_TAG.captures(comment.content())?;
                Some((comment, caps[1].parse::<u64>().ok()))
            })
            .collect();

        if test_count != tags.len() {
            issues.push(Issue::error(
                ids::SCENARIO_COUNT_MISMATCH,
                format!(
                    "Scenario count mismatch: {test_count} test procedures but {} scenarios",
                    tags.len()
                ),
                1,
            ));
        }

        let mut numbered: Vec<(u64, usize)> = tags
            .iter()
            .filter_map(|(comment, number)| number.map(|n| (n, comment.line)))
            .collect();
        numbered.sort_by_key(|(number, _)| *number);

        for (expected, (found, line)) in (1u64..).zip(&numbered) {
            if *found != expected {
                issues.push(Issue::warning(
                    ids::SCENARIO_NUMBERING_GAP,
                    format!("Scenario numbering gap: expected {expected} but found {found}"),
                    *line,
                ));
                break;
            }
        }

        issues
    }

    fn library_functions(&self) -> Vec<Issue> {
        let masked = self.source.masked();
        if !LIBRARY_VARIABLE.is_match(masked) && !LIBRARY_OBJECT.is_match(masked) {
            return Vec::new();
        }

        self.routines
            .iter()
            .filter(|routine| routine.kind == RoutineKind::Procedure && !routine.is_test())
            .filter(|routine| self.source.comments_in(routine.lines()).next().is_some())
            .map(|routine| {
                Issue::warning(
                    ids::LIBRARY_NO_COMMENTS,
                    format!("Library function \"{}\" should not contain comments", routine.name),
                    routine.header_line,
                )
            })
            .collect()
    }

    fn variable_order(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        for block in &self.var_blocks {
            let mut highest: Option<(usize, &str)> = None;
            for declaration in &block.declarations {
                let Some(rank) = type_rank(&declaration.type_name) else {
                    continue;
                };
                match highest {
                    Some((seen, seen_name)) if rank < seen => {
                        issues.push(Issue::warning(
                            ids::VARIABLE_ORDER,
                            format!(
                                "Variable {} of type \"{}\" should be declared before {seen_name} variables",
                                declaration.names, TYPE_ORDER[rank]
                            ),
                            declaration.line,
                        ));
                    }
                    Some((seen, _)) if rank == seen => {}
                    _ => highest = Some((rank, TYPE_ORDER[rank])),
                }
            }
        }
        issues
    }
}

/// Position of `type_name` in [`TYPE_ORDER`], ignoring case
#[must_use]
pub fn type_rank(type_name: &str) -> Option<usize> {
    TYPE_ORDER
        .iter()
        .position(|known| known.eq_ignore_ascii_case(type_name))
}

/// Test procedure naming
#[must_use]
pub fn check_naming(code: &str) -> Vec<Issue> {
    Analysis::new(code).run(CheckCategory::Naming)
}

/// Structural comment tags inside test procedures
#[must_use]
pub fn check_comment_structure(code: &str) -> Vec<Issue> {
    Analysis::new(code).run(CheckCategory::Comments)
}

/// `TestPermissions = Disabled` anywhere
#[must_use]
pub fn check_test_permissions(code: &str) -> Vec<Issue> {
    Analysis::new(code).run(CheckCategory::Permissions)
}

/// `Commit()` inside test procedures
#[must_use]
pub fn check_commit_usage(code: &str) -> Vec<Issue> {
    Analysis::new(code).run(CheckCategory::Commit)
}

/// Object names over 30 characters
#[must_use]
pub fn check_object_name_length(code: &str) -> Vec<Issue> {
    Analysis::new(code).run(CheckCategory::ObjectLength)
}

/// Test/scenario parity and contiguous scenario numbering
#[must_use]
pub fn check_scenario_count(code: &str) -> Vec<Issue> {
    Analysis::new(code).run(CheckCategory::ScenarioCount)
}

/// Comments in non-test procedures of library-using codeunits
#[must_use]
pub fn check_library_functions(code: &str) -> Vec<Issue> {
    Analysis::new(code).run(CheckCategory::Library)
}

/// Declaration order inside `var` blocks
#[must_use]
pub fn check_variable_order(code: &str) -> Vec<Issue> {
    Analysis::new(code).run(CheckCategory::VariableOrder)
}

/// Run every check, in [`CheckCategory::ALL`] order
#[tracing::instrument(level = "debug", skip_all, fields(bytes = code.len()))]
#[must_use]
pub fn validate_all(code: &str) -> ValidationResult {
    let analysis = Analysis::new(code);
    debug!(
        routines = analysis.routines.len(),
        var_blocks = analysis.var_blocks.len(),
        "source scanned"
    );

    let mut result = ValidationResult::new();
    for category in CheckCategory::ALL {
        let issues = analysis.run(category);
        debug!(check = %category, issues = issues.len(), "check finished");
        result.insert(category, issues);
    }
    result
}
