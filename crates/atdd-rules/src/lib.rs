//! ATDD Rule Catalog
//!
//! The named conventions every generated (or hand-written) AL test codeunit
//! is held to. The catalog is documentation-facing: the validator emits issues
//! tagged with these ids, and tooling lists them for authors.
//!
//! # Example
//!
//! ```rust
//! use atdd_rules::{ids, rule, Severity};
//!
//! let naming = rule(ids::TEST_NAMING_PREFIX).unwrap();
//! assert_eq!(naming.severity, Severity::Error);
//! assert!(naming.example.contains("T0001_"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule identifiers, as they appear in reported issues
pub mod ids {
    #![allow(missing_docs)]

    pub const TEST_NAMING_PREFIX: &str = "TEST_NAMING_PREFIX";
    pub const TEST_NAMING_QUOTES: &str = "TEST_NAMING_QUOTES";
    pub const TEST_NAMING_LENGTH: &str = "TEST_NAMING_LENGTH";
    pub const MISSING_SCENARIO: &str = "MISSING_SCENARIO";
    pub const MISSING_GIVEN: &str = "MISSING_GIVEN";
    pub const MISSING_WHEN: &str = "MISSING_WHEN";
    pub const MISSING_THEN: &str = "MISSING_THEN";
    pub const FORBIDDEN_COMMENT: &str = "FORBIDDEN_COMMENT";
    pub const FORBIDDEN_TESTPERMISSIONS_DISABLED: &str = "FORBIDDEN_TESTPERMISSIONS_DISABLED";
    pub const FORBIDDEN_COMMIT_IN_TEST: &str = "FORBIDDEN_COMMIT_IN_TEST";
    pub const OBJECT_NAME_LENGTH: &str = "OBJECT_NAME_LENGTH";
    pub const SCENARIO_COUNT_MISMATCH: &str = "SCENARIO_COUNT_MISMATCH";
    pub const SCENARIO_NUMBERING_GAP: &str = "SCENARIO_NUMBERING_GAP";
    pub const LIBRARY_NO_COMMENTS: &str = "LIBRARY_NO_COMMENTS";
    pub const VARIABLE_ORDER: &str = "VARIABLE_ORDER";
}

/// How seriously a violation is taken
///
/// Errors block acceptance of a codeunit; warnings are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed before the codeunit is accepted
    Error,
    /// Advisory only
    Warning,
}

impl Severity {
    /// Lowercase wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The validator check that reports a rule
///
/// Variants are declared in the order the checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckCategory {
    /// Test procedure naming
    Naming,
    /// Structured comment tags inside tests
    Comments,
    /// `TestPermissions` property usage
    Permissions,
    /// `Commit()` inside tests
    Commit,
    /// Object name length
    ObjectLength,
    /// Scenario/procedure parity and numbering
    ScenarioCount,
    /// Comments in library procedures
    Library,
    /// Declaration order inside `var` blocks
    VariableOrder,
}

impl CheckCategory {
    /// All categories, in execution order
    pub const ALL: [CheckCategory; 8] = [
        CheckCategory::Naming,
        CheckCategory::Comments,
        CheckCategory::Permissions,
        CheckCategory::Commit,
        CheckCategory::ObjectLength,
        CheckCategory::ScenarioCount,
        CheckCategory::Library,
        CheckCategory::VariableOrder,
    ];

    /// Key used in validation results
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            CheckCategory::Naming => "naming",
            CheckCategory::Comments => "comments",
            CheckCategory::Permissions => "permissions",
            CheckCategory::Commit => "commit",
            CheckCategory::ObjectLength => "objectLength",
            CheckCategory::ScenarioCount => "scenarioCount",
            CheckCategory::Library => "library",
            CheckCategory::VariableOrder => "variableOrder",
        }
    }
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One named convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Stable identifier (see [`ids`])
    pub id: &'static str,
    /// What the convention requires
    pub description: &'static str,
    /// A conforming example or the suggested fix
    pub example: &'static str,
    /// Severity of a violation
    pub severity: Severity,
    /// Check that reports it
    pub category: CheckCategory,
}

/// The full catalog, grouped by check
pub static RULES: &[Rule] = &[
    Rule {
        id: ids::TEST_NAMING_PREFIX,
        description: "Test procedures must use T####_ prefix format",
        example: "procedure T0001_ValidateCustomerCreation()",
        severity: Severity::Error,
        category: CheckCategory::Naming,
    },
    Rule {
        id: ids::TEST_NAMING_QUOTES,
        description: "Test procedure names must not contain quotation marks",
        example: "Use PascalCase: BOMVersionTests16FDW instead of \"ATDD 330789 BOM Version Tests\"",
        severity: Severity::Error,
        category: CheckCategory::Naming,
    },
    Rule {
        id: ids::TEST_NAMING_LENGTH,
        description: "Test procedure names should not exceed 120 characters",
        example: "T0004_PostInvoiceWithDiscount rather than a sentence-length name",
        severity: Severity::Warning,
        category: CheckCategory::Naming,
    },
    Rule {
        id: ids::MISSING_SCENARIO,
        description: "Every test must have // [SCENARIO X] comment",
        example: "// [SCENARIO 1] Customer creation with valid data",
        severity: Severity::Error,
        category: CheckCategory::Comments,
    },
    Rule {
        id: ids::MISSING_GIVEN,
        description: "Every test must have at least one // [GIVEN] comment",
        example: "// [GIVEN] Valid customer data is prepared",
        severity: Severity::Error,
        category: CheckCategory::Comments,
    },
    Rule {
        id: ids::MISSING_WHEN,
        description: "Every test must have at least one // [WHEN] comment with TestPage actions",
        example: "// [WHEN] User creates customer through the page",
        severity: Severity::Error,
        category: CheckCategory::Comments,
    },
    Rule {
        id: ids::MISSING_THEN,
        description: "Every test must have at least one // [THEN] comment",
        example: "// [THEN] Customer is successfully created",
        severity: Severity::Error,
        category: CheckCategory::Comments,
    },
    Rule {
        id: ids::FORBIDDEN_COMMENT,
        description: "Only [SCENARIO], [GIVEN], [WHEN], [THEN] comments allowed in tests",
        example: "Remove all explanatory comments, keep only structured test comments",
        severity: Severity::Error,
        category: CheckCategory::Comments,
    },
    Rule {
        id: ids::FORBIDDEN_TESTPERMISSIONS_DISABLED,
        description: "TestPermissions = Disabled is forbidden",
        example: "Use SetTestPermissions() procedure with LibraryLowerPermissions instead",
        severity: Severity::Error,
        category: CheckCategory::Permissions,
    },
    Rule {
        id: ids::FORBIDDEN_COMMIT_IN_TEST,
        description: "Commit() is forbidden in test procedures",
        example: "Only use Commit() in Initialize() for one-time setup",
        severity: Severity::Error,
        category: CheckCategory::Commit,
    },
    Rule {
        id: ids::OBJECT_NAME_LENGTH,
        description: "AL object names must not exceed 30 characters",
        example: "Use FormulationMgmt199FDW instead of FormulationManagementAdministration199FDW",
        severity: Severity::Error,
        category: CheckCategory::ObjectLength,
    },
    Rule {
        id: ids::SCENARIO_COUNT_MISMATCH,
        description: "Number of test procedures must match number of scenarios",
        example: "10 scenarios = exactly 10 test procedures (T0001 through T0010)",
        severity: Severity::Error,
        category: CheckCategory::ScenarioCount,
    },
    Rule {
        id: ids::SCENARIO_NUMBERING_GAP,
        description: "Scenario numbers should run 1..N without gaps",
        example: "[SCENARIO 1], [SCENARIO 2], [SCENARIO 3] rather than 1, 3, 4",
        severity: Severity::Warning,
        category: CheckCategory::ScenarioCount,
    },
    Rule {
        id: ids::LIBRARY_NO_COMMENTS,
        description: "Library functions should be self-documenting without comments",
        example: "Use clear naming like CreateCustomerWithLocationCode() instead of comments",
        severity: Severity::Warning,
        category: CheckCategory::Library,
    },
    Rule {
        id: ids::VARIABLE_ORDER,
        description: "Variables should be ordered by type (Record, Report, Codeunit, etc.)",
        example: "Record variables first, then Report, then Codeunit, etc.",
        severity: Severity::Warning,
        category: CheckCategory::VariableOrder,
    },
];

static CATALOG: Lazy<IndexMap<&'static str, &'static Rule>> =
    Lazy::new(|| RULES.iter().map(|rule| (rule.id, rule)).collect());

/// Catalog keyed by rule id, in declaration order
#[inline]
#[must_use]
pub fn rule_catalog() -> &'static IndexMap<&'static str, &'static Rule> {
    &CATALOG
}

/// Look up a rule by id
#[inline]
#[must_use]
pub fn rule(id: &str) -> Option<&'static Rule> {
    CATALOG.get(id).copied()
}

/// Rules reported by one check
pub fn rules_in(category: CheckCategory) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |rule| rule.category == category)
}
