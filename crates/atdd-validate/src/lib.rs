//! ATDD Code Validator
//!
//! Re-derives the structure of an AL test codeunit (test procedures, comment
//! tags, `var` blocks, object names) from source text and reports every
//! convention violation as an [`Issue`].
//!
//! Comments and string literals are masked before any structural match, so a
//! `Commit()` inside a string or a `begin` inside a comment never counts.
//!
//! # Example
//!
//! ```rust
//! use atdd_validate::{summarize, validate_all};
//!
//! let code = "codeunit 50100 DemoTests\n{\n    [Test]\n    procedure CheckIt()\n    begin\n    end;\n}\n";
//! let summary = summarize(&validate_all(code));
//! assert!(!summary.passed);
//! assert!(summary.issues.iter().any(|issue| issue.rule == "TEST_NAMING_PREFIX"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod checks;
pub mod report;
pub mod scan;
pub mod source;

pub use atdd_rules::{CheckCategory, Severity};
pub use checks::{
    check_comment_structure, check_commit_usage, check_library_functions, check_naming,
    check_object_name_length, check_scenario_count, check_test_permissions, check_variable_order,
    validate_all, Analysis,
};
pub use report::{summarize, Issue, Summary, ValidationResult};
pub use source::SourceText;
