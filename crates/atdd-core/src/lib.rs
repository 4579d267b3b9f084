//! ATDD Toolkit
//!
//! One crate for the whole pipeline:
//! - Parse markdown test plans into scenarios ([`parse_test_plan`])
//! - Render scenarios as an AL test codeunit ([`generate_test_codeunit`])
//! - Check AL test codeunits against the conventions ([`validate_all`])
//! - List the conventions ([`rule_catalog`], [`applied_conventions`])
//!
//! # Example
//!
//! ```rust
//! use atdd_core::{AtddConfig, AtddToolkit};
//!
//! let toolkit = AtddToolkit::new(AtddConfig::new().with_codeunit_id(50200));
//! let plan = "**Work Item**: 12 - Vendor card\n\n### Scenario 1: Create vendor\n\
//!             **Given** a vendor\n**When** it is saved\n**Then** it exists\n";
//! let generated = toolkit.generate_checked(plan)?;
//! assert!(generated.code.starts_with("codeunit 50200 VendorCardTests182FDW"));
//! assert!(generated.report.accepted);
//! # Ok::<(), atdd_core::AtddError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod toolkit;

pub use atdd_codegen::{
    applied_conventions, generate_test_codeunit, procedure_name, Convention, GenerationOptions,
    OptionsError,
};
pub use atdd_plan::{parse_test_plan, AndStep, Metadata, ParsedDocument, Scenario, StepContext};
pub use atdd_rules::{rule, rule_catalog, CheckCategory, Rule, Severity, RULES};
pub use atdd_validate::{
    check_comment_structure, check_commit_usage, check_library_functions, check_naming,
    check_object_name_length, check_scenario_count, check_test_permissions, check_variable_order,
    summarize, validate_all, Issue, Summary, ValidationResult,
};
pub use config::{AtddConfig, ValidationConfig};
pub use error::{AtddError, Result};
pub use toolkit::{AtddToolkit, GeneratedCodeunit, ValidationReport};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the toolkit
    pub use crate::{
        generate_test_codeunit, parse_test_plan, summarize, validate_all, AtddConfig,
        AtddToolkit, GenerationOptions, ParsedDocument, Severity,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
