//! ATDD Code Generator
//!
//! Renders a [`ParsedDocument`](atdd_plan::ParsedDocument) into a Business
//! Central AL test codeunit that follows the ATDD conventions checked by
//! `atdd-validate`.
//!
//! # Core Concepts
//!
//! - [`GenerationOptions`]: codeunit id, name, library codeunit and affix
//! - [`CodeunitGenerator`]: deterministic renderer, one procedure per scenario
//! - [`naming`]: procedure and codeunit naming grammar
//! - [`declarations`]: keyword tables for local variables and handlers
//!
//! # Example
//!
//! ```rust
//! use atdd_codegen::{generate_test_codeunit, GenerationOptions};
//! use atdd_plan::parse_test_plan;
//!
//! let doc = parse_test_plan("### Scenario 7: Create New Vendor!\n**Given** a vendor\n");
//! let code = generate_test_codeunit(&doc, &GenerationOptions::new());
//! assert!(code.contains("procedure T0007_CreateNewVendor()"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod conventions;
pub mod declarations;
pub mod generator;
pub mod naming;
pub mod options;

pub use conventions::{applied_conventions, Convention};
pub use generator::{generate_test_codeunit, CodeunitGenerator};
pub use naming::{codeunit_name, procedure_name, MAX_OBJECT_NAME_LEN};
pub use options::{
    GenerationOptions, OptionsError, DEFAULT_CODEUNIT_ID, DEFAULT_LIBRARY_CODEUNIT,
    DEFAULT_OBJECT_AFFIX,
};
