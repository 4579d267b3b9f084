//! ATDD Test Plan
//!
//! Parses semi-structured markdown test plans into a typed scenario model.
//!
//! # Input shape
//!
//! ```text
//! **Work Item**: 330789 - Approved supplier list
//!
//! ### Scenario 1: Block unapproved vendor
//! **Priority**: High
//! **Given** a vendor that is not approved
//! **And** an item supplied by that vendor
//! **When** the user creates a requisition line
//! **Then** an error is shown
//! ```
//!
//! # Example
//!
//! ```rust
//! use atdd_plan::{parse_test_plan, StepContext};
//!
//! let doc = parse_test_plan("### Scenario 1: Demo\n**When** step A\n**And** step B\n");
//! let scenario = &doc.scenarios[0];
//! assert_eq!(scenario.and[0].context, StepContext::When);
//! assert_eq!(scenario.and[0].text, "step B");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod model;
pub mod parser;

pub use model::{AndStep, Metadata, ParsedDocument, Scenario, StepContext, DEFAULT_PRIORITY};
pub use parser::{parse_test_plan, ContextMachine, StepLabel, TestPlanParser};
