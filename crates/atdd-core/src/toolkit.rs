//! The parse → generate → validate pipeline behind one configured handle

use crate::config::AtddConfig;
use crate::error::Result;
use atdd_codegen::CodeunitGenerator;
use atdd_plan::{ParsedDocument, TestPlanParser};
use atdd_validate::{summarize, validate_all, Summary, ValidationResult};
use serde::Serialize;

/// Validation result with its summary and the configured verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Issues per check
    pub checks: ValidationResult,
    /// Totals
    pub summary: Summary,
    /// Passed, and warning-free when warnings fail
    pub accepted: bool,
}

/// A generated codeunit together with the validator's view of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCodeunit {
    /// AL source
    pub code: String,
    /// Validation of `code`
    pub report: ValidationReport,
}

/// Configured entry point for the whole toolkit
#[derive(Debug, Clone, Default)]
pub struct AtddToolkit {
    config: AtddConfig,
    parser: TestPlanParser,
}

impl AtddToolkit {
    /// Create a toolkit with the given configuration
    #[must_use]
    pub fn new(config: AtddConfig) -> Self {
        Self {
            config,
            parser: TestPlanParser::new(),
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AtddConfig {
        &self.config
    }

    /// Parse a markdown test plan
    #[must_use]
    pub fn parse(&self, markdown: &str) -> ParsedDocument {
        self.parser.parse(markdown)
    }

    /// Render a parsed plan with the configured options
    ///
    /// # Errors
    /// [`AtddError::Options`](crate::AtddError::Options) when the options
    /// cannot produce a conforming codeunit.
    pub fn generate(&self, doc: &ParsedDocument) -> Result<String> {
        self.config.generation.validate()?;
        let code = CodeunitGenerator::new(self.config.generation.clone()).generate(doc);
        tracing::info!(
            scenarios = doc.len(),
            bytes = code.len(),
            "generated test codeunit"
        );
        Ok(code)
    }

    /// Parse, render and validate in one go
    ///
    /// # Errors
    /// As [`AtddToolkit::generate`].
    pub fn generate_checked(&self, markdown: &str) -> Result<GeneratedCodeunit> {
        let doc = self.parse(markdown);
        let code = self.generate(&doc)?;
        let report = self.validate(&code);
        if !report.accepted {
            tracing::warn!(
                errors = report.summary.errors,
                warnings = report.summary.warnings,
                "generated codeunit does not validate cleanly"
            );
        }
        Ok(GeneratedCodeunit { code, report })
    }

    /// Validate AL source
    #[must_use]
    pub fn validate(&self, code: &str) -> ValidationReport {
        let checks = validate_all(code);
        let summary = summarize(&checks);
        let accepted = summary.accepted(self.config.validation.fail_on_warnings);
        tracing::info!(
            errors = summary.errors,
            warnings = summary.warnings,
            accepted,
            "validated codeunit"
        );
        ValidationReport {
            checks,
            summary,
            accepted,
        }
    }
}
