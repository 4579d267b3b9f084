//! Toolkit configuration, loaded from TOML
//!
//! ```toml
//! [generation]
//! codeunit_id = 50100
//! library_codeunit = "LibraryApprovedSupplier182FDW"
//!
//! [validation]
//! fail_on_warnings = true
//! ```
//!
//! Every table and key is optional.

use crate::error::{AtddError, Result};
use atdd_codegen::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Validation settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Treat warnings as failures
    pub fail_on_warnings: bool,
}

/// Toolkit configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtddConfig {
    /// Codeunit generation
    pub generation: GenerationOptions,
    /// Validation
    pub validation: ValidationConfig,
}

impl AtddConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// [`AtddError::Config`] when the text is not valid TOML for this shape.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, Path::new("<inline>"))
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// [`AtddError::Io`] when unreadable, [`AtddError::Config`] when invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AtddError::io(path, source))?;
        let config = Self::parse(&text, path)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| AtddError::Config {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }

    /// With generation options
    #[inline]
    #[must_use]
    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = generation;
        self
    }

    /// With codeunit id
    #[inline]
    #[must_use]
    pub fn with_codeunit_id(mut self, id: u32) -> Self {
        self.generation.codeunit_id = id;
        self
    }

    /// With explicit codeunit name
    #[inline]
    #[must_use]
    pub fn with_codeunit_name(mut self, name: impl Into<String>) -> Self {
        self.generation.codeunit_name = Some(name.into());
        self
    }

    /// With library codeunit
    #[inline]
    #[must_use]
    pub fn with_library_codeunit(mut self, name: impl Into<String>) -> Self {
        self.generation.library_codeunit = name.into();
        self
    }

    /// With warnings treated as failures
    #[inline]
    #[must_use]
    pub fn with_fail_on_warnings(mut self, strict: bool) -> Self {
        self.validation.fail_on_warnings = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atdd_codegen::{DEFAULT_CODEUNIT_ID, DEFAULT_LIBRARY_CODEUNIT};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_text_is_default() {
        assert_eq!(AtddConfig::from_toml_str("").unwrap(), AtddConfig::default());
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let config = AtddConfig::from_toml_str(
            "[generation]\ncodeunit_name = \"VendorTests182FDW\"\n\n[validation]\nfail_on_warnings = true\n",
        )
        .unwrap();
        assert_eq!(config.generation.codeunit_id, DEFAULT_CODEUNIT_ID);
        assert_eq!(config.generation.library_codeunit, DEFAULT_LIBRARY_CODEUNIT);
        assert_eq!(
            config.generation.codeunit_name.as_deref(),
            Some("VendorTests182FDW")
        );
        assert!(config.validation.fail_on_warnings);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = AtddConfig::from_toml_str("[generation]\ncodeunit_id = \"x\"\n").unwrap_err();
        assert!(matches!(err, AtddError::Config { .. }));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[generation]\ncodeunit_id = 50250").unwrap();
        let config = AtddConfig::load(file.path()).unwrap();
        assert_eq!(config.generation.codeunit_id, 50250);

        let missing = AtddConfig::load(file.path().with_extension("absent"));
        assert!(matches!(missing, Err(AtddError::Io { .. })));
    }

    #[test]
    fn builders_override() {
        let config = AtddConfig::new()
            .with_codeunit_id(50300)
            .with_codeunit_name("X")
            .with_library_codeunit("LibraryX")
            .with_fail_on_warnings(true);
        assert_eq!(config.generation.codeunit_id, 50300);
        assert_eq!(config.generation.codeunit_name.as_deref(), Some("X"));
        assert_eq!(config.generation.library_codeunit, "LibraryX");
        assert!(config.validation.fail_on_warnings);
    }
}
