//! Generation options
//!
//! Every field has a default, so a partial TOML table deserializes into a
//! complete set of options.

use crate::naming::{self, MAX_OBJECT_NAME_LEN};
use atdd_plan::Metadata;
use serde::{Deserialize, Serialize};

/// Default object id of the generated codeunit
pub const DEFAULT_CODEUNIT_ID: u32 = 50100;

/// Default library codeunit injected into the global declarations
pub const DEFAULT_LIBRARY_CODEUNIT: &str = "LibraryApprovedSupplier182FDW";

/// Default app-range affix placed between `Tests` and `FDW`
pub const DEFAULT_OBJECT_AFFIX: &str = "182";

/// Options for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Object id of the codeunit
    pub codeunit_id: u32,
    /// Explicit codeunit name; derived from the work item when `None`
    pub codeunit_name: Option<String>,
    /// Library codeunit declared as a global variable
    pub library_codeunit: String,
    /// Affix used in derived names (`<Stem>Tests<affix>FDW`)
    pub object_affix: String,
}

impl GenerationOptions {
    /// Default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With codeunit id
    #[inline]
    #[must_use]
    pub fn with_codeunit_id(mut self, id: u32) -> Self {
        self.codeunit_id = id;
        self
    }

    /// With explicit codeunit name
    #[inline]
    #[must_use]
    pub fn with_codeunit_name(mut self, name: impl Into<String>) -> Self {
        self.codeunit_name = Some(name.into());
        self
    }

    /// With library codeunit
    #[inline]
    #[must_use]
    pub fn with_library_codeunit(mut self, name: impl Into<String>) -> Self {
        self.library_codeunit = name.into();
        self
    }

    /// With object affix
    #[inline]
    #[must_use]
    pub fn with_object_affix(mut self, affix: impl Into<String>) -> Self {
        self.object_affix = affix.into();
        self
    }

    /// Codeunit name to emit: the explicit one, or one derived from `metadata`
    #[must_use]
    pub fn resolved_codeunit_name(&self, metadata: &Metadata) -> String {
        match &self.codeunit_name {
            Some(name) => name.clone(),
            None => naming::codeunit_name(&metadata.work_item, &self.object_affix),
        }
    }

    /// Reject options that cannot produce a conforming object
    ///
    /// # Errors
    /// Returns the first [`OptionsError`] found.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.codeunit_id == 0 {
            return Err(OptionsError::ZeroCodeunitId);
        }

        if let Some(name) = &self.codeunit_name {
            if name.trim().is_empty() {
                return Err(OptionsError::EmptyCodeunitName);
            }
            if name.contains(['"', '\'']) {
                return Err(OptionsError::QuotedCodeunitName(name.clone()));
            }
            if name.chars().count() > MAX_OBJECT_NAME_LEN {
                return Err(OptionsError::CodeunitNameTooLong {
                    name: name.clone(),
                    len: name.chars().count(),
                });
            }
            if !naming::is_identifier(name) {
                return Err(OptionsError::InvalidCodeunitName(name.clone()));
            }
        }

        if !naming::is_identifier(&self.library_codeunit)
            || self.library_codeunit.len() > MAX_OBJECT_NAME_LEN
        {
            return Err(OptionsError::InvalidLibraryCodeunit(
                self.library_codeunit.clone(),
            ));
        }

        let suffix = naming::name_suffix(&self.object_affix);
        if !self.object_affix.chars().all(|c| c.is_ascii_alphanumeric())
            || suffix.len() >= MAX_OBJECT_NAME_LEN
        {
            return Err(OptionsError::InvalidObjectAffix(self.object_affix.clone()));
        }

        Ok(())
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            codeunit_id: DEFAULT_CODEUNIT_ID,
            codeunit_name: None,
            library_codeunit: DEFAULT_LIBRARY_CODEUNIT.to_string(),
            object_affix: DEFAULT_OBJECT_AFFIX.to_string(),
        }
    }
}

/// Invalid generation options
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    /// Object id 0 is not a valid AL object id
    #[error("codeunit id must be positive")]
    ZeroCodeunitId,

    /// Blank explicit name
    #[error("codeunit name must not be empty")]
    EmptyCodeunitName,

    /// Explicit name with quotation marks
    #[error("codeunit name must not contain quotation marks: {0}")]
    QuotedCodeunitName(String),

    /// Explicit name over the object name limit
    #[error("codeunit name '{name}' is {len} characters, limit is 30")]
    CodeunitNameTooLong {
        /// Offending name
        name: String,
        /// Its length in characters
        len: usize,
    },

    /// Explicit name that AL would need quoted
    #[error("codeunit name must be an identifier: '{0}'")]
    InvalidCodeunitName(String),

    /// Library codeunit that is not a plain identifier
    #[error("library codeunit must be an identifier of at most 30 characters: '{0}'")]
    InvalidLibraryCodeunit(String),

    /// Affix that is not alphanumeric or leaves no room for a name stem
    #[error("object affix must be alphanumeric and leave room for a name: '{0}'")]
    InvalidObjectAffix(String),
}
