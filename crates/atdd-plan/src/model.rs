//! Scenario model produced by the test plan parser
//!
//! A [`ParsedDocument`] is built once per parse call and never mutated
//! afterwards; the code generator only reads it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority assigned when a scenario declares none
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Plan-level metadata
///
/// Every field defaults to the empty string when the plan omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    /// `**Test Plan ID**`
    pub test_plan_id: String,
    /// `**Work Item**`, usually `<number> - <title>`
    pub work_item: String,
    /// `**Project**`
    pub project: String,
    /// `**Feature**`
    pub feature: String,
}

impl Metadata {
    /// First run of ASCII digits in the work item, if any
    #[must_use]
    pub fn work_item_number(&self) -> Option<&str> {
        let text = self.work_item.as_str();
        let start = text.find(|c: char| c.is_ascii_digit())?;
        let len = text[start..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len() - start);
        Some(&text[start..start + len])
    }
}

/// Step group a line belongs to
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepContext {
    /// Preconditions
    #[default]
    Given,
    /// The action under test
    When,
    /// Expected outcome
    Then,
}

impl StepContext {
    /// All groups, in body order
    pub const ALL: [StepContext; 3] = [StepContext::Given, StepContext::When, StepContext::Then];

    /// Upper-case tag, as used in generated comments (`GIVEN`)
    #[inline]
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            StepContext::Given => "GIVEN",
            StepContext::When => "WHEN",
            StepContext::Then => "THEN",
        }
    }

    /// Markdown label (`Given`)
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StepContext::Given => "Given",
            StepContext::When => "When",
            StepContext::Then => "Then",
        }
    }
}

impl fmt::Display for StepContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An `**And**` step, attributed to the group active where it appeared
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AndStep {
    /// Inherited group
    pub context: StepContext,
    /// Step text
    pub text: String,
}

impl AndStep {
    /// Create an AND step
    #[inline]
    pub fn new(context: StepContext, text: impl Into<String>) -> Self {
        Self {
            context,
            text: text.into(),
        }
    }
}

/// One behavioural test case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scenario {
    /// Positive scenario number
    pub id: u32,
    /// Title with emphasis markup removed
    pub title: String,
    /// Free-text priority
    pub priority: String,
    /// GIVEN steps, in source order
    pub given: Vec<String>,
    /// WHEN steps, in source order
    pub when: Vec<String>,
    /// THEN steps, in source order
    pub then: Vec<String>,
    /// AND steps with their inherited context
    pub and: Vec<AndStep>,
}

impl Scenario {
    /// Empty scenario with default priority
    #[must_use]
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            priority: DEFAULT_PRIORITY.to_string(),
            given: Vec::new(),
            when: Vec::new(),
            then: Vec::new(),
            and: Vec::new(),
        }
    }

    /// Labelled steps of one group
    #[inline]
    #[must_use]
    pub fn steps(&self, context: StepContext) -> &[String] {
        match context {
            StepContext::Given => &self.given,
            StepContext::When => &self.when,
            StepContext::Then => &self.then,
        }
    }

    /// AND steps attributed to one group
    pub fn and_steps(&self, context: StepContext) -> impl Iterator<Item = &str> {
        self.and
            .iter()
            .filter(move |step| step.context == context)
            .map(|step| step.text.as_str())
    }

    /// A whole group: labelled steps first, then their AND extensions
    pub fn group(&self, context: StepContext) -> impl Iterator<Item = &str> {
        self.steps(context)
            .iter()
            .map(String::as_str)
            .chain(self.and_steps(context))
    }

    /// GIVEN, WHEN and THEN steps joined by spaces (AND steps excluded)
    #[must_use]
    pub fn step_text(&self) -> String {
        self.given
            .iter()
            .chain(&self.when)
            .chain(&self.then)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Every step including AND steps, joined by spaces
    #[must_use]
    pub fn full_text(&self) -> String {
        let mut text = self.step_text();
        for step in &self.and {
            text.push(' ');
            text.push_str(&step.text);
        }
        text
    }

    /// Total number of steps, AND steps included
    #[inline]
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.given.len() + self.when.len() + self.then.len() + self.and.len()
    }
}

/// Result of parsing one test plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Plan-level metadata
    pub metadata: Metadata,
    /// Scenarios in document order
    pub scenarios: Vec<Scenario>,
}

impl ParsedDocument {
    /// Number of scenarios
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// True when the plan has no scenarios
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        let mut s = Scenario::new(3, "Approve vendor");
        s.given.push("a vendor".into());
        s.when.push("the user approves".into());
        s.then.push("status is Approved".into());
        s.and.push(AndStep::new(StepContext::Given, "an item"));
        s.and.push(AndStep::new(StepContext::Then, "a message is shown"));
        s
    }

    #[test]
    fn work_item_number_extracts_first_digit_run() {
        let meta = Metadata {
            work_item: "AB 330789 - Vendor approval 2".into(),
            ..Metadata::default()
        };
        assert_eq!(meta.work_item_number(), Some("330789"));

        let trailing = Metadata {
            work_item: "Story 42".into(),
            ..Metadata::default()
        };
        assert_eq!(trailing.work_item_number(), Some("42"));
        assert_eq!(Metadata::default().work_item_number(), None);
    }

    #[test]
    fn group_orders_labelled_before_and() {
        let s = scenario();
        let given: Vec<_> = s.group(StepContext::Given).collect();
        assert_eq!(given, ["a vendor", "an item"]);
        let when: Vec<_> = s.group(StepContext::When).collect();
        assert_eq!(when, ["the user approves"]);
    }

    #[test]
    fn step_text_excludes_and_steps() {
        let s = scenario();
        assert_eq!(s.step_text(), "a vendor the user approves status is Approved");
        assert!(s.full_text().ends_with("an item a message is shown"));
        assert_eq!(s.step_count(), 5);
    }

    #[test]
    fn context_serializes_upper_case() {
        let step = AndStep::new(StepContext::When, "x");
        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(json, r#"{"context":"WHEN","text":"x"}"#);
    }

    #[test]
    fn new_scenario_defaults() {
        let s = Scenario::new(1, "t");
        assert_eq!(s.priority, DEFAULT_PRIORITY);
        assert_eq!(s.step_count(), 0);
    }
}
