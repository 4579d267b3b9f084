//! Test plan parser
//!
//! Line-oriented scan over the plan markdown. Scenario blocks are opened by
//! `Scenario <id>: <title>` headings; inside a block, bold labels
//! (`**Given**`, `**When**`, `**Then**`, `**And**`, `**Priority**`) carry the
//! step text. Parsing never fails: anything missing falls back to a default.

use crate::model::{AndStep, Metadata, ParsedDocument, Scenario, StepContext, DEFAULT_PRIORITY};
use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Parser as MdParser, Tag};
use regex::Regex;

static SCENARIO_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s{0,3}(#{1,6})\s*[*_]*\s*Scenario\s+([A-Za-z0-9_]+)\s*[:.\-]?\s*(.*)$")
        .unwrap()
});

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s{0,3}(#{1,6})(?:[^#]|$)").unwrap());

static THEMATIC_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap());

static STEP_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\*\*\s*(Given|When|Then|And)\s*:?\s*\*\*\s*:?\s*(.*)$").unwrap()
});

static PRIORITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*\s*Priority\s*:?\s*\*\*\s*:?\s*(\w+)").unwrap());

static ID_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:TC|T)?(\d+)").unwrap());

/// Label text for each metadata field, in [`Metadata`] field order
const METADATA_LABELS: [&str; 4] = ["Test Plan ID", "Work Item", "Project", "Feature"];

static METADATA_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    METADATA_LABELS
        .iter()
        .map(|label| {
            let label = label.replace(' ', r"\s+");
            Regex::new(&format!(r"(?i)\*\*\s*{label}\s*:?\s*\*\*\s*:?\s*(.+)$")).unwrap()
        })
        .collect()
});

/// A bold step label found on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepLabel {
    /// `**Given**`
    Given,
    /// `**When**`
    When,
    /// `**Then**`
    Then,
    /// `**And**`
    And,
}

impl StepLabel {
    fn from_word(word: &str) -> Self {
        match word.to_ascii_lowercase().as_str() {
            "given" => StepLabel::Given,
            "when" => StepLabel::When,
            "then" => StepLabel::Then,
            _ => StepLabel::And,
        }
    }

    /// Group this label opens, `None` for `**And**`
    #[inline]
    #[must_use]
    pub fn context(self) -> Option<StepContext> {
        match self {
            StepLabel::Given => Some(StepContext::Given),
            StepLabel::When => Some(StepContext::When),
            StepLabel::Then => Some(StepContext::Then),
            StepLabel::And => None,
        }
    }
}

/// Attribution of AND steps to the nearest preceding group
///
/// States are the three step groups. Only GIVEN/WHEN/THEN label lines cause
/// transitions; the machine starts in GIVEN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextMachine {
    current: StepContext,
}

impl ContextMachine {
    /// Machine in the initial GIVEN state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active group
    #[inline]
    #[must_use]
    pub fn current(&self) -> StepContext {
        self.current
    }

    /// Feed one label; returns the group the labelled line belongs to
    pub fn observe(&mut self, label: StepLabel) -> StepContext {
        if let Some(context) = label.context() {
            self.current = context;
        }
        self.current
    }
}

/// Parser for markdown ATDD test plans
#[derive(Debug, Clone, Copy, Default)]
pub struct TestPlanParser;

impl TestPlanParser {
    /// Create new parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a whole plan
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = markdown.len()))]
    pub fn parse(&self, markdown: &str) -> ParsedDocument {
        let metadata = extract_metadata(markdown);
        let scenarios = self.parse_scenarios(markdown);
        tracing::debug!(
            scenarios = scenarios.len(),
            work_item = %metadata.work_item,
            "parsed test plan"
        );
        ParsedDocument {
            metadata,
            scenarios,
        }
    }

    fn parse_scenarios(&self, markdown: &str) -> Vec<Scenario> {
        let mut scenarios = Vec::new();
        let mut open: Option<ScenarioBlock<'_>> = None;

        for line in markdown.lines() {
            if let Some(heading) = ScenarioBlock::open(line) {
                if let Some(block) = open.take() {
                    scenarios.push(block.finish(scenarios.len() + 1));
                }
                open = Some(heading);
                continue;
            }

            let Some(block) = open.as_mut() else {
                continue;
            };
            if block.is_closed_by(line) {
                if let Some(block) = open.take() {
                    scenarios.push(block.finish(scenarios.len() + 1));
                }
            } else {
                block.lines.push(line);
            }
        }

        if let Some(block) = open.take() {
            scenarios.push(block.finish(scenarios.len() + 1));
        }
        scenarios
    }
}

/// Parse a plan with the default parser
#[inline]
#[must_use]
pub fn parse_test_plan(markdown: &str) -> ParsedDocument {
    TestPlanParser::new().parse(markdown)
}

/// Metadata lookup: first matching line wins, blank values are skipped
#[must_use]
pub fn extract_metadata(markdown: &str) -> Metadata {
    let mut values = METADATA_PATTERNS.iter().map(|pattern| {
        markdown
            .lines()
            .filter_map(|line| pattern.captures(line))
            .map(|caps| caps[1].trim().to_string())
            .find(|value| !value.is_empty())
            .unwrap_or_default()
    });

    Metadata {
        test_plan_id: values.next().unwrap_or_default(),
        work_item: values.next().unwrap_or_default(),
        project: values.next().unwrap_or_default(),
        feature: values.next().unwrap_or_default(),
    }
}

/// Steps and priority of one scenario body, in source order
#[must_use]
pub fn extract_steps(id: u32, title: String, lines: &[&str]) -> Scenario {
    let mut scenario = Scenario::new(id, title);
    let mut machine = ContextMachine::new();

    if let Some(priority) = lines
        .iter()
        .find_map(|line| PRIORITY.captures(line).map(|caps| caps[1].to_string()))
    {
        scenario.priority = priority;
    }

    for line in lines {
        let Some(caps) = STEP_LABEL.captures(line) else {
            continue;
        };
        let label = StepLabel::from_word(&caps[1]);
        let context = machine.observe(label);
        let text = caps[2].trim();
        if text.is_empty() {
            continue;
        }

        match label {
            StepLabel::Given => scenario.given.push(text.to_string()),
            StepLabel::When => scenario.when.push(text.to_string()),
            StepLabel::Then => scenario.then.push(text.to_string()),
            StepLabel::And => scenario.and.push(AndStep::new(context, text)),
        }
    }

    scenario
}

/// Title text with decorative markup removed
///
/// Only emphasis delimiters, backticks and stray `*` go; everything else,
/// including text that would parse as a list marker or inline HTML, is kept
/// verbatim. A leftover `_` wrapper at either end is trimmed.
#[must_use]
pub fn strip_markup(inline: &str) -> String {
    let mut keep = vec![true; inline.len()];
    for (event, range) in MdParser::new(inline).into_offset_iter() {
        let width = match event {
            Event::Start(Tag::Emphasis) => 1,
            Event::Start(Tag::Strong) => 2,
            _ => continue,
        };
        if range.len() < 2 * width {
            continue;
        }
        keep[range.start..range.start + width].fill(false);
        keep[range.end - width..range.end].fill(false);
    }

    let text: String = inline
        .char_indices()
        .filter(|(idx, _)| keep[*idx])
        .map(|(_, c)| c)
        .collect();
    text.replace(['*', '`'], "")
        .trim_matches(|c: char| c == '_' || c.is_whitespace())
        .to_string()
}

/// Scenario id from a heading token (`7`, `T7`, `TC07`); `None` when absent or zero
#[must_use]
pub fn scenario_number(token: &str) -> Option<u32> {
    ID_PREFIX
        .captures(token)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|id| *id > 0)
}

/// An open scenario block while scanning
#[derive(Debug)]
struct ScenarioBlock<'a> {
    level: usize,
    token: &'a str,
    raw_title: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> ScenarioBlock<'a> {
    fn open(line: &'a str) -> Option<Self> {
        let caps = SCENARIO_HEADING.captures(line)?;
        Some(Self {
            level: caps.get(1)?.as_str().len(),
            token: caps.get(2)?.as_str(),
            raw_title: caps.get(3).map_or("", |m| m.as_str()),
            lines: Vec::new(),
        })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        if THEMATIC_BREAK.is_match(line) {
            return true;
        }
        HEADING
            .captures(line)
            .is_some_and(|caps| caps[1].len() < self.level)
    }

    fn finish(self, ordinal: usize) -> Scenario {
        let id = scenario_number(self.token)
            .unwrap_or_else(|| u32::try_from(ordinal).unwrap_or(u32::MAX));
        tracing::trace!(id, token = self.token, lines = self.lines.len(), "scenario block");
        extract_steps(id, strip_markup(self.raw_title), &self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn metadata_first_match_wins() {
        let md = "**Test Plan ID**: TP-1\n**Work Item**: 330789 - Vendor approval\n\
                  **Project**: Supply\n**Feature**: Approvals\n**Project**: Other\n";
        let meta = extract_metadata(md);
        assert_eq!(meta.test_plan_id, "TP-1");
        assert_eq!(meta.work_item, "330789 - Vendor approval");
        assert_eq!(meta.project, "Supply");
        assert_eq!(meta.feature, "Approvals");
    }

    #[test]
    fn metadata_defaults_to_empty() {
        let meta = extract_metadata("# Plan without metadata\n");
        assert_eq!(meta, Metadata::default());
    }

    #[test]
    fn metadata_tolerates_list_markers_and_inner_colon() {
        let md = "- **work item:** 42 - Thing\n";
        assert_eq!(extract_metadata(md).work_item, "42 - Thing");
    }

    #[test]
    fn and_inherits_when_context() {
        let scenario = extract_steps(1, "t".into(), &["**When** step A", "**And** step B"]);
        assert_eq!(scenario.when, ["step A"]);
        assert_eq!(scenario.and, [AndStep::new(StepContext::When, "step B")]);
    }

    #[test]
    fn and_before_any_label_is_given() {
        let scenario = extract_steps(1, "t".into(), &["**And** orphan", "**Then** done"]);
        assert_eq!(scenario.and, [AndStep::new(StepContext::Given, "orphan")]);
    }

    #[test]
    fn machine_only_moves_on_group_labels() {
        let mut machine = ContextMachine::new();
        assert_eq!(machine.observe(StepLabel::And), StepContext::Given);
        assert_eq!(machine.observe(StepLabel::Then), StepContext::Then);
        assert_eq!(machine.observe(StepLabel::And), StepContext::Then);
        assert_eq!(machine.observe(StepLabel::When), StepContext::When);
        assert_eq!(machine.current(), StepContext::When);
    }

    #[test]
    fn repeated_labels_each_yield_a_step() {
        let lines = [
            "- **Given** first",
            "- **Given:** second",
            "- **Then**: third",
            "**Given**   ",
        ];
        let scenario = extract_steps(1, "t".into(), &lines);
        assert_eq!(scenario.given, ["first", "second"]);
        assert_eq!(scenario.then, ["third"]);
    }

    #[test]
    fn priority_takes_first_word() {
        let scenario = extract_steps(1, "t".into(), &["**Priority**: High (blocker)"]);
        assert_eq!(scenario.priority, "High");
        let default = extract_steps(1, "t".into(), &[]);
        assert_eq!(default.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn scenario_number_variants() {
        assert_eq!(scenario_number("7"), Some(7));
        assert_eq!(scenario_number("TC07"), Some(7));
        assert_eq!(scenario_number("t12"), Some(12));
        assert_eq!(scenario_number("0"), None);
        assert_eq!(scenario_number("Login"), None);
    }

    #[test]
    fn strip_markup_removes_emphasis() {
        assert_eq!(strip_markup("**Create New Vendor!**"), "Create New Vendor!");
        assert_eq!(strip_markup("Post *the* `invoice`"), "Post the invoice");
        assert_eq!(strip_markup("Dangling **"), "Dangling");
        assert_eq!(strip_markup("_Approve vendor_"), "Approve vendor");
    }

    #[test]
    fn strip_markup_keeps_literal_text() {
        assert_eq!(strip_markup("Approve vendor_"), "Approve vendor");
        assert_eq!(strip_markup("Create <Vendor> record"), "Create <Vendor> record");
        assert_eq!(strip_markup("1. Post invoice"), "1. Post invoice");
        assert_eq!(strip_markup("+ Add discount line"), "+ Add discount line");
        assert_eq!(strip_markup("snake_case stays"), "snake_case stays");
    }

    #[test]
    fn heading_titles_keep_their_text() {
        let md = "\
### _Scenario 1: Approve vendor_
### Scenario 2: Create <Vendor> record
### Scenario 3: 1. Post invoice
### Scenario 4: + Add discount line
";
        let titles: Vec<_> = parse_test_plan(md)
            .scenarios
            .into_iter()
            .map(|s| (s.id, s.title))
            .collect();
        assert_eq!(
            titles,
            [
                (1, "Approve vendor".to_string()),
                (2, "Create <Vendor> record".to_string()),
                (3, "1. Post invoice".to_string()),
                (4, "+ Add discount line".to_string()),
            ]
        );
    }

    #[test]
    fn duplicate_headings_are_kept_apart() {
        let md = "### Scenario 1: A\n**Given** first\n### Scenario 1: A\n**Given** second\n";
        let doc = parse_test_plan(md);
        let ids: Vec<_> = doc.scenarios.iter().map(|s| s.id).collect();
        assert_eq!(ids, [1, 1]);
        assert_eq!(doc.scenarios[0].given, ["first"]);
        assert_eq!(doc.scenarios[1].given, ["second"]);
    }

    #[test]
    fn ordinal_fallback_may_collide() {
        let doc = parse_test_plan("### Scenario 2: Two\n### Scenario X: Unnumbered\n");
        let ids: Vec<_> = doc.scenarios.iter().map(|s| s.id).collect();
        assert_eq!(ids, [2, 2]);
    }

    #[test]
    fn blocks_end_at_rules_and_higher_headings() {
        let md = "\
### Scenario 1: First
**Given** a
---
**Given** outside
### Scenario 2: Second
**Given** b
## Next section
**Given** also outside
";
        let doc = TestPlanParser::new().parse(md);
        assert_eq!(doc.scenarios.len(), 2);
        assert_eq!(doc.scenarios[0].given, ["a"]);
        assert_eq!(doc.scenarios[1].given, ["b"]);
    }

    #[test]
    fn lower_headings_stay_inside_block() {
        let md = "### Scenario 1: First\n#### Notes\n**Then** kept\n";
        let doc = parse_test_plan(md);
        assert_eq!(doc.scenarios[0].then, ["kept"]);
    }

    #[test]
    fn emphasised_heading_and_ordinal_fallback() {
        let md = "### **Scenario 4: Approve vendor**\n### Scenario Login: Sign in\n";
        let doc = parse_test_plan(md);
        assert_eq!(doc.scenarios[0].id, 4);
        assert_eq!(doc.scenarios[0].title, "Approve vendor");
        assert_eq!(doc.scenarios[1].id, 2);
        assert_eq!(doc.scenarios[1].title, "Sign in");
    }

    #[test]
    fn bodyless_heading_is_not_an_error() {
        let doc = parse_test_plan("### Scenario 9: Nothing here");
        let s = &doc.scenarios[0];
        assert_eq!(s.id, 9);
        assert_eq!(s.step_count(), 0);
        assert_eq!(s.priority, DEFAULT_PRIORITY);
    }
}
