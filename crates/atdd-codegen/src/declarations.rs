//! Keyword tables driving declarations and handler wiring
//!
//! Matching is case-insensitive substring search over scenario text. Table
//! order is emission order, independent of where keywords occur in the text.

use atdd_plan::Scenario;

/// Declarations added when a keyword occurs in a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationRule {
    /// Lower-case keyword
    pub keyword: &'static str,
    /// Local variable declarations, in emission order
    pub declarations: &'static [&'static str],
}

/// Keyword → declarations, applied independently in this order
pub static DECLARATION_TABLE: &[DeclarationRule] = &[
    DeclarationRule {
        keyword: "requisition",
        declarations: &[
            "RequisitionLine: Record \"Requisition Line\";",
            "RequisitionWkshName: Record \"Requisition Wksh. Name\";",
        ],
    },
    DeclarationRule {
        keyword: "item",
        declarations: &["Item: Record Item;"],
    },
    DeclarationRule {
        keyword: "vendor",
        declarations: &["Vendor: Record Vendor;"],
    },
    DeclarationRule {
        keyword: "worksheet",
        declarations: &["RequisitionWorksheet: TestPage \"Requisition Worksheet\";"],
    },
];

/// Declared when no keyword matches
pub const FALLBACK_DECLARATION: &str = "TempBlob: Codeunit \"Temp Blob\";";

/// Words that make a scenario need the message/confirm handlers
pub const HANDLER_TRIGGERS: [&str; 5] = ["warning", "confirmation", "dialog", "message", "prompt"];

/// Local declarations for a scenario's GIVEN/WHEN/THEN text
#[must_use]
pub fn local_declarations(scenario: &Scenario) -> Vec<&'static str> {
    let text = scenario.step_text().to_lowercase();
    let declarations: Vec<&'static str> = DECLARATION_TABLE
        .iter()
        .filter(|rule| text.contains(rule.keyword))
        .flat_map(|rule| rule.declarations.iter().copied())
        .collect();

    if declarations.is_empty() {
        vec![FALLBACK_DECLARATION]
    } else {
        declarations
    }
}

/// True when any step, AND steps included, mentions a handler trigger
#[must_use]
pub fn needs_handlers(scenario: &Scenario) -> bool {
    let text = scenario.full_text().to_lowercase();
    HANDLER_TRIGGERS.iter().any(|word| text.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atdd_plan::{AndStep, StepContext};
    use pretty_assertions::assert_eq;

    fn scenario(given: &str, when: &str, then: &str) -> Scenario {
        let mut s = Scenario::new(1, "t");
        s.given.push(given.into());
        s.when.push(when.into());
        s.then.push(then.into());
        s
    }

    #[test]
    fn declarations_follow_table_order() {
        let s = scenario("a Vendor", "open the WORKSHEET", "the requisition exists");
        assert_eq!(
            local_declarations(&s),
            [
                "RequisitionLine: Record \"Requisition Line\";",
                "RequisitionWkshName: Record \"Requisition Wksh. Name\";",
                "Vendor: Record Vendor;",
                "RequisitionWorksheet: TestPage \"Requisition Worksheet\";",
            ]
        );
    }

    #[test]
    fn fallback_when_nothing_matches() {
        let s = scenario("a customer", "posts", "done");
        assert_eq!(local_declarations(&s), [FALLBACK_DECLARATION]);
    }

    #[test]
    fn and_steps_do_not_drive_declarations() {
        let mut s = scenario("a customer", "posts", "done");
        s.and.push(AndStep::new(StepContext::Given, "an item"));
        assert_eq!(local_declarations(&s), [FALLBACK_DECLARATION]);
    }

    #[test]
    fn handler_triggers_include_and_steps() {
        let mut s = scenario("a customer", "posts", "done");
        assert!(!needs_handlers(&s));
        s.and.push(AndStep::new(StepContext::Then, "a Confirmation dialog opens"));
        assert!(needs_handlers(&s));
    }
}
