//! Testing utilities for the ATDD workspace
//!
//! Markdown plan and AL codeunit fixtures shared by the crates' tests.
//! Builders return plain strings so this crate depends on nothing else in the
//! workspace.

#![allow(missing_docs)]

use std::fmt::Write as _;

/// A realistic plan: metadata, AND steps in every group, a handler trigger
pub const SAMPLE_PLAN: &str = r"# Test Plan: Approved Supplier List

**Test Plan ID**: TP-182-001
**Work Item**: 330789 - Approved supplier list enforcement
**Project**: Supply Chain
**Feature**: Vendor approval

## Scenarios

### Scenario 1: Block unapproved vendor on requisition
**Priority**: High
- **Given** a vendor that is not on the approved supplier list
- **And** an item supplied by that vendor
- **When** the user enters the vendor on a requisition line
- **Then** an error message is shown
- **And** the requisition line keeps its previous vendor

### Scenario 2: Accept approved vendor
- **Given** an approved vendor
- **When** the user enters the vendor on a requisition line
- **And** confirms the change
- **Then** the requisition line is updated

### **Scenario 3: Carry approval to worksheet**
**Priority**: Low
- **Given** an approved vendor with an item
- **When** the user opens the worksheet
- **Then** the approval status column shows Approved

---

## Out of scope
- **Given** this line belongs to no scenario
";

/// A plan whose scenarios each hit exactly one declaration keyword
pub const CLEAN_PLAN: &str = r"**Work Item**: 4711 - Vendor card checks

### Scenario 1: Create new vendor
- **Given** a vendor number series
- **When** a vendor is created
- **Then** the vendor exists

### Scenario 2: Blocked item
- **Given** a blocked item
- **When** the item is posted
- **Then** posting fails
";

/// Fluent builder for markdown test plans
#[derive(Debug, Default, Clone)]
pub struct PlanBuilder {
    out: String,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata(mut self, label: &str, value: &str) -> Self {
        let _ = writeln!(self.out, "**{label}**: {value}");
        self
    }

    pub fn work_item(self, value: &str) -> Self {
        self.metadata("Work Item", value)
    }

    pub fn scenario(mut self, token: &str, title: &str) -> Self {
        let _ = writeln!(self.out, "\n### Scenario {token}: {title}");
        self
    }

    pub fn priority(mut self, value: &str) -> Self {
        let _ = writeln!(self.out, "**Priority**: {value}");
        self
    }

    pub fn given(self, text: &str) -> Self {
        self.step("Given", text)
    }

    pub fn when(self, text: &str) -> Self {
        self.step("When", text)
    }

    pub fn then(self, text: &str) -> Self {
        self.step("Then", text)
    }

    pub fn and(self, text: &str) -> Self {
        self.step("And", text)
    }

    pub fn rule(mut self) -> Self {
        self.out.push_str("\n---\n");
        self
    }

    pub fn line(mut self, raw: &str) -> Self {
        self.out.push_str(raw);
        self.out.push('\n');
        self
    }

    pub fn build(self) -> String {
        self.out
    }

    fn step(mut self, label: &str, text: &str) -> Self {
        let _ = writeln!(self.out, "- **{label}** {text}");
        self
    }
}

/// A conforming test procedure body for scenario `id`
pub fn conforming_test(id: u32, name: &str) -> String {
    format!(
        "    [Test]
    procedure {name}()
    var
        Vendor: Record Vendor;
    begin
        // [SCENARIO {id}] Scenario {id}
        // [GIVEN] a vendor
        Initialize();

        // [WHEN] something happens
        // [THEN] it worked
    end;

"
    )
}

/// Fluent builder for AL test codeunits
#[derive(Debug, Clone)]
pub struct CodeunitBuilder {
    header: String,
    body: String,
}

impl CodeunitBuilder {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            header: format!("codeunit {id} {name}\n{{\n    Subtype = Test;\n\n"),
            body: String::new(),
        }
    }

    /// Append raw AL text inside the object
    pub fn raw(mut self, text: &str) -> Self {
        self.body.push_str(text);
        self
    }

    /// Append [`conforming_test`] for `id`
    pub fn conforming_test(self, id: u32) -> Self {
        let name = format!("T{id:04}_Scenario{id}");
        let text = conforming_test(id, &name);
        self.raw(&text)
    }

    /// Append a non-test procedure with the given body lines
    pub fn procedure(mut self, name: &str, body: &[&str]) -> Self {
        let _ = writeln!(self.body, "    local procedure {name}()\n    begin");
        for line in body {
            let _ = writeln!(self.body, "        {line}");
        }
        self.body.push_str("    end;\n\n");
        self
    }

    pub fn build(self) -> String {
        format!("{}{}}}\n", self.header, self.body)
    }
}

/// 1-based line of the first line containing `needle`
pub fn line_of(code: &str, needle: &str) -> usize {
    code.lines()
        .position(|line| line.contains(needle))
        .map_or(0, |idx| idx + 1)
}
