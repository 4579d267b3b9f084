//! Structural scan of AL source: procedures, triggers and `var` blocks
//!
//! Works line by line over the masked view. A procedure body is delimited by
//! `begin`/`end` nesting, with `case` opening a level of its own.

use crate::source::SourceText;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::RangeInclusive;

static PROCEDURE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:local|internal|protected)\s+)?procedure\s+").unwrap()
});

static PROCEDURE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)procedure\s+("[^"]*"|'[^']*'|[A-Za-z0-9_]+)"#).unwrap()
});

static TRIGGER_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*trigger\s+([A-Za-z0-9_]+)").unwrap());

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\s*([A-Za-z]+)").unwrap());

static ATTRIBUTE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\s*\[[^\]\n]*\])+").unwrap());

static BLOCK_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[^.\w])(begin|case|end)\b").unwrap());

static QUOTED_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"\n]*""#).unwrap());

static VAR_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*var\s*$").unwrap());

static VAR_BLOCK_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:begin|procedure|local|internal|protected|trigger)\b|\[|\})")
        .unwrap()
});

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^\s*((?:"[^"]*"|[A-Za-z_]\w*)(?:\s*,\s*(?:"[^"]*"|[A-Za-z_]\w*))*)\s*:\s*(?:temporary\s+)?([A-Za-z]+)"#,
    )
    .unwrap()
});

/// Procedure or trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
    /// `procedure`, including `local` and `internal` ones
    Procedure,
    /// `trigger OnRun()` and friends
    Trigger,
}

/// One procedure or trigger with its attributes and extent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    /// Name as written, quotes included
    pub name: String,
    /// Procedure or trigger
    pub kind: RoutineKind,
    /// Attribute names preceding the header (`Test`, `HandlerFunctions`)
    pub attributes: Vec<String>,
    /// Line of the `[Test]` attribute, if any
    pub test_line: Option<usize>,
    /// Line of the header
    pub header_line: usize,
    /// Line of the closing `end`; the last line of input when unbalanced
    pub end_line: usize,
}

impl Routine {
    /// Carries a `[Test]` attribute
    #[inline]
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.test_line.is_some()
    }

    /// Line reported for issues about the routine as a whole
    #[inline]
    #[must_use]
    pub fn anchor_line(&self) -> usize {
        self.test_line.unwrap_or(self.header_line)
    }

    /// Header through closing `end`
    #[inline]
    #[must_use]
    pub fn lines(&self) -> RangeInclusive<usize> {
        self.header_line..=self.end_line
    }
}

/// Named variables sharing one type in a declaration line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Line of the declaration
    pub line: usize,
    /// Declared names, as written
    pub names: String,
    /// Base type keyword (`Record`, `Codeunit`, `Boolean`)
    pub type_name: String,
}

/// Declarations of one `var` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarBlock {
    /// Line of the `var` keyword
    pub line: usize,
    /// Declarations in source order
    pub declarations: Vec<Declaration>,
}

fn block_delta(masked_line: &str) -> i32 {
    let plain = QUOTED_NAME.replace_all(masked_line, "");
    BLOCK_WORD
        .captures_iter(&plain)
        .map(|caps| {
            if caps[1].eq_ignore_ascii_case("end") {
                -1
            } else {
                1
            }
        })
        .sum()
}

/// Every procedure and trigger in source order
#[must_use]
pub fn scan_routines(source: &SourceText<'_>) -> Vec<Routine> {
    let mut routines = Vec::new();
    let mut attributes: Vec<String> = Vec::new();
    let mut test_line = None;
    let mut open: Option<(Routine, i32, bool)> = None;
    let mut last_line = 0;

    for (line_no, raw, masked) in source.lines() {
        last_line = line_no;

        if let Some((mut routine, mut depth, mut started)) = open.take() {
            let delta = block_delta(masked);
            if delta != 0 || started {
                started = true;
                depth += delta;
                if depth <= 0 {
                    routine.end_line = line_no;
                    routines.push(routine);
                } else {
                    open = Some((routine, depth, started));
                }
                continue;
            }
            // Declarations between header and `begin` keep the routine open;
            // a new header means the previous one had no body.
            if !PROCEDURE_HEADER.is_match(masked) && !TRIGGER_HEADER.is_match(masked) {
                open = Some((routine, depth, started));
                continue;
            }
            routine.end_line = line_no.saturating_sub(1).max(routine.header_line);
            routines.push(routine);
        }

        let (raw, masked) = if masked.trim_start().starts_with('[') {
            // Attributes may share the line with the header they decorate.
            let split = ATTRIBUTE_PREFIX
                .find(masked)
                .map_or(masked.len(), |m| m.end());
            for caps in ATTRIBUTE.captures_iter(&masked[..split]) {
                if caps[1].eq_ignore_ascii_case("test") {
                    test_line = Some(line_no);
                }
                attributes.push(caps[1].to_string());
            }
            if masked[split..].trim().is_empty() {
                continue;
            }
            (&raw[split..], &masked[split..])
        } else {
            (raw, masked)
        };
        let trimmed = masked.trim();

        let header = if PROCEDURE_HEADER.is_match(masked) {
            PROCEDURE_NAME
                .captures(raw)
                .map(|caps| (caps[1].to_string(), RoutineKind::Procedure))
        } else {
            TRIGGER_HEADER
                .captures(masked)
                .map(|caps| (caps[1].to_string(), RoutineKind::Trigger))
        };

        if let Some((name, kind)) = header {
            let routine = Routine {
                name,
                kind,
                attributes: std::mem::take(&mut attributes),
                test_line: test_line.take(),
                header_line: line_no,
                end_line: line_no,
            };
            open = Some((routine, 0, false));
        } else if !trimmed.is_empty() {
            attributes.clear();
            test_line = None;
        }
    }

    if let Some((mut routine, _, _)) = open {
        routine.end_line = last_line.max(routine.header_line);
        routines.push(routine);
    }

    routines
}

/// Every `var` section with its typed declarations
#[must_use]
pub fn scan_var_blocks(source: &SourceText<'_>) -> Vec<VarBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<VarBlock> = None;

    for (line_no, _, masked) in source.lines() {
        if VAR_LINE.is_match(masked) {
            blocks.extend(current.take());
            current = Some(VarBlock {
                line: line_no,
                declarations: Vec::new(),
            });
            continue;
        }

        if current.is_none() {
            continue;
        }
        if VAR_BLOCK_END.is_match(masked) {
            blocks.extend(current.take());
            continue;
        }
        if let (Some(block), Some(caps)) = (current.as_mut(), DECLARATION.captures(masked)) {
            block.declarations.push(Declaration {
                line: line_no,
                names: caps[1].to_string(),
                type_name: caps[2].to_string(),
            });
        }
    }

    blocks.extend(current);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CODE: &str = r#"codeunit 50100 DemoTests
{
    Subtype = Test;

    trigger OnRun()
    begin
    end;

    var
        Assert: Codeunit "Library Assert";
        IsInitialized: Boolean;

    [Test]
    [HandlerFunctions('MessageHandler')]
    procedure T0001_First()
    var
        Item: Record Item;
        Vendor, OtherVendor: Record Vendor;
    begin
        case Item.Type of
            Item.Type::Inventory:
                begin
                    Message('end');
                end;
        end;
        // end
    end;

    local procedure "Helper Proc"()
    begin
    end;
}
"#;

    #[test]
    fn finds_routines_with_extents() {
        let source = SourceText::new(CODE);
        let routines = scan_routines(&source);
        let summary: Vec<_> = routines
            .iter()
            .map(|r| (r.name.as_str(), r.kind, r.is_test(), r.header_line, r.end_line))
            .collect();
        assert_eq!(
            summary,
            [
                ("OnRun", RoutineKind::Trigger, false, 5, 7),
                ("T0001_First", RoutineKind::Procedure, true, 15, 27),
                ("\"Helper Proc\"", RoutineKind::Procedure, false, 29, 31),
            ]
        );
        assert_eq!(routines[1].test_line, Some(13));
        assert_eq!(routines[1].attributes, ["Test", "HandlerFunctions"]);
    }

    #[test]
    fn finds_var_blocks() {
        let source = SourceText::new(CODE);
        let blocks = scan_var_blocks(&source);
        assert_eq!(blocks.len(), 2);

        let global: Vec<_> = blocks[0]
            .declarations
            .iter()
            .map(|d| (d.line, d.type_name.as_str()))
            .collect();
        assert_eq!(global, [(10, "Codeunit"), (11, "Boolean")]);

        let local: Vec<_> = blocks[1]
            .declarations
            .iter()
            .map(|d| (d.names.as_str(), d.type_name.as_str()))
            .collect();
        assert_eq!(local, [("Item", "Record"), ("Vendor, OtherVendor", "Record")]);
    }

    #[test]
    fn unbalanced_body_runs_to_end_of_input() {
        let source = SourceText::new("procedure Broken()\nbegin\n    x := 1;\n");
        let routines = scan_routines(&source);
        assert_eq!(routines.len(), 1);
        assert_eq!(routines[0].end_line, 3);
    }

    #[test]
    fn attributes_on_the_header_line() {
        let source = SourceText::new(
            "[Test] [HandlerFunctions('A]B')] procedure T0001_A()\nbegin\n    Commit();\nend;\n",
        );
        let routines = scan_routines(&source);
        assert_eq!(routines.len(), 1);
        let routine = &routines[0];
        assert_eq!(routine.name, "T0001_A");
        assert_eq!(routine.attributes, ["Test", "HandlerFunctions"]);
        assert_eq!((routine.test_line, routine.header_line, routine.end_line), (Some(1), 1, 4));
    }

    #[test]
    fn attributes_reset_on_other_code() {
        let source = SourceText::new("[Test]\nx := 1;\nprocedure P()\nbegin\nend;\n");
        let routines = scan_routines(&source);
        assert!(!routines[0].is_test());
    }
}
