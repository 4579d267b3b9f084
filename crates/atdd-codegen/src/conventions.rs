//! Conventions the generator applies by construction

use serde::Serialize;

/// One convention honoured by generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Convention {
    /// Convention id
    pub id: &'static str,
    /// One-line summary
    pub summary: &'static str,
}

const fn convention(id: &'static str, summary: &'static str) -> Convention {
    Convention { id, summary }
}

static CONVENTIONS: [Convention; 10] = [
    convention("TEST_NAMING_PREFIX", "Test procedures are named T<4-digit id>_<PascalCaseTitle>"),
    convention("SCENARIO_COMMENT", "Each test opens with // [SCENARIO <id>] <title>"),
    convention("GIVEN_WHEN_THEN", "Steps are emitted as // [GIVEN], // [WHEN] and // [THEN] comments"),
    convention("AND_CONTEXT_INHERITANCE", "AND steps are emitted under the group they extend"),
    convention("NO_EXTRA_COMMENTS", "Test bodies contain only structural tag comments"),
    convention("NO_COMMENTS_IN_INITIALIZE", "Initialize() holds statements only"),
    convention("NO_COMMENTS_IN_SETTESTPERMISSIONS", "SetTestPermissions() holds a single statement"),
    convention("TESTPAGE_IN_WHEN", "Worksheet interaction goes through a TestPage declared per test"),
    convention("OBJECT_NAME_LENGTH", "Derived codeunit names never exceed 30 characters"),
    convention("SCENARIO_COUNT_MATCH", "One test procedure and one scenario tag per scenario"),
];

/// Conventions in documentation order
#[inline]
#[must_use]
pub fn applied_conventions() -> &'static [Convention] {
    &CONVENTIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = applied_conventions().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), applied_conventions().len());
        assert_eq!(applied_conventions()[0].id, "TEST_NAMING_PREFIX");
    }
}
