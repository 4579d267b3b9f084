//! AL test codeunit emission
//!
//! Output layout, top to bottom:
//!
//! 1. object header with the `[FEATURE]` comment in `OnRun`
//! 2. global `var` block
//! 3. `Initialize` and `SetTestPermissions`
//! 4. one `[Test]` procedure per scenario, in plan order
//! 5. `MessageHandler` and `ConfirmHandler` when any scenario needs them
//!
//! Every literal here is matched by the validator, so changes must keep both
//! sides in step.

use crate::declarations::{local_declarations, needs_handlers};
use crate::naming::procedure_name;
use crate::options::GenerationOptions;
use atdd_plan::{ParsedDocument, Scenario, StepContext};
use tracing::{debug, trace};

/// Work item number used when the plan has none
pub const DEFAULT_WORK_ITEM_NUMBER: &str = "000000";

/// Attribute wiring both handlers into a test
pub const HANDLER_FUNCTIONS_ATTRIBUTE: &str = "[HandlerFunctions('MessageHandler,ConfirmHandler')]";

/// Placeholder closing the WHEN group
pub const WHEN_PLACEHOLDER: &str = "// [WHEN] TODO: Implement action using TestPage";

/// Placeholder closing the THEN group
pub const THEN_PLACEHOLDER: &str = "// [THEN] TODO: Implement assertions using TestPage";

const INDENT: &str = "    ";

/// Line-oriented string builder with four-space indentation levels
#[derive(Debug, Default)]
struct Emitter {
    out: String,
}

impl Emitter {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text.trim_end());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn comment(&mut self, context: StepContext, text: &str) {
        self.line(2, &format!("// [{}] {text}", context.tag()));
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Renders parsed plans into AL test codeunits
#[derive(Debug, Clone, Default)]
pub struct CodeunitGenerator {
    options: GenerationOptions,
}

impl CodeunitGenerator {
    /// Create a generator for the given options
    #[must_use]
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    /// Options in use
    #[inline]
    #[must_use]
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Render one codeunit
    ///
    /// Options are used as given; call [`GenerationOptions::validate`] first
    /// when they come from user input.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(scenarios = doc.len(), codeunit_id = self.options.codeunit_id)
    )]
    #[must_use]
    pub fn generate(&self, doc: &ParsedDocument) -> String {
        let name = self.options.resolved_codeunit_name(&doc.metadata);
        let with_handlers = doc.scenarios.iter().any(needs_handlers);
        debug!(codeunit = %name, with_handlers, "generating codeunit");

        let mut e = Emitter::with_capacity(1024 + doc.len() * 512);
        self.header(&mut e, &name, doc);
        self.globals(&mut e);
        Self::setup_procedures(&mut e);
        for scenario in &doc.scenarios {
            Self::test_procedure(&mut e, scenario);
        }
        if with_handlers {
            Self::handlers(&mut e);
        }
        e.line(0, "}");
        e.finish()
    }

    fn header(&self, e: &mut Emitter, name: &str, doc: &ParsedDocument) {
        let number = doc
            .metadata
            .work_item_number()
            .unwrap_or(DEFAULT_WORK_ITEM_NUMBER);

        e.line(0, &format!("codeunit {} {name}", self.options.codeunit_id));
        e.line(0, "{");
        e.line(1, "Subtype = Test;");
        e.blank();
        e.line(1, "trigger OnRun()");
        e.line(1, "begin");
        e.line(
            2,
            &format!("// [FEATURE] User Story {number}: {}", doc.metadata.work_item),
        );
        e.line(1, "end;");
        e.blank();
    }

    fn globals(&self, e: &mut Emitter) {
        let library = &self.options.library_codeunit;
        e.line(1, "var");
        e.line(2, &format!("{library}: Codeunit {library};"));
        e.line(2, "LibraryAssert: Codeunit \"Library Assert\";");
        e.line(2, "LibraryVariableStorage: Codeunit \"Library - Variable Storage\";");
        e.line(2, "LibraryLowerPermissions: Codeunit \"Library - Lower Permissions\";");
        e.line(2, "IsInitialized: Boolean;");
        e.blank();
    }

    fn setup_procedures(e: &mut Emitter) {
        e.line(1, "local procedure Initialize()");
        e.line(1, "begin");
        e.line(2, "SetTestPermissions();");
        e.line(2, "LibraryVariableStorage.Clear();");
        e.blank();
        e.line(2, "if IsInitialized then");
        e.line(3, "exit;");
        e.blank();
        e.line(2, "Commit();");
        e.line(2, "IsInitialized := true;");
        e.line(1, "end;");
        e.blank();

        e.line(1, "local procedure SetTestPermissions()");
        e.line(1, "begin");
        e.line(2, "LibraryLowerPermissions.AddO365BusinessPremium();");
        e.line(1, "end;");
        e.blank();
    }

    fn test_procedure(e: &mut Emitter, scenario: &Scenario) {
        let name = procedure_name(scenario.id, &scenario.title);
        trace!(id = scenario.id, procedure = %name, "test procedure");

        e.line(1, "[Test]");
        if needs_handlers(scenario) {
            e.line(1, HANDLER_FUNCTIONS_ATTRIBUTE);
        }
        e.line(1, &format!("procedure {name}()"));
        e.line(1, "var");
        for declaration in local_declarations(scenario) {
            e.line(2, declaration);
        }
        e.line(1, "begin");
        e.line(
            2,
            &format!("// [SCENARIO {}] {}", scenario.id, scenario.title),
        );

        for step in scenario.group(StepContext::Given) {
            e.comment(StepContext::Given, step);
        }
        e.line(2, "Initialize();");
        e.blank();

        for step in scenario.group(StepContext::When) {
            e.comment(StepContext::When, step);
        }
        e.line(2, WHEN_PLACEHOLDER);
        e.blank();

        for step in scenario.group(StepContext::Then) {
            e.comment(StepContext::Then, step);
        }
        e.line(2, THEN_PLACEHOLDER);
        e.line(1, "end;");
        e.blank();
    }

    fn handlers(e: &mut Emitter) {
        e.line(1, "[MessageHandler]");
        e.line(1, "procedure MessageHandler(Message: Text[1024])");
        e.line(1, "begin");
        e.line(2, "LibraryVariableStorage.Enqueue(Message);");
        e.line(1, "end;");
        e.blank();

        e.line(1, "[ConfirmHandler]");
        e.line(1, "procedure ConfirmHandler(Question: Text[1024]; var Reply: Boolean)");
        e.line(1, "begin");
        e.line(2, "Reply := LibraryVariableStorage.DequeueBoolean();");
        e.line(1, "end;");
        e.blank();
    }
}

/// Render `doc` as one AL test codeunit
#[must_use]
pub fn generate_test_codeunit(doc: &ParsedDocument, options: &GenerationOptions) -> String {
    CodeunitGenerator::new(options.clone()).generate(doc)
}
