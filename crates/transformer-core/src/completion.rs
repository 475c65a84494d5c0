//! Module completion tracking
//!
//! The "no transformer function" finding can only be decided once every
//! document of the default module has been analyzed. Documents may finish in
//! any order, so completion is a count-based barrier: the increment that
//! reaches the expected count decides, guarded by a single-fire latch.

use crate::diagnostics::{Diagnostic, DiagnosticCode, Location};
use crate::state::ModuleAnalysisState;

/// Decides when the module is complete and whether to report absence
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionTracker;

impl CompletionTracker {
    /// Create a tracker
    pub fn new() -> Self {
        Self
    }

    /// Report one processed document.
    ///
    /// Returns the absence diagnostic when this was the last expected
    /// document and no transformer function was found.
    pub fn on_document_processed(
        &self,
        state: &ModuleAnalysisState,
        module_part: Location,
    ) -> Option<Diagnostic> {
        let visited = state.visit_document();
        let expected = state.total_documents_expected();
        tracing::debug!(visited, expected, document = %module_part, "module part processed");

        if visited != expected {
            return None;
        }
        self.report_if_absent(state, module_part)
    }

    /// Settle a module whose barrier can never be reached because it has no
    /// countable documents.
    pub fn on_module_finished(
        &self,
        state: &ModuleAnalysisState,
        module: Location,
    ) -> Option<Diagnostic> {
        if state.total_documents_expected() != 0 {
            return None;
        }
        self.report_if_absent(state, module)
    }

    fn report_if_absent(
        &self,
        state: &ModuleAnalysisState,
        location: Location,
    ) -> Option<Diagnostic> {
        if state.found_valid_transformer_func() || !state.claim_completion() {
            return None;
        }
        tracing::warn!(location = %location, "no transformer function found in module");
        Some(Diagnostic::new(DiagnosticCode::NoTransformerFunction, location))
    }
}
