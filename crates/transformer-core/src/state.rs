//! Per-compilation module analysis state
//!
//! One [`ModuleAnalysisState`] lives for one compilation pass and is shared
//! (through `Arc`) by every document analysis. All fields tolerate concurrent
//! mutation.
//!
//! Accepted transformer functions are keyed by (document ordinal,
//! declaration ordinal), so [`ModuleAnalysisState::transformer_func_names`]
//! returns the same order no matter which document finished first.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Position of a declaration within the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclarationKey {
    /// Ordinal of the document within its module
    pub document: usize,
    /// Ordinal of the declaration within its document
    pub declaration: usize,
}

#[derive(Debug, Clone)]
struct AcceptedFunction {
    key: DeclarationKey,
    name: String,
}

/// Shared accumulator for one compilation
#[derive(Debug, Default)]
pub struct ModuleAnalysisState {
    documents_visited: AtomicUsize,
    total_documents_expected: AtomicUsize,
    found_valid_transformer_func: AtomicBool,
    completion_reported: AtomicBool,
    transformer_funcs: Mutex<Vec<AcceptedFunction>>,
}

impl ModuleAnalysisState {
    /// Create state expecting the given number of documents
    pub fn new(total_documents_expected: usize) -> Self {
        Self {
            total_documents_expected: AtomicUsize::new(total_documents_expected),
            ..Default::default()
        }
    }

    /// Update the expected document count
    pub fn set_total_documents_expected(&self, total: usize) {
        self.total_documents_expected.store(total, Ordering::SeqCst);
    }

    /// Number of documents the module is expected to have
    pub fn total_documents_expected(&self) -> usize {
        self.total_documents_expected.load(Ordering::SeqCst)
    }

    /// Number of documents reported as processed
    pub fn documents_visited(&self) -> usize {
        self.documents_visited.load(Ordering::SeqCst)
    }

    /// Increment the visited counter and return the new value
    pub(crate) fn visit_document(&self) -> usize {
        self.documents_visited.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether at least one transformer function was recorded
    pub fn found_valid_transformer_func(&self) -> bool {
        self.found_valid_transformer_func.load(Ordering::SeqCst)
    }

    /// Record an accepted transformer function
    pub fn record_transformer(&self, key: DeclarationKey, name: impl Into<String>) {
        let name = name.into();
        tracing::debug!(name = %name, document = key.document, "recorded transformer function");
        self.lock_funcs().push(AcceptedFunction { key, name });
        self.found_valid_transformer_func.store(true, Ordering::SeqCst);
    }

    /// Accepted transformer function names in module order
    pub fn transformer_func_names(&self) -> Vec<String> {
        let mut funcs = self.lock_funcs().clone();
        funcs.sort_by_key(|func| func.key);
        funcs.into_iter().map(|func| func.name).collect()
    }

    /// Claim the right to report module completion.
    ///
    /// Returns `true` exactly once per state.
    pub(crate) fn claim_completion(&self) -> bool {
        self.completion_reported
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Whether the completion latch has fired
    pub fn completion_reported(&self) -> bool {
        self.completion_reported.load(Ordering::SeqCst)
    }

    fn lock_funcs(&self) -> std::sync::MutexGuard<'_, Vec<AcceptedFunction>> {
        self.transformer_funcs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(document: usize, declaration: usize) -> DeclarationKey {
        DeclarationKey {
            document,
            declaration,
        }
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = ModuleAnalysisState::new(3);
        assert_eq!(state.total_documents_expected(), 3);
        assert_eq!(state.documents_visited(), 0);
        assert!(!state.found_valid_transformer_func());
        assert!(state.transformer_func_names().is_empty());
        assert!(!state.completion_reported());
    }

    #[test]
    fn test_names_follow_module_order() {
        let state = ModuleAnalysisState::new(2);
        state.record_transformer(key(1, 0), "third");
        state.record_transformer(key(0, 4), "second");
        state.record_transformer(key(0, 1), "first");

        assert!(state.found_valid_transformer_func());
        assert_eq!(
            state.transformer_func_names(),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_visit_counts_up() {
        let state = ModuleAnalysisState::new(2);
        assert_eq!(state.visit_document(), 1);
        assert_eq!(state.visit_document(), 2);
        assert_eq!(state.documents_visited(), 2);
    }

    #[test]
    fn test_completion_claimed_once() {
        let state = ModuleAnalysisState::new(1);
        assert!(state.claim_completion());
        assert!(!state.claim_completion());
        assert!(state.completion_reported());
    }

    #[test]
    fn test_concurrent_records_are_ordered() {
        let state = Arc::new(ModuleAnalysisState::new(8));
        std::thread::scope(|scope| {
            for document in (0..8).rev() {
                let state = state.clone();
                scope.spawn(move || {
                    state.record_transformer(key(document, 0), format!("f{}", document));
                });
            }
        });
        let expected: Vec<String> = (0..8).map(|i| format!("f{}", i)).collect();
        assert_eq!(state.transformer_func_names(), expected);
    }
}
