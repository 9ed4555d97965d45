//! The public face of the verifier: the [`Session`] type.
//!
//! A session owns a [`FileResolver`] and runs one database verification at a
//! time.  All working state (token queue, name table, scope stack, stored
//! frames) is created for a `verify` call and dropped when it returns; only
//! the warning diagnostics survive, so a caller can report incomplete proofs
//! after a successful run.

use crate::diag::Diagnostic;
use crate::nameck::Nameset;
use crate::parser::{self, State};
use crate::scanner::{self, FileResolver};
use crate::scopeck::ScopeSet;
use crate::util::HashSet;
use log::debug;
use std::collections::VecDeque;

/// A verification session over a particular file resolver.
#[derive(Debug)]
pub struct Session<R> {
    resolver: R,
    warnings: Vec<Diagnostic>,
}

impl<R: FileResolver> Session<R> {
    /// Creates a session.  `resolver` is consulted for `$[ $]` inclusions,
    /// and for the root file when `verify` is not given its text; pass
    /// [`crate::NoIncludes`] for a hermetic run.
    pub fn new(resolver: R) -> Self {
        Session {
            resolver,
            warnings: Vec::new(),
        }
    }

    /// Verifies one database.
    ///
    /// When `initial_text` is supplied, tokenization starts from it under
    /// the name `root_name` (which still registers as included, so the
    /// database may not re-include itself); otherwise the resolver is asked
    /// for `root_name`.  Returns the first hard error, if any.  Warnings
    /// are available from [`Session::diagnostics`] either way.
    pub fn verify(
        &mut self,
        root_name: &str,
        initial_text: Option<&[u8]>,
    ) -> Result<(), Diagnostic> {
        self.warnings.clear();

        let mut included = HashSet::default();
        let mut tokens = VecDeque::new();
        scanner::read_tokens(
            root_name,
            initial_text,
            &mut self.resolver,
            &mut included,
            &mut tokens,
        )?;
        debug!("{} tokens read from {root_name}", tokens.len());

        let mut state = State {
            names: Nameset::default(),
            scopes: ScopeSet::default(),
            tokens,
            warnings: Vec::new(),
        };
        let result = parser::parse_database(&mut state);
        self.warnings = state.warnings;
        result
    }

    /// Warning diagnostics collected by the most recent `verify` call.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.warnings
    }
}
