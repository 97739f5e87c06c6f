//! Non-fatal findings raised while translating.
//!
//! Translation never stops for a degraded mapping. Instead each finding is handed to a
//! [`DiagnosticSink`] that the caller injects into the [`Generator`](crate::generator::Generator).
//! The default sink discards everything; the command-line tool forwards to the logger.

use log::warn;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A single degraded-output finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Class the finding belongs to
    pub class: String,
    /// Method the finding belongs to
    pub method: String,
    /// What went wrong
    pub kind: DiagnosticKind,
}

/// Kinds of degraded output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A concrete source type mapped to the unknown sentinel
    UnmappedType { source: String, mapped: String },
    /// A parameter carries more than one recognized role annotation; the first is used
    AmbiguousParameter { parameter: String, ignored: String },
    /// More than one request body parameter; only the first is sent
    DuplicateBody { parameter: String, kept: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}: ", self.class, self.method)?;
        match &self.kind {
            DiagnosticKind::UnmappedType { source, mapped } => {
                write!(f, "type `{}` could not be mapped, emitted `{}`", source, mapped)
            }
            DiagnosticKind::AmbiguousParameter { parameter, ignored } => write!(
                f,
                "parameter `{}` has conflicting annotations, ignoring @{}",
                parameter, ignored
            ),
            DiagnosticKind::DuplicateBody { parameter, kept } => write!(
                f,
                "parameter `{}` is a second request body, only `{}` is sent",
                parameter, kept
            ),
        }
    }
}

/// Receiver for diagnostics.
///
/// Sinks are shared across threads when several files are translated at once.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Sink that drops every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Sink that forwards diagnostics to the `log` facade as warnings
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
    }
}

/// Sink that keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the collected diagnostics, leaving the sink empty
    pub fn take(&self) -> Vec<Diagnostic> {
        match self.diagnostics.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match self.diagnostics.lock() {
            Ok(mut guard) => guard.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
