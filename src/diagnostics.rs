//! Injected sink for recoverable failures that the game shrugs off but an
//! operator may want to see.

use std::cell::RefCell;
use std::fmt;

use tracing::warn;

/// Part of the system a diagnostic came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DiagnosticOrigin {
    Storage,
    Listener,
    Engine,
}

impl fmt::Display for DiagnosticOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Storage => "storage",
            Self::Listener => "listener",
            Self::Engine => "engine",
        };
        f.write_str(name)
    }
}

/// One reported failure.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Diagnostic {
    pub origin: DiagnosticOrigin,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(origin: DiagnosticOrigin, message: impl Into<String>) -> Self {
        Self {
            origin,
            message: message.into(),
        }
    }
}

/// Receives diagnostics from the engine and its parts.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        warn!(origin = %diagnostic.origin, "{}", diagnostic.message);
    }
}

/// Keeps every diagnostic in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: RefCell<Vec<Diagnostic>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything reported so far.
    #[must_use]
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, DiagnosticOrigin, DiagnosticSink, MemorySink, TracingSink};

    #[test]
    fn memory_sink_keeps_arrival_order() {
        let sink = MemorySink::new();

        sink.report(Diagnostic::new(DiagnosticOrigin::Storage, "first"));
        sink.report(Diagnostic::new(DiagnosticOrigin::Listener, "second"));

        let messages: Vec<String> = sink.entries().into_iter().map(|d| d.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn tracing_sink_accepts_reports_without_subscriber() {
        TracingSink.report(Diagnostic::new(DiagnosticOrigin::Engine, "ignored"));
    }
}
