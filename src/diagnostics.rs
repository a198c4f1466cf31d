//! Diagnostic aggregation: collect every violation in a stage before
//! surfacing a failure, rather than aborting on the first one. See spec.md
//! §4.1 and §7.

use std::fmt;

use crate::bundle::FileId;

/// A point in the original `.proto` source, attached by the (external)
/// parser. Every stage threads this through unchanged; nothing at this
/// layer ever constructs one from scratch except in tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub file: FileId,
    pub line: u32,
    pub column: u32,
}

/// This layer only ever produces errors (spec.md §6: "Severity is always
/// 'error' at this layer"); the variant exists so the type matches the
/// external diagnostics-channel contract and so a future warning-producing
/// stage has somewhere to plug in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<Span>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: Span) -> Self {
        self.location = Some(location);
        self
    }

    pub fn at_opt(mut self, location: Option<Span>) -> Self {
        self.location = location;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " ({}:{}:{})", loc.file, loc.line, loc.column)?;
        }
        Ok(())
    }
}

/// A non-empty, emission-ordered list of diagnostics. Constructed only by
/// [`Diagnostics::into_result`]; a stage that emits nothing never produces
/// one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticList(Vec<Diagnostic>);

impl DiagnosticList {
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl fmt::Display for DiagnosticList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, diag) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diag)?;
        }
        Ok(())
    }
}

/// A scoped region that fallible stage operations emit diagnostics into.
///
/// Mirrors the teacher's `Result<T, String>`-returning constructors (e.g.
/// `extern_paths::ExternPaths::new`, `message_graph::MessageGraph::new`) but
/// generalized to *accumulate* rather than short-circuit on the first
/// problem, per spec.md §4.1's rationale: "a single malformed message should
/// not hide the nine others."
#[derive(Debug, Default)]
pub struct Diagnostics {
    emitted: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::trace!("diagnostic: {}", diagnostic.message);
        self.emitted.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.emitted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emitted.len()
    }

    /// Merges diagnostics emitted in a nested region into this one, in
    /// emission order. Inner regions forward their diagnostics to the outer
    /// region unless explicitly materialized, per spec.md §4.1.
    pub fn extend(&mut self, other: Diagnostics) {
        self.emitted.extend(other.emitted);
    }

    /// Merges an already-materialized [`DiagnosticList`] back into this
    /// region — used by the pipeline to keep collecting from later files
    /// after an earlier stage invocation already failed for some of them.
    pub fn extend_from_list(&mut self, other: DiagnosticList) {
        self.emitted.extend(other.0);
    }

    /// Materializes the region: `Ok(value)` if nothing was emitted,
    /// otherwise the full ordered list of diagnostics.
    pub fn into_result<T>(self, value: T) -> Result<T, DiagnosticList> {
        if self.emitted.is_empty() {
            Ok(value)
        } else {
            Err(DiagnosticList(self.emitted))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_region_succeeds() {
        let diags = Diagnostics::new();
        assert_eq!(diags.into_result(42), Ok(42));
    }

    #[test]
    fn nonempty_region_aggregates_in_order() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::error("first"));
        diags.push(Diagnostic::error("second"));
        let err = diags.into_result(()).unwrap_err();
        let messages: Vec<_> = err.as_slice().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn nested_region_forwards_to_outer() {
        let mut outer = Diagnostics::new();
        let mut inner = Diagnostics::new();
        inner.push(Diagnostic::error("inner problem"));
        outer.extend(inner);
        assert_eq!(outer.len(), 1);
    }
}
