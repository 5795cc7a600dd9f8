//! Structured diagnostics shared by the lexer and parser.
//!
//! Runtime (evaluator) problems are a different animal: they are ordinary [`crate::object::Value`]
//! values (`ERROR`) that flow through the language itself, not [`Diagnostic`]s. Keeping the two
//! separate is deliberate: a lex/parse problem happens before the program has any values to be
//! wrong about, while a runtime problem is a value like any other and can be inspected,
//! compared, and printed from within the language.

mod span;

pub use span::{Location, Span};

use serde::Serialize;
use std::fmt::{self, Display};

/// Which stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Kind {
    Parse,
    Runtime,
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Parse => f.write_str("parse"),
            Kind::Runtime => f.write_str("runtime"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
            Severity::Note => f.write_str("note"),
        }
    }
}

/// A labelled region of source attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelledSpan {
    pub location: Location,
    pub source_excerpt: Option<String>,
    pub label: Option<String>,
}

/// A fully structured diagnostic: the canonical representation per
/// [`crate::diagnostics`]'s module docs — every call site builds one of these through
/// [`DiagnosticBuilder`], even the ones that only need a single default span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: Kind,
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub spans: Vec<LabelledSpan>,
    pub notes: Vec<String>,
    pub suggestion: Option<String>,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(
                f,
                "{}[{}][{}]: {}",
                self.severity, code, self.kind, self.message
            )?,
            None => write!(f, "{}[{}]: {}", self.severity, self.kind, self.message)?,
        }

        if let Some(primary) = self.spans.first() {
            write!(f, "\n  --> {}", primary.location)?;
        }

        for span in &self.spans {
            if let Some(excerpt) = &span.source_excerpt {
                writeln!(f)?;
                write!(f, "   | {excerpt}")?;
                if let Some(label) = &span.label {
                    write!(f, "  ({label})")?;
                }
            }
        }

        for note in &self.notes {
            write!(f, "\n= note: {note}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n= help: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Build-style constructor for [`Diagnostic`], mirroring the two-phase lex/parse pipeline: a
/// diagnostic is opened with its kind/severity/message, spans and notes are attached as they
/// become available, and [`DiagnosticBuilder::build`] freezes the result.
pub struct DiagnosticBuilder {
    kind: Kind,
    severity: Severity,
    code: Option<String>,
    message: String,
    spans: Vec<LabelledSpan>,
    notes: Vec<String>,
    suggestion: Option<String>,
}

impl DiagnosticBuilder {
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            code: None,
            message: message.into(),
            spans: Vec::new(),
            notes: Vec::new(),
            suggestion: None,
        }
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn span(mut self, location: Location, source_excerpt: Option<String>) -> Self {
        self.spans.push(LabelledSpan {
            location,
            source_excerpt,
            label: None,
        });
        self
    }

    pub fn labelled_span(
        mut self,
        location: Location,
        source_excerpt: Option<String>,
        label: impl Into<String>,
    ) -> Self {
        self.spans.push(LabelledSpan {
            location,
            source_excerpt,
            label: Some(label.into()),
        });
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            kind: self.kind,
            severity: self.severity,
            code: self.code,
            message: self.message,
            spans: self.spans,
            notes: self.notes,
            suggestion: self.suggestion,
        }
    }
}

/// Extract a single line (1-based) from `source` as a borrowed substring. Indexes by byte, as
/// [`crate::diagnostics`] leaves code-point-aware column accounting to the lexer/parser that
/// produced the [`Location`] in the first place.
pub fn source_line(source: &str, line: usize) -> Option<&str> {
    source.lines().nth(line.checked_sub(1)?)
}

/// Extract an inclusive range of lines (1-based) from `source` as a single contiguous block.
pub fn source_block(source: &str, start_line: usize, end_line: usize) -> Option<&str> {
    if start_line == 0 || start_line > end_line {
        return None;
    }

    let mut offset = 0usize;
    let mut current = 1usize;
    let mut block_start = None;

    for line in source.split_inclusive('\n') {
        if current == start_line {
            block_start = Some(offset);
        }
        if current == end_line {
            let start = block_start?;
            let end = offset + line.len();
            return Some(source[start..end].trim_end_matches('\n'));
        }
        offset += line.len();
        current += 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_line() {
        let source = "first\nsecond\nthird";
        assert_eq!(source_line(source, 2), Some("second"));
        assert_eq!(source_line(source, 4), None);
    }

    #[test]
    fn extracts_line_block() {
        let source = "first\nsecond\nthird";
        assert_eq!(source_block(source, 1, 2), Some("first\nsecond"));
        assert_eq!(source_block(source, 2, 3), Some("second\nthird"));
    }

    #[test]
    fn renders_header_location_and_help() {
        let diagnostic = DiagnosticBuilder::new(Kind::Parse, "unexpected character: 'q'")
            .code("E100")
            .labelled_span(
                Location {
                    filename: None,
                    start_line: 1,
                    start_column: 3,
                    end_line: 1,
                    end_column: 3,
                },
                Some("a q b".to_owned()),
                "illegal character",
            )
            .suggestion("remove this character or check for encoding issues")
            .build();

        let rendered = diagnostic.to_string();
        assert!(rendered.starts_with("error[E100][parse]: unexpected character: 'q'"));
        assert!(rendered.contains("illegal character"));
        assert!(rendered.contains("= help: remove this character"));
    }
}
