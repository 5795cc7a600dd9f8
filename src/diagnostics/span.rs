use serde::Serialize;
use std::fmt::{self, Display};

/// A position within a source file. Lines and columns are 1-based; columns count code points,
/// not bytes, so they line up with what a human sees when counting characters in their editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub filename: Option<String>,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Location {
    pub fn point(filename: Option<String>, line: usize, column: usize) -> Self {
        Self {
            filename,
            start_line: line,
            start_column: column,
            end_line: line,
            end_column: column,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(name) => write!(f, "{}:{}:{}", name, self.start_line, self.start_column),
            None => write!(f, "line {}:{}", self.start_line, self.start_column),
        }
    }
}

/// A contiguous region of source together with the line it was cut from, used to build
/// [`super::LabelledSpan`]s once a renderer also wants to underline the region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub location: Location,
}

impl Span {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}
