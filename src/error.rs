// Author: Dustin Pilgrim
// License: MIT

use thiserror::Error;

use crate::value::ValueType;

/// The main error type for FORGE lexing, parsing and value access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForgeError {
    /// Grammar violation, including illegal tokens coming out of the lexer.
    #[error("[FORGE] Syntax Error at {}: {message}{}", fmt_location(.origin, .line, .column), fmt_hint(.hint))]
    Syntax {
        message: String,
        origin: Option<String>,
        line: usize,
        column: usize,
        hint: Option<String>,
    },

    /// A reference path walked through a value that is not a section.
    #[error(
        "[FORGE] Reference Type Error at {}: '{reference}' expected SECTION at '{visited}', found {found}",
        fmt_location(.origin, .line, .column)
    )]
    ReferenceType {
        reference: String,
        visited: String,
        found: ValueType,
        origin: Option<String>,
        line: usize,
        column: usize,
    },

    /// A reference path segment does not exist.
    #[error(
        "[FORGE] Reference Missing Error at {}: '{reference}', '{visited}' does not have key '{key}'",
        fmt_location(.origin, .line, .column)
    )]
    ReferenceMissing {
        reference: String,
        visited: String,
        key: String,
        origin: Option<String>,
        line: usize,
        column: usize,
    },

    /// A reference would alias a section that is still being populated.
    #[error(
        "[FORGE] Reference Cycle Error at {}: '{reference}' refers to a section enclosing this setting",
        fmt_location(.origin, .line, .column)
    )]
    ReferenceCycle {
        reference: String,
        origin: Option<String>,
        line: usize,
        column: usize,
    },

    /// Coercion of a value to a primitive type failed.
    #[error("[FORGE] Conversion Error: could not convert {found} to {target}{}", fmt_detail(.detail))]
    Conversion {
        found: ValueType,
        target: ValueType,
        detail: Option<String>,
    },

    /// A primary or included file could not be opened or read.
    #[error("[FORGE] File Error '{path}': {message}")]
    File { message: String, path: String },

    /// Malformed include pattern, include cycle or include depth overflow.
    #[error("[FORGE] Include Error at {}: {message} (pattern \"{pattern}\")", fmt_location(.origin, .line, .column))]
    Include {
        message: String,
        pattern: String,
        origin: Option<String>,
        line: usize,
        column: usize,
    },
}

impl ForgeError {
    /// Stable numeric code for the error family.
    pub fn code(&self) -> u32 {
        match self {
            ForgeError::Syntax { .. } => 101,
            ForgeError::ReferenceType { .. } => 201,
            ForgeError::ReferenceMissing { .. } => 202,
            ForgeError::ReferenceCycle { .. } => 203,
            ForgeError::File { .. } => 301,
            ForgeError::Include { .. } => 302,
            ForgeError::Conversion { .. } => 401,
        }
    }

    /// Source position of the error, if it has one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            ForgeError::Syntax { line, column, .. }
            | ForgeError::ReferenceType { line, column, .. }
            | ForgeError::ReferenceMissing { line, column, .. }
            | ForgeError::ReferenceCycle { line, column, .. }
            | ForgeError::Include { line, column, .. } => Some((*line, *column)),
            ForgeError::Conversion { .. } | ForgeError::File { .. } => None,
        }
    }

    /// Attach a source position to an error raised without one.
    ///
    /// Errors that carry no position (conversion, file) are returned unchanged.
    pub fn at(mut self, origin: Option<&str>, at_line: usize, at_column: usize) -> Self {
        match &mut self {
            ForgeError::Syntax { origin: o, line, column, .. }
            | ForgeError::ReferenceType { origin: o, line, column, .. }
            | ForgeError::ReferenceMissing { origin: o, line, column, .. }
            | ForgeError::ReferenceCycle { origin: o, line, column, .. }
            | ForgeError::Include { origin: o, line, column, .. } => {
                *o = origin.map(str::to_string);
                *line = at_line;
                *column = at_column;
            }
            ForgeError::Conversion { .. } | ForgeError::File { .. } => {}
        }
        self
    }

    pub(crate) fn file_error(message: impl Into<String>, path: impl Into<String>) -> Self {
        ForgeError::File {
            message: message.into(),
            path: path.into(),
        }
    }
}

fn fmt_location(origin: &Option<String>, line: &usize, column: &usize) -> String {
    match origin {
        Some(o) => format!("{}:{}:{}", o, line, column),
        None => format!("{}:{}", line, column),
    }
}

fn fmt_hint(hint: &Option<String>) -> String {
    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h))
}

fn fmt_detail(detail: &Option<String>) -> String {
    detail.as_ref().map_or(String::new(), |d| format!(" ({})", d))
}
