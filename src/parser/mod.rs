// Author: Dustin Pilgrim
// License: MIT

use std::collections::VecDeque;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::Section;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::resolver::{GlobResolver, IncludeResolver};
use crate::ForgeError;

mod document;
mod reference;
mod value;

/// Knobs for a single parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Directory relative include patterns resolve against when the input
    /// is not a file. Defaults to the working directory.
    pub base_dir: Option<PathBuf>,
    /// How many includes may be nested inside each other.
    pub max_include_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            base_dir: None,
            max_include_depth: 32,
        }
    }
}

impl ParseOptions {
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }
}

/// One token source on the include stack.
struct Frame<'a> {
    lexer: Lexer<'a>,
    origin: Option<PathBuf>,
    /// Canonical form of `origin`, used for cycle detection.
    key: Option<PathBuf>,
    /// Height of the section stack when this source was entered.
    depth: usize,
    /// Files from this source's current include statement not yet entered.
    pending: VecDeque<PathBuf>,
    pending_site: Option<IncludeSite>,
}

#[derive(Clone)]
struct IncludeSite {
    pattern: String,
    line: usize,
    column: usize,
}

impl<'a> Frame<'a> {
    fn new(lexer: Lexer<'a>, origin: Option<PathBuf>, depth: usize) -> Self {
        let key = origin
            .as_ref()
            .map(|p| std::fs::canonicalize(p).unwrap_or_else(|_| p.clone()));
        Frame {
            lexer,
            origin,
            key,
            depth,
            pending: VecDeque::new(),
            pending_site: None,
        }
    }
}

/// Recursive-descent parser building a [`Section`] tree.
///
/// Nested sections and included files are tracked on two explicit stacks:
/// `sections` holds the enclosing sections of the one being populated, and
/// `frames` holds the token sources, innermost include on top.
pub struct Parser<'a> {
    root: Section,
    current: Section,
    sections: Vec<Section>,
    frames: Vec<Frame<'a>>,
    peek: Option<Token>,
    resolver: Box<dyn IncludeResolver + 'a>,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::from_lexer(Lexer::new(input), None)
    }

    pub fn from_reader<R: Read + 'a>(reader: R) -> Self {
        Self::from_lexer(Lexer::from_reader(reader), None)
    }

    /// Parse from a lexer; `origin` names the file it reads, if any.
    pub fn from_lexer(lexer: Lexer<'a>, origin: Option<PathBuf>) -> Self {
        let root = Section::new();
        Parser {
            current: root.clone(),
            root,
            sections: Vec::new(),
            frames: vec![Frame::new(lexer, origin, 0)],
            peek: None,
            resolver: Box::new(GlobResolver),
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_resolver(mut self, resolver: impl IncludeResolver + 'a) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Parse the whole input and return the root section.
    pub fn parse_document(&mut self) -> Result<Section, ForgeError> {
        document::parse_document(self)
    }

    /// The root section as populated so far.
    ///
    /// After a failed parse this is an incomplete tree, useful only for diagnostics.
    pub fn settings(&self) -> Section {
        self.root.clone()
    }

    pub(crate) fn bump(&mut self) -> Result<Token, ForgeError> {
        match self.peek.take() {
            Some(token) => Ok(token),
            None => self.read_token(),
        }
    }

    pub(crate) fn peek(&mut self) -> Result<&Token, ForgeError> {
        let token = match self.peek.take() {
            Some(token) => token,
            None => self.read_token()?,
        };
        Ok(self.peek.insert(token))
    }

    /// Next non-comment token of the innermost source.
    fn read_token(&mut self) -> Result<Token, ForgeError> {
        let Some(frame) = self.frames.last_mut() else {
            return Err(ForgeError::Syntax {
                message: "no input left to read".into(),
                origin: None,
                line: 0,
                column: 0,
                hint: None,
            });
        };

        loop {
            let token = frame.lexer.next_token();
            // A read failure invalidates the token it cut short
            if let Some(e) = frame.lexer.take_failure() {
                let path = frame
                    .origin
                    .as_ref()
                    .map_or_else(|| "<input>".to_string(), |p| p.display().to_string());
                return Err(ForgeError::file_error(format!("Failed to read input: {}", e), path));
            }
            if !token.is(TokenKind::Comment) {
                return Ok(token);
            }
        }
    }

    pub(crate) fn origin(&self) -> Option<String> {
        self.frames
            .last()
            .and_then(|f| f.origin.as_ref())
            .map(|p| p.display().to_string())
    }

    pub(crate) fn syntax_error(&self, token: &Token, message: String, hint: Option<&str>) -> ForgeError {
        ForgeError::Syntax {
            message,
            origin: self.origin(),
            line: token.line,
            column: token.column,
            hint: hint.map(str::to_string),
        }
    }

    /// Directory the innermost source's relative includes resolve against.
    fn include_base(&self) -> Option<PathBuf> {
        match self.frames.last().and_then(|f| f.origin.as_ref()) {
            Some(origin) => origin.parent().map(Path::to_path_buf),
            None => self.options.base_dir.clone(),
        }
    }
}

impl Parser<'static> {
    /// Open `path` and parse from it; relative includes resolve against its directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ForgeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ForgeError::file_error(format!("Failed to open file: {}", e), path.display().to_string())
        })?;
        Ok(Self::from_lexer(Lexer::from_reader(file), Some(path.to_path_buf())))
    }
}

#[cfg(test)]
mod tests;
