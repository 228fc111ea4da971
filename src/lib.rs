//! Parser for a small configuration language of nested sections, typed
//! values, references and file includes.
//!
//! ```text
//! # comment
//! name = "forge";
//! server {
//!   port = 8080;
//!   ratio = -0.5;
//!   debug = false;
//!   home = $HOME;
//!   alias = .port;         # local reference
//!   include "conf.d/*.cfg";
//! }
//! copy = server.port;      # global reference
//! ```
//!
//! ```
//! let root = forge_cfg::parse_str("server { port = 8080; } copy = server.port;").unwrap();
//! assert_eq!(root.get_integer("copy").unwrap(), 8080);
//! ```

use std::io::Read;
use std::path::Path;

pub mod config;
pub mod error;
pub mod export;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod value;

pub use config::Section;
pub use error::ForgeError;
pub use parser::{ParseOptions, Parser};
pub use resolver::{GlobResolver, IncludeResolver};
pub use value::{Value, ValueKind, ValueType};

/// Parse a document held in memory. Relative includes resolve against the
/// working directory.
pub fn parse_str(input: &str) -> Result<Section, ForgeError> {
    Parser::new(input).parse_document()
}

pub fn parse_bytes(input: &[u8]) -> Result<Section, ForgeError> {
    parse_reader(input)
}

/// Parse from any byte stream, read incrementally.
pub fn parse_reader<R: Read>(reader: R) -> Result<Section, ForgeError> {
    Parser::from_reader(reader).parse_document()
}

/// Parse a file; relative includes resolve against the file's directory.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Section, ForgeError> {
    parse_file_with(path, ParseOptions::default())
}

pub fn parse_file_with<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Section, ForgeError> {
    let path = path.as_ref();
    log::debug!("parsing {}", path.display());
    Parser::from_file(path)?.with_options(options).parse_document()
}
