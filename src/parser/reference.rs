// Author: Dustin Pilgrim
// License: MIT

use super::*;
use crate::value::Value;

/// Parse a dotted reference up to and including its `;`, then resolve it.
///
/// `first` is the token that started the value: the leading `.` of a local
/// reference, or the first identifier of a global one. Local references walk
/// from the section being populated, global ones from the document root. The
/// result is the referenced value itself, not a copy.
pub(super) fn parse_reference(parser: &mut Parser, first: Token, local: bool) -> Result<Value, ForgeError> {
    let mut names: Vec<String> = Vec::new();
    let mut expect_ident = local;
    if !local {
        names.push(first.literal.clone());
    }

    loop {
        let token = parser.bump()?;
        match token.kind {
            TokenKind::Period if !expect_ident => expect_ident = true,
            TokenKind::Identifier if expect_ident => {
                names.push(token.literal);
                expect_ident = false;
            }
            TokenKind::Semicolon if !expect_ident => break,
            _ if expect_ident => {
                return Err(parser.syntax_error(
                    &token,
                    format!("expected IDENTIFIER after PERIOD, instead found '{}'", token.literal),
                    None,
                ));
            }
            _ => {
                return Err(parser.syntax_error(
                    &token,
                    format!("expected ';' instead found '{}'", token.literal),
                    Some("References are dotted names such as section.key or .key"),
                ));
            }
        }
    }

    let start = if local {
        parser.current.clone()
    } else {
        parser.root.clone()
    };

    let origin = parser.origin();
    let value = start
        .resolve_segments(&names)
        .map_err(|e| with_reference_text(e, local).at(origin.as_deref(), first.line, first.column))?;

    // Aliasing a section that is still open would make the tree cyclic.
    // Closed sections only hold aliases to closed sections, so checking the
    // open ones is enough.
    if let Some(section) = value.as_section() {
        let open = section.ptr_eq(&parser.current) || parser.sections.iter().any(|s| s.ptr_eq(&section));
        if open {
            return Err(ForgeError::ReferenceCycle {
                reference: reference_text(&names, local),
                origin,
                line: first.line,
                column: first.column,
            });
        }
    }

    Ok(value)
}

fn reference_text(names: &[String], local: bool) -> String {
    let joined = names.join(".");
    if local { format!(".{}", joined) } else { joined }
}

/// Spell local references with their leading period in error messages.
fn with_reference_text(mut err: ForgeError, local: bool) -> ForgeError {
    if local {
        match &mut err {
            ForgeError::ReferenceType { reference, .. }
            | ForgeError::ReferenceMissing { reference, .. } => {
                reference.insert(0, '.');
            }
            _ => {}
        }
    }
    err
}
