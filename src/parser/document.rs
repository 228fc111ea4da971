use std::mem;

use super::*;

pub(super) fn parse_document(parser: &mut Parser) -> Result<Section, ForgeError> {
    loop {
        let token = parser.bump()?;
        match token.kind {
            TokenKind::Eof => {
                if parser.frames.len() > 1 {
                    leave_include(parser, &token)?;
                    continue;
                }
                if !parser.sections.is_empty() {
                    return Err(parser.syntax_error(
                        &token,
                        "expected end of section, instead found EOF".into(),
                        Some("Every '{' needs a matching '}'"),
                    ));
                }
                break;
            }
            TokenKind::Identifier => parse_statement(parser, token)?,
            TokenKind::RBrace => end_section(parser, &token)?,
            TokenKind::Include => parse_include(parser)?,
            TokenKind::Illegal => {
                return Err(parser.syntax_error(
                    &token,
                    format!("illegal token '{}'", token.literal),
                    None,
                ));
            }
            _ => {
                return Err(parser.syntax_error(
                    &token,
                    format!("unexpected token {} '{}'", token.kind, token.literal),
                    Some("Expected a setting, a section or an include"),
                ));
            }
        }
    }

    Ok(parser.root.clone())
}

/// `name = value;` or `name {`
fn parse_statement(parser: &mut Parser, name: Token) -> Result<(), ForgeError> {
    match parser.peek()?.kind {
        TokenKind::LBrace => {
            parser.bump()?;
            begin_section(parser, &name.literal);
            Ok(())
        }
        TokenKind::Equals => {
            parser.bump()?;
            value::parse_setting(parser, &name.literal)
        }
        _ => {
            let found = parser.bump()?;
            Err(parser.syntax_error(
                &found,
                format!(
                    "expected '=' or '{{' after '{}', instead found '{}'",
                    name.literal, found.literal
                ),
                None,
            ))
        }
    }
}

fn begin_section(parser: &mut Parser, name: &str) {
    let child = parser.current.add_section(name);
    let enclosing = mem::replace(&mut parser.current, child);
    parser.sections.push(enclosing);
}

fn end_section(parser: &mut Parser, token: &Token) -> Result<(), ForgeError> {
    let floor = parser.frames.last().map_or(0, |f| f.depth);
    if parser.sections.len() <= floor {
        let hint = if parser.frames.len() > 1 {
            Some("An included file can only close sections it opened")
        } else {
            None
        };
        return Err(parser.syntax_error(token, "unexpected section end '}'".into(), hint));
    }

    if let Some(enclosing) = parser.sections.pop() {
        parser.current = enclosing;
    }
    Ok(())
}

/// `include "pattern";`
fn parse_include(parser: &mut Parser) -> Result<(), ForgeError> {
    let pattern = parser.bump()?;
    if !pattern.is(TokenKind::String) {
        return Err(parser.syntax_error(
            &pattern,
            format!("expected STRING instead found '{}'", pattern.literal),
            Some("Write includes as: include \"path/*.cfg\";"),
        ));
    }

    let semicolon = parser.bump()?;
    if !semicolon.is(TokenKind::Semicolon) {
        return Err(parser.syntax_error(
            &semicolon,
            format!("expected ';' instead found '{}'", semicolon.literal),
            None,
        ));
    }

    let base = parser.include_base();
    let matches = parser
        .resolver
        .matches(&pattern.literal, base.as_deref())
        .map_err(|message| ForgeError::Include {
            message,
            pattern: pattern.literal.clone(),
            origin: parser.origin(),
            line: pattern.line,
            column: pattern.column,
        })?;

    log::debug!("include \"{}\" matched {} file(s)", pattern.literal, matches.len());
    if matches.is_empty() {
        return Ok(());
    }

    if let Some(frame) = parser.frames.last_mut() {
        frame.pending = matches.into();
        frame.pending_site = Some(IncludeSite {
            pattern: pattern.literal,
            line: pattern.line,
            column: pattern.column,
        });
    }
    enter_next_include(parser)
}

/// Push a frame for the next pending match of the innermost source, if any.
fn enter_next_include(parser: &mut Parser) -> Result<(), ForgeError> {
    let Some(frame) = parser.frames.last_mut() else {
        return Ok(());
    };
    let Some(path) = frame.pending.pop_front() else {
        frame.pending_site = None;
        return Ok(());
    };
    let site = frame.pending_site.clone().unwrap_or(IncludeSite {
        pattern: String::new(),
        line: 0,
        column: 0,
    });

    let include_error = |parser: &Parser, message: String| ForgeError::Include {
        message,
        pattern: site.pattern.clone(),
        origin: parser.origin(),
        line: site.line,
        column: site.column,
    };

    let nested = parser.frames.len() - 1;
    if nested >= parser.options.max_include_depth {
        return Err(include_error(
            parser,
            format!("includes nested deeper than {}", parser.options.max_include_depth),
        ));
    }

    let key = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
    if parser.frames.iter().any(|f| f.key.as_ref() == Some(&key)) {
        let chain = parser
            .frames
            .iter()
            .filter_map(|f| f.origin.as_ref())
            .map(|p| p.display().to_string())
            .chain(std::iter::once(path.display().to_string()))
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(include_error(parser, format!("include cycle: {}", chain)));
    }

    let reader = parser.resolver.open(&path).map_err(|e| {
        ForgeError::file_error(
            format!("Failed to open included file: {}", e),
            path.display().to_string(),
        )
    })?;

    log::debug!("entering included file {}", path.display());
    let depth = parser.sections.len();
    parser
        .frames
        .push(Frame::new(Lexer::from_reader(reader), Some(path), depth));
    Ok(())
}

/// Finish the innermost included file and move on to its next sibling match.
fn leave_include(parser: &mut Parser, eof: &Token) -> Result<(), ForgeError> {
    let floor = parser.frames.last().map_or(0, |f| f.depth);
    if parser.sections.len() > floor {
        return Err(parser.syntax_error(
            eof,
            "expected end of section, instead found EOF".into(),
            Some("Sections opened in an included file must be closed in that file"),
        ));
    }

    if let Some(frame) = parser.frames.pop() {
        if let Some(origin) = &frame.origin {
            log::debug!("leaving included file {}", origin.display());
        }
    }
    enter_next_include(parser)
}
