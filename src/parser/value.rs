use std::env;

use super::*;
use crate::value::{Value, ValueKind};

/// Parse the right-hand side of `name = ...;` and bind it in the current section.
pub(super) fn parse_setting(parser: &mut Parser, name: &str) -> Result<(), ForgeError> {
    let token = parser.bump()?;

    let value = match token.kind {
        TokenKind::String => Value::new(ValueKind::String(token.literal)),
        TokenKind::Boolean => Value::new(token.literal.eq_ignore_ascii_case("true")),
        TokenKind::Null => Value::null(),
        TokenKind::Integer => Value::new(parse_integer(parser, &token, &token.literal)?),
        TokenKind::Float => Value::new(parse_float(parser, &token, &token.literal)?),
        TokenKind::Minus => parse_negative(parser)?,
        TokenKind::Dollar => parse_environment(parser)?,
        TokenKind::Period => {
            // The reference consumes its own ';'
            let value = reference::parse_reference(parser, token, true)?;
            parser.current.set(name, value);
            return Ok(());
        }
        TokenKind::Identifier => {
            let value = reference::parse_reference(parser, token, false)?;
            parser.current.set(name, value);
            return Ok(());
        }
        _ => {
            return Err(parser.syntax_error(
                &token,
                format!(
                    "expected STRING, INTEGER, FLOAT, BOOLEAN, NULL or IDENTIFIER, instead found {} '{}'",
                    token.kind, token.literal
                ),
                None,
            ));
        }
    };

    expect_semicolon(parser)?;
    parser.current.set(name, value);
    Ok(())
}

pub(super) fn expect_semicolon(parser: &mut Parser) -> Result<(), ForgeError> {
    let token = parser.bump()?;
    if token.is(TokenKind::Semicolon) {
        Ok(())
    } else {
        Err(parser.syntax_error(
            &token,
            format!("expected ';' instead found '{}'", token.literal),
            Some("Every setting ends with ';'"),
        ))
    }
}

fn parse_integer(parser: &Parser, token: &Token, text: &str) -> Result<i64, ForgeError> {
    text.parse::<i64>().map_err(|_| {
        parser.syntax_error(token, format!("integer literal '{}' is out of range", text), None)
    })
}

fn parse_float(parser: &Parser, token: &Token, text: &str) -> Result<f64, ForgeError> {
    text.parse::<f64>()
        .map_err(|_| parser.syntax_error(token, format!("invalid float literal '{}'", text), None))
}

/// `-` INTEGER | `-` FLOAT
fn parse_negative(parser: &mut Parser) -> Result<Value, ForgeError> {
    let token = parser.bump()?;
    // Keep the sign on the text so i64::MIN parses
    let text = format!("-{}", token.literal);
    match token.kind {
        TokenKind::Integer => Ok(Value::new(parse_integer(parser, &token, &text)?)),
        TokenKind::Float => Ok(Value::new(parse_float(parser, &token, &text)?)),
        _ => Err(parser.syntax_error(
            &token,
            format!("expected INTEGER or FLOAT after '-', instead found '{}'", token.literal),
            None,
        )),
    }
}

/// `$NAME`, read from the process environment once, at parse time.
fn parse_environment(parser: &mut Parser) -> Result<Value, ForgeError> {
    let token = parser.bump()?;
    if !token.is(TokenKind::Identifier) {
        return Err(parser.syntax_error(
            &token,
            format!("expected IDENTIFIER after '$', instead found '{}'", token.literal),
            None,
        ));
    }

    let value = env::var(&token.literal).unwrap_or_else(|_| {
        log::warn!("environment variable ${} is not set, using an empty string", token.literal);
        String::new()
    });
    Ok(Value::new(value))
}
