use super::*;
use super::scanner::{bump, is_identifier_char, skip_whitespace};

pub(super) fn next_token(lexer: &mut Lexer) -> Token {
    skip_whitespace(lexer);

    let line = lexer.line;
    let column = lexer.column;

    let (kind, literal) = match lexer.peek {
        None => (TokenKind::Eof, "EOF".to_string()),
        Some('{') => tokenize_symbol(lexer, TokenKind::LBrace),
        Some('}') => tokenize_symbol(lexer, TokenKind::RBrace),
        Some('=') => tokenize_symbol(lexer, TokenKind::Equals),
        Some(';') => tokenize_symbol(lexer, TokenKind::Semicolon),
        Some('.') => tokenize_symbol(lexer, TokenKind::Period),
        Some('-') => tokenize_symbol(lexer, TokenKind::Minus),
        Some('$') => tokenize_symbol(lexer, TokenKind::Dollar),
        Some('#') => tokenize_comment(lexer),
        Some('"') | Some('\'') => tokenize_string(lexer),
        Some(c) if c.is_ascii_digit() => tokenize_number(lexer),
        Some(c) if is_identifier_char(c) => tokenize_identifier_or_keyword(lexer),
        Some(_) => tokenize_symbol(lexer, TokenKind::Illegal),
    };

    Token { kind, literal, line, column }
}

fn tokenize_symbol(lexer: &mut Lexer, kind: TokenKind) -> (TokenKind, String) {
    let literal = bump(lexer).map(String::from).unwrap_or_default();
    (kind, literal)
}

fn tokenize_comment(lexer: &mut Lexer) -> (TokenKind, String) {
    bump(lexer); // consume '#'

    let mut text = String::new();
    while let Some(ch) = lexer.peek {
        if ch == '\n' {
            break;
        }
        text.push(ch);
        bump(lexer);
    }
    if text.ends_with('\r') {
        text.pop();
    }

    (TokenKind::Comment, text)
}

fn tokenize_string(lexer: &mut Lexer) -> (TokenKind, String) {
    let Some(quote) = bump(lexer) else {
        return (TokenKind::Eof, "EOF".to_string());
    };
    let mut content = String::new();

    loop {
        match bump(lexer) {
            None => {
                // Unterminated: hand the raw text back as an illegal token
                let mut raw = String::from(quote);
                raw.push_str(&content);
                return (TokenKind::Illegal, raw);
            }
            Some(ch) if ch == quote => break,
            Some('\\') => match bump(lexer) {
                Some('n') => content.push('\n'),
                Some('t') => content.push('\t'),
                Some('r') => content.push('\r'),
                Some(c @ ('\\' | '"' | '\'')) => content.push(c),
                Some(other) => {
                    content.push('\\');
                    content.push(other);
                }
                None => {
                    let mut raw = String::from(quote);
                    raw.push_str(&content);
                    raw.push('\\');
                    return (TokenKind::Illegal, raw);
                }
            },
            Some(ch) => content.push(ch),
        }
    }

    (TokenKind::String, content)
}

fn tokenize_number(lexer: &mut Lexer) -> (TokenKind, String) {
    let mut num = String::new();
    let mut kind = TokenKind::Integer;

    while let Some(ch) = lexer.peek {
        if ch.is_ascii_digit() {
            num.push(ch);
            bump(lexer);
        } else if ch == '.'
            && kind == TokenKind::Integer
            && lexer.peek2.is_some_and(|c| c.is_ascii_digit())
        {
            kind = TokenKind::Float;
            num.push(ch);
            bump(lexer);
        } else {
            break;
        }
    }

    (kind, num)
}

fn tokenize_identifier_or_keyword(lexer: &mut Lexer) -> (TokenKind, String) {
    let mut ident = String::new();

    while let Some(ch) = lexer.peek {
        if is_identifier_char(ch) {
            ident.push(ch);
            bump(lexer);
        } else {
            break;
        }
    }

    // Keywords are case-insensitive
    let kind = match ident.to_ascii_lowercase().as_str() {
        "true" | "false" => TokenKind::Boolean,
        "null" => TokenKind::Null,
        "include" => TokenKind::Include,
        _ => TokenKind::Identifier,
    };

    (kind, ident)
}
