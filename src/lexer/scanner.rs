use super::*;

/// Read one character from the underlying source.
///
/// A read error is parked on the lexer and ends the stream.
pub(super) fn pull(lexer: &mut Lexer) -> Option<char> {
    if lexer.exhausted {
        return None;
    }
    match lexer.source.next_char() {
        Ok(Some(c)) => Some(c),
        Ok(None) => {
            lexer.exhausted = true;
            None
        }
        Err(e) => {
            lexer.exhausted = true;
            lexer.failure = Some(e);
            None
        }
    }
}

/// Advance the character window and update line/column tracking
pub(super) fn bump(lexer: &mut Lexer) -> Option<char> {
    let curr = lexer.peek;
    if let Some(c) = curr {
        if c == '\n' {
            lexer.line += 1;
            lexer.column = 1;
        } else {
            lexer.column += 1;
        }
    }
    lexer.peek = lexer.peek2;
    lexer.peek2 = pull(lexer);
    curr
}

pub(super) fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

pub(super) fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

pub(super) fn skip_whitespace(lexer: &mut Lexer) {
    while let Some(c) = lexer.peek {
        if !is_whitespace(c) {
            break;
        }
        bump(lexer);
    }
}
