use std::io::{self, BufRead, BufReader, Read};
use std::str::Chars;

/// Anything that can hand out characters one at a time.
///
/// `Ok(None)` marks the end of the stream and must be returned on every
/// later call as well.
pub trait CharSource {
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

/// Characters of an in-memory string.
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        StrSource { chars: input.chars() }
    }
}

impl CharSource for StrSource<'_> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Characters decoded from a byte stream through a fixed-size buffer.
///
/// Memory use is bounded by the `BufReader` window regardless of line length.
pub struct ReaderSource<R> {
    reader: BufReader<R>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource {
            reader: BufReader::new(reader),
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = loop {
            match self.reader.fill_buf() {
                Ok(buf) => break buf.first().copied(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if byte.is_some() {
            self.reader.consume(1);
        }
        Ok(byte)
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let Some(first) = self.next_byte()? else {
            return Ok(None);
        };

        let width = utf8_width(first);
        if width == 0 {
            return Err(invalid_utf8(format!("invalid UTF-8 lead byte 0x{:02x}", first)));
        }

        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self
                .next_byte()?
                .ok_or_else(|| invalid_utf8("stream ended inside a UTF-8 sequence".to_string()))?;
        }

        let decoded = std::str::from_utf8(&bytes[..width]).map_err(|e| invalid_utf8(e.to_string()))?;
        Ok(decoded.chars().next())
    }
}

/// Encoded length of a UTF-8 sequence from its lead byte, 0 if it can't lead one.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn invalid_utf8(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
