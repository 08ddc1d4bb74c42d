//! Line source over a byte reader.
//!
//! `DICTPAGE.RAW` ships in Latin-1. Lines come out without their `\n` or
//! `\r\n` terminator.

use std::borrow::Cow;
use std::io::{self, BufRead};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Latin1,
    Utf8,
}

impl Encoding {
    pub fn decode(self, bytes: Vec<u8>) -> io::Result<String> {
        match self {
            Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
            Encoding::Utf8 => String::from_utf8(bytes)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        }
    }

    /// Bytes of `text` in this encoding. Characters outside Latin-1 become `?`.
    pub fn encode(self, text: &str) -> Cow<'_, [u8]> {
        match self {
            Encoding::Latin1 => Cow::Owned(
                text.chars()
                    .map(|c| u8::try_from(c).unwrap_or(b'?'))
                    .collect(),
            ),
            Encoding::Utf8 => Cow::Borrowed(text.as_bytes()),
        }
    }
}

/// Decoded lines of a reader.
pub struct Lines<R> {
    reader: R,
    encoding: Encoding,
    line_number: usize,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R, encoding: Encoding) -> Self {
        Lines {
            reader,
            encoding,
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                let line_number = self.line_number;
                Some(self.encoding.decode(buf).map_err(|e| {
                    io::Error::new(e.kind(), format!("line {}: {}", line_number, e))
                }))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
