//! Header grammar.
//!
//! A header line looks like
//!
//! ```text
//! #puer, pueri  N (2nd) M  [XXXAX] :: boy, lad, young man;
//! ```
//!
//! `#`, comma-separated principal parts, a part-of-speech code, optional
//! classifier tokens, a bracketed five-letter flag code and `::`. Whatever
//! follows `::` on the same line is definition text.

use crate::class::PartOfSpeech;
use crate::error::DecodeError;
use crate::record::Parts;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADER_END: Regex = Regex::new(r"\s+\[\w{5}\]\s+::\s*").unwrap();
    static ref HEADER: Regex = header_grammar(
        &PartOfSpeech::ALL.map(PartOfSpeech::code).join("|")
    );
    // Fallback so an unknown code still splits and is reported by name
    static ref HEADER_ANY_CLASS: Regex = header_grammar("[A-Z]+");
}

fn header_grammar(class: &str) -> Regex {
    Regex::new(&format!(
        r"^#(.+?)\s+({})\s+(?:(.*?)\s+)?\[(\w{{5}})\]\s+::\s*$",
        class
    ))
    .unwrap()
}

/// Separator between principal parts.
pub const PART_SEPARATOR: &str = ", ";
/// Principal-part placeholder for a form that does not exist.
pub const ABSENT_PART: &str = "-";

/// The four raw fields of a header, before any table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader<'h> {
    /// The full header text, kept for error reports.
    pub text: &'h str,
    pub parts: Parts,
    pub class: &'h str,
    pub classifiers: Vec<&'h str>,
    pub flags: &'h str,
}

/// Byte offset just past the header (flag code, `::` and the whitespace
/// after it), or `None` if the line has no recognisable header end.
pub fn locate_header(line: &str) -> Option<usize> {
    HEADER_END.find(line).map(|m| m.end())
}

/// The header prefix of `line`, trailing whitespace removed. Lines belonging
/// to the same dictionary block share this key.
pub fn header_key(line: &str) -> Option<&str> {
    locate_header(line).map(|end| line[..end].trim_end())
}

/// Split a header into its raw fields.
pub fn split_header(header: &str) -> Result<RawHeader<'_>, DecodeError> {
    let caps = HEADER
        .captures(header)
        .or_else(|| HEADER_ANY_CLASS.captures(header))
        .ok_or_else(|| DecodeError::Format {
            header: header.to_string(),
        })?;

    let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    Ok(RawHeader {
        text: header,
        parts: split_parts(field(1)),
        class: field(2),
        classifiers: field(3).split_whitespace().collect(),
        flags: field(4),
    })
}

pub fn split_parts(text: &str) -> Parts {
    text.split(PART_SEPARATOR)
        .map(|part| (part != ABSENT_PART).then(|| part.to_string()))
        .collect()
}
