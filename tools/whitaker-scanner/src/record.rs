//! Decoded records and their JSON shape.
//!
//! Records serialize through [`serde_json::Value`] so every object comes out
//! with its keys sorted, whatever the field order below.

use crate::header::locate_header;
use crate::tables::Coded;
use serde::Serialize;

/// Principal parts in dictionary order; `None` marks a form the dictionary
/// lists as absent.
pub type Parts = Vec<Option<String>>;

/// Separator between the definition texts of a block's lines.
pub const DEFINITION_SEPARATOR: &str = "; ";

fn is_false(b: &bool) -> bool {
    !*b
}

/// The five flag attributes, in flag-code order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flags {
    pub age: Coded,
    pub area: Coded,
    pub geo: Coded,
    pub frequency: Coded,
    pub source: Coded,
}

/// Comparative and superlative forms of adjectives and adverbs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Degrees {
    pub comparative: Option<Parts>,
    pub superlative: Option<Parts>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NounDetail {
    pub declension: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Coded>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerbDetail {
    pub conjugation: Option<u8>,
    #[serde(rename = "type")]
    pub verb_type: Option<Coded>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjectiveDetail {
    #[serde(flatten)]
    pub degrees: Option<Degrees>,
    /// The last principal part carried a `(gen -ius)` marker.
    #[serde(skip_serializing_if = "is_false")]
    pub gen_ius: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrepositionDetail {
    pub case: Coded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdverbDetail {
    #[serde(flatten)]
    pub degrees: Option<Degrees>,
}

/// Ordinal, distributive and adverbial forms of a four-part numeral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumeralDetail {
    pub ordinal: Option<Parts>,
    pub distributive: Option<Parts>,
    pub numeral_adverb: Parts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PronounDetail {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub pronoun_type: Option<Coded>,
    /// The principal part carried a `(GEN)` marker.
    #[serde(skip_serializing_if = "is_false")]
    pub genitive: bool,
}

/// Nothing beyond the common attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bare {}

/// Attributes specific to one part of speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Detail {
    Noun(NounDetail),
    Verb(VerbDetail),
    Adjective(AdjectiveDetail),
    Preposition(PrepositionDetail),
    Adverb(AdverbDetail),
    Numeral(NumeralDetail),
    Pronoun(PronounDetail),
    Bare(Bare),
}

/// Everything decoded from a header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderData {
    pub class: Coded,
    /// The header used the `PACK` code.
    #[serde(skip_serializing_if = "is_false")]
    pub pack: bool,
    #[serde(flatten)]
    pub flags: Flags,
    /// `None` when every form moved into the comparative/superlative lists.
    pub parts: Option<Parts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declinable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conjugatable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inflectable: Option<bool>,
    #[serde(skip_serializing_if = "is_false")]
    pub abbreviation: bool,
    #[serde(flatten)]
    pub detail: Detail,
}

/// One dictionary entry: decoded header plus definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    pub header: HeaderData,
    pub definition: String,
}

impl Record {
    /// Attach the definition text of a block's lines to its decoded header.
    pub fn assemble<S: AsRef<str>>(header: HeaderData, lines: &[S]) -> Self {
        Record {
            header,
            definition: assemble_definition(lines),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Join the text after each line's header, dropping the `|` continuation
/// markers and trailing semicolons.
pub fn assemble_definition<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|line| definition_text(line.as_ref()))
        .collect::<Vec<_>>()
        .join(DEFINITION_SEPARATOR)
}

fn definition_text(line: &str) -> &str {
    let body = locate_header(line).map_or(line, |end| &line[end..]);
    body.trim_start_matches('|').trim_end().trim_end_matches(';')
}
