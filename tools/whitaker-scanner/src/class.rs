//! The closed set of part-of-speech codes a header may carry.

use crate::tables::Coded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Adjective,
    Adverb,
    Conjunction,
    Interjection,
    Noun,
    Numeral,
    /// `PACK`: a pronoun that takes the enclitic particle. Decoded as a
    /// pronoun with the `pack` marker set.
    Packon,
    Preposition,
    Pronoun,
    Verb,
}

/// Which boolean the `undeclined` principal-part marker turns off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflectionMarker {
    Declinable,
    Conjugatable,
    Inflectable,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 10] = [
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Interjection,
        PartOfSpeech::Noun,
        PartOfSpeech::Numeral,
        PartOfSpeech::Packon,
        PartOfSpeech::Preposition,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Verb,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        PartOfSpeech::ALL.into_iter().find(|pos| pos.code() == code)
    }

    pub fn code(self) -> &'static str {
        match self {
            PartOfSpeech::Adjective => "ADJ",
            PartOfSpeech::Adverb => "ADV",
            PartOfSpeech::Conjunction => "CONJ",
            PartOfSpeech::Interjection => "INTERJ",
            PartOfSpeech::Noun => "N",
            PartOfSpeech::Numeral => "NUM",
            PartOfSpeech::Packon => "PACK",
            PartOfSpeech::Preposition => "PREP",
            PartOfSpeech::Pronoun => "PRON",
            PartOfSpeech::Verb => "V",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Numeral => "number",
            PartOfSpeech::Packon => "PACKON",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Verb => "verb",
        }
    }

    pub fn coded(self) -> Coded {
        Coded::new(self.code(), Some(self.label()))
    }

    pub fn inflection_marker(self) -> InflectionMarker {
        match self {
            PartOfSpeech::Noun | PartOfSpeech::Adjective => InflectionMarker::Declinable,
            PartOfSpeech::Verb => InflectionMarker::Conjugatable,
            _ => InflectionMarker::Inflectable,
        }
    }
}
