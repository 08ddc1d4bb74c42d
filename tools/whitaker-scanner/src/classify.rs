//! Field classifier dispatch: turns a split header into [`HeaderData`].
//!
//! Each part of speech has one handler with the same signature. A handler
//! consumes classifier tokens through a [`Classifiers`] cursor and reshapes
//! the principal parts; tokens it leaves behind are a decode failure.

use crate::class::{InflectionMarker, PartOfSpeech};
use crate::error::DecodeError;
use crate::explode::{
    explode, explode_first, CARDINALS, COMPARATIVE, DISTRIBUTIVE, ORDINAL, SUPERLATIVE,
};
use crate::header::{split_header, RawHeader};
use crate::record::{
    AdjectiveDetail, AdverbDetail, Bare, Degrees, Detail, Flags, HeaderData, NounDetail,
    NumeralDetail, Parts, PrepositionDetail, PronounDetail, VerbDetail,
};
use crate::tables::{Coded, FieldTables, FlagField, Table};
use std::collections::BTreeMap;

// Principal-part markers
const UNDECLINED: &str = "undeclined";
const ABBREVIATION: &str = "abb.";
const ADJECTIVE_GENITIVE: &str = "(gen.)";
const ADJECTIVE_GENITIVE_SUFFIX: &str = " (gen.)";
const GEN_IUS_SUFFIX: &str = " (gen -ius)";
const PRONOUN_GENITIVE_SUFFIX: &str = " (GEN)";

const IMPERSONAL: &str = "IMPERS";
const IMPERSONAL_PERFECT_DEFINITE: &str = "impersonal perfect definite";

/// Cursor over a header's classifier tokens.
#[derive(Debug, Clone)]
pub struct Classifiers<'h> {
    tokens: Vec<&'h str>,
    next: usize,
}

impl<'h> Classifiers<'h> {
    pub fn new(tokens: Vec<&'h str>) -> Self {
        Classifiers { tokens, next: 0 }
    }

    pub fn peek(&self) -> Option<&'h str> {
        self.tokens.get(self.next).copied()
    }

    /// Consume the next token if `table` knows it.
    pub fn take(&mut self, table: &Table) -> Option<Coded> {
        let coded = table.lookup(self.peek()?)?;
        self.next += 1;
        Some(coded)
    }

    /// Consume the next token if it is an ordinal such as `(2nd)`.
    pub fn take_ordinal(&mut self, ordinals: &BTreeMap<String, u8>) -> Option<u8> {
        let n = *ordinals.get(self.peek()?)?;
        self.next += 1;
        Some(n)
    }

    pub fn remaining(&self) -> &[&'h str] {
        &self.tokens[self.next..]
    }

    fn finish(&self, cx: &Context<'_>) -> Result<(), DecodeError> {
        match self.peek() {
            Some(token) => Err(cx.unknown(format!("{} classifier", cx.class.label()), token)),
            None => Ok(()),
        }
    }
}

/// What every handler can see besides the cursor and the parts.
struct Context<'a> {
    header: &'a str,
    tables: &'a FieldTables,
    class: PartOfSpeech,
}

impl Context<'_> {
    fn unknown(&self, field: impl Into<String>, value: impl Into<String>) -> DecodeError {
        DecodeError::unknown_field(self.header, field, value)
    }

    fn shape(&self, reason: &'static str) -> DecodeError {
        DecodeError::Shape {
            header: self.header.to_string(),
            reason,
        }
    }

    /// Stem expansion that must apply; a mismatch names `field`.
    fn explode_required(
        &self,
        entry: &str,
        endings: &[&str],
        field: &'static str,
    ) -> Result<Parts, DecodeError> {
        explode(entry, endings)
            .map(present)
            .ok_or_else(|| self.unknown(field, entry))
    }
}

/// A handler's result: the reshaped principal parts and the class detail.
struct Shaped {
    parts: Option<Parts>,
    detail: Detail,
}

type Handler = fn(&Context<'_>, &mut Classifiers<'_>, Parts) -> Result<Shaped, DecodeError>;

fn handler(pos: PartOfSpeech) -> Handler {
    match pos {
        PartOfSpeech::Noun => noun,
        PartOfSpeech::Verb => verb,
        PartOfSpeech::Adjective => adjective,
        PartOfSpeech::Preposition => preposition,
        PartOfSpeech::Adverb => adverb,
        PartOfSpeech::Numeral => numeral,
        PartOfSpeech::Pronoun | PartOfSpeech::Packon => pronoun,
        PartOfSpeech::Conjunction | PartOfSpeech::Interjection => bare,
    }
}

fn present(forms: Vec<String>) -> Parts {
    forms.into_iter().map(Some).collect()
}

/// Drop a second principal part equal to `marker`.
fn strip_marker(parts: &mut Parts, marker: &str) -> bool {
    if parts.len() == 2 && parts[1].as_deref() == Some(marker) {
        parts.pop();
        true
    } else {
        false
    }
}

/// Remove `suffix` from the end of `part` in place.
fn strip_suffix_in_place(part: &mut String, suffix: &str) -> bool {
    if part.ends_with(suffix) {
        part.truncate(part.len() - suffix.len());
        true
    } else {
        false
    }
}

/// Decodes header lines against one set of field tables.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'t> {
    tables: &'t FieldTables,
}

impl Decoder<'static> {
    pub fn builtin() -> Self {
        Decoder::new(FieldTables::builtin())
    }
}

impl<'t> Decoder<'t> {
    pub fn new(tables: &'t FieldTables) -> Self {
        Decoder { tables }
    }

    pub fn decode(&self, header: &str) -> Result<HeaderData, DecodeError> {
        self.decode_raw(split_header(header)?)
    }

    pub fn decode_raw(&self, raw: RawHeader<'_>) -> Result<HeaderData, DecodeError> {
        let RawHeader {
            text,
            mut parts,
            class,
            classifiers,
            flags,
        } = raw;

        let declared = PartOfSpeech::from_code(class)
            .ok_or_else(|| DecodeError::unknown_field(text, "part of speech", class))?;
        let (pos, pack) = match declared {
            PartOfSpeech::Packon => (PartOfSpeech::Pronoun, true),
            other => (other, false),
        };

        let flags = self.decode_flags(text, flags)?;

        let uninflected = strip_marker(&mut parts, UNDECLINED).then_some(false);
        let abbreviation = strip_marker(&mut parts, ABBREVIATION);
        let (declinable, conjugatable, inflectable) = match pos.inflection_marker() {
            InflectionMarker::Declinable => (uninflected, None, None),
            InflectionMarker::Conjugatable => (None, uninflected, None),
            InflectionMarker::Inflectable => (None, None, uninflected),
        };

        let cx = Context {
            header: text,
            tables: self.tables,
            class: pos,
        };
        let mut cursor = Classifiers::new(classifiers);
        let shaped = handler(pos)(&cx, &mut cursor, parts)?;
        cursor.finish(&cx)?;

        Ok(HeaderData {
            class: pos.coded(),
            pack,
            flags,
            parts: shaped.parts,
            declinable,
            conjugatable,
            inflectable,
            abbreviation,
            detail: shaped.detail,
        })
    }

    fn decode_flags(&self, header: &str, code: &str) -> Result<Flags, DecodeError> {
        let mut chars = code.chars();
        let mut next = |field: FlagField| -> Result<Coded, DecodeError> {
            let name = format!("{} flag", field.name());
            let c = chars
                .next()
                .ok_or_else(|| DecodeError::unknown_field(header, name.as_str(), ""))?;
            let mut buf = [0u8; 4];
            let c = &*c.encode_utf8(&mut buf);
            self.tables
                .flags
                .table(field)
                .lookup(c)
                .ok_or_else(|| DecodeError::unknown_field(header, name, c))
        };

        let flags = Flags {
            age: next(FlagField::Age)?,
            area: next(FlagField::Area)?,
            geo: next(FlagField::Geo)?,
            frequency: next(FlagField::Frequency)?,
            source: next(FlagField::Source)?,
        };

        if chars.next().is_some() {
            return Err(DecodeError::unknown_field(header, "flag code", code));
        }
        Ok(flags)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

fn noun(cx: &Context<'_>, cursor: &mut Classifiers<'_>, parts: Parts) -> Result<Shaped, DecodeError> {
    let declension = cursor.take_ordinal(&cx.tables.ordinals);
    let gender = cursor.take(&cx.tables.genders);
    Ok(Shaped {
        parts: Some(parts),
        detail: Detail::Noun(NounDetail { declension, gender }),
    })
}

fn verb(cx: &Context<'_>, cursor: &mut Classifiers<'_>, parts: Parts) -> Result<Shaped, DecodeError> {
    let conjugation = cursor.take_ordinal(&cx.tables.ordinals);
    let mut verb_type = cursor.take(&cx.tables.verb_types);

    if let Some(vt) = verb_type.as_mut() {
        if vt.code == IMPERSONAL && is_perfect_definite(&parts) {
            vt.value = Some(IMPERSONAL_PERFECT_DEFINITE.to_string());
        }
    }

    Ok(Shaped {
        parts: Some(parts),
        detail: Detail::Verb(VerbDetail {
            conjugation,
            verb_type,
        }),
    })
}

/// Impersonal verbs listed only in the perfect: `-it`, `-isse`, and either
/// no third part or a `... est` participle.
fn is_perfect_definite(parts: &Parts) -> bool {
    match parts.as_slice() {
        [Some(first), Some(second), third] => {
            first.ends_with("it")
                && second.ends_with("isse")
                && third.as_deref().map_or(true, |t| t.ends_with(" est"))
        }
        _ => false,
    }
}

fn adjective(cx: &Context<'_>, _cursor: &mut Classifiers<'_>, mut parts: Parts) -> Result<Shaped, DecodeError> {
    let (mut kept, degrees) = match parts.len() {
        2 => {
            let comparative = parts[0].as_deref().and_then(|p| explode(p, COMPARATIVE));
            let superlative = parts[1].as_deref().and_then(|p| explode(p, SUPERLATIVE));
            match (comparative, superlative) {
                (Some(comparative), Some(superlative)) => (
                    None,
                    Some(Degrees {
                        comparative: Some(present(comparative)),
                        superlative: Some(present(superlative)),
                    }),
                ),
                (None, None) => (Some(parts), None),
                _ => return Err(cx.shape("unknown adjective format")),
            }
        }
        3 => {
            if parts[1].as_deref() == Some(ADJECTIVE_GENITIVE) {
                parts.remove(1);
            }
            (Some(parts), None)
        }
        4 => {
            let mut parts = parts.into_iter();
            let mut next = || parts.next().flatten();
            let (first, second, comparative, superlative) = (next(), next(), next(), next());

            let mut kept = vec![first];
            match second {
                Some(second) => {
                    if let Some(forms) =
                        explode(&second, &["a", "um"]).or_else(|| explode(&second, &["is", "e"]))
                    {
                        kept.extend(present(forms));
                    } else {
                        let mut second = second;
                        strip_suffix_in_place(&mut second, ADJECTIVE_GENITIVE_SUFFIX);
                        kept.push(Some(second));
                    }
                }
                None => kept.push(None),
            }

            let comparative = comparative
                .map(|c| cx.explode_required(&c, COMPARATIVE, "comparative"))
                .transpose()?;
            let superlative = superlative
                .map(|s| cx.explode_required(&s, SUPERLATIVE, "superlative"))
                .transpose()?;

            (
                Some(kept),
                Some(Degrees {
                    comparative,
                    superlative,
                }),
            )
        }
        _ => (Some(parts), None),
    };

    let gen_ius = kept
        .as_mut()
        .and_then(|parts| parts.last_mut())
        .and_then(Option::as_mut)
        .map_or(false, |last| strip_suffix_in_place(last, GEN_IUS_SUFFIX));

    Ok(Shaped {
        parts: kept,
        detail: Detail::Adjective(AdjectiveDetail { degrees, gen_ius }),
    })
}

fn preposition(cx: &Context<'_>, cursor: &mut Classifiers<'_>, parts: Parts) -> Result<Shaped, DecodeError> {
    let case = cursor.take(&cx.tables.cases);
    cursor.finish(cx)?;
    let case = case.ok_or_else(|| DecodeError::MissingField {
        header: cx.header.to_string(),
        field: "case",
        class: cx.class.label(),
    })?;
    Ok(Shaped {
        parts: Some(parts),
        detail: Detail::Preposition(PrepositionDetail { case }),
    })
}

fn adverb(cx: &Context<'_>, _cursor: &mut Classifiers<'_>, mut parts: Parts) -> Result<Shaped, DecodeError> {
    let split_degrees = |parts: &mut Parts| {
        let superlative = parts.pop().flatten();
        let comparative = parts.pop().flatten();
        Degrees {
            comparative: Some(vec![comparative]),
            superlative: Some(vec![superlative]),
        }
    };

    let (kept, degrees) = match parts.len() {
        1 => (Some(parts), None),
        3 => {
            let degrees = split_degrees(&mut parts);
            (Some(parts), Some(degrees))
        }
        2 if is_adverb_degree_pair(&parts) => (None, Some(split_degrees(&mut parts))),
        _ => return Err(cx.shape("unknown adverb format")),
    };

    Ok(Shaped {
        parts: kept,
        detail: Detail::Adverb(AdverbDetail { degrees }),
    })
}

/// `melius, optime`: a bare comparative and superlative with no positive.
fn is_adverb_degree_pair(parts: &Parts) -> bool {
    let ends = |part: &Option<String>, suffix: &str| {
        part.as_deref().map_or(false, |p| p.ends_with(suffix))
    };
    ends(&parts[0], "ius") && ends(&parts[1], "ime")
}

fn numeral(cx: &Context<'_>, cursor: &mut Classifiers<'_>, parts: Parts) -> Result<Shaped, DecodeError> {
    if parts.len() != 4 {
        return bare(cx, cursor, parts);
    }

    let mut parts = parts.into_iter();
    let mut next = || parts.next().flatten();
    let (cardinal, ordinal, distributive, adverb) = (next(), next(), next(), next());

    let kept = match cardinal {
        Some(cardinal) => match explode_first(&cardinal, CARDINALS) {
            Some(forms) => present(forms),
            None => vec![Some(cardinal)],
        },
        None => vec![None],
    };
    let ordinal = ordinal
        .map(|o| cx.explode_required(&o, ORDINAL, "ordinal"))
        .transpose()?;
    let distributive = distributive
        .map(|d| cx.explode_required(&d, DISTRIBUTIVE, "distributive"))
        .transpose()?;

    Ok(Shaped {
        parts: Some(kept),
        detail: Detail::Numeral(NumeralDetail {
            ordinal,
            distributive,
            numeral_adverb: vec![adverb],
        }),
    })
}

fn pronoun(cx: &Context<'_>, cursor: &mut Classifiers<'_>, mut parts: Parts) -> Result<Shaped, DecodeError> {
    let pronoun_type = cursor.take(&cx.tables.pronoun_types);
    cursor.finish(cx)?;

    let genitive = match parts.as_mut_slice() {
        [Some(only)] => strip_suffix_in_place(only, PRONOUN_GENITIVE_SUFFIX),
        _ => false,
    };

    Ok(Shaped {
        parts: Some(parts),
        detail: Detail::Pronoun(PronounDetail {
            pronoun_type,
            genitive,
        }),
    })
}

/// Conjunctions, interjections, and numerals not listed with four parts.
fn bare(cx: &Context<'_>, _cursor: &mut Classifiers<'_>, parts: Parts) -> Result<Shaped, DecodeError> {
    if parts.len() != 1 {
        return Err(cx.shape("unexpected number of principal parts"));
    }
    Ok(Shaped {
        parts: Some(parts),
        detail: Detail::Bare(Bare {}),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn decode(header: &str) -> Result<Value, DecodeError> {
        Decoder::builtin()
            .decode(header)
            .map(|data| serde_json::to_value(data).unwrap())
    }

    fn decoded(header: &str) -> Value {
        decode(header).unwrap_or_else(|e| panic!("{}", e))
    }

    // ─────────────────────────────────────────────────────────────
    // Common steps: class, flags, markers
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn puer_scenario() {
        let v = decoded("#puer, pueri N (2nd) M [XXXXX] :: ");
        assert_eq!(v["class"], json!({"code": "N", "value": "noun"}));
        assert_eq!(v["declension"], json!(2));
        assert_eq!(v["gender"], json!({"code": "M", "value": "masculine"}));
        assert_eq!(v["parts"], json!(["puer", "pueri"]));
        assert_eq!(v["age"], json!({"code": "X", "value": null}));
    }

    #[test]
    fn unknown_part_of_speech() {
        let err = decode("#foo XYZ [XXXXX] ::").unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownField {
                header: "#foo XYZ [XXXXX] ::".into(),
                field: "part of speech".into(),
                value: "XYZ".into(),
            }
        );
    }

    #[test]
    fn capitalised_part_before_the_class_code() {
        let v = decoded("#I C  N M  [XXXAX] ::");
        assert_eq!(v["class"]["code"], json!("N"));
        assert_eq!(v["parts"], json!(["I C"]));
        assert_eq!(v["gender"]["code"], json!("M"));
    }

    #[test]
    fn flags_decode_in_category_order() {
        let v = decoded("#et  CONJ  [FDHAO] ::");
        assert_eq!(v["age"]["value"], json!("medieval"));
        assert_eq!(v["area"]["value"], json!("art"));
        assert_eq!(v["geo"]["value"], json!("Greece"));
        assert_eq!(v["frequency"]["value"], json!("very freq"));
        assert_eq!(v["source"]["value"], json!("Oxford Latin Dictionary, 1982 (OLD)"));
    }

    #[test]
    fn unknown_flag_names_its_category() {
        let err = decode("#et  CONJ  [XCXXX] ::").unwrap_err();
        match err {
            DecodeError::UnknownField { field, value, .. } => {
                assert_eq!(field, "area flag");
                assert_eq!(value, "C");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn undeclined_noun() {
        let v = decoded("#Abraham, undeclined  N M  [XEXCE] ::");
        assert_eq!(v["parts"], json!(["Abraham"]));
        assert_eq!(v["declinable"], json!(false));
        assert_eq!(v["declension"], Value::Null);
        assert!(v.get("conjugatable").is_none());
    }

    #[test]
    fn undeclined_adverb_is_not_inflectable() {
        let v = decoded("#satis, undeclined  ADV  [XXXAX] ::");
        assert_eq!(v["inflectable"], json!(false));
        assert_eq!(v["parts"], json!(["satis"]));
    }

    #[test]
    fn abbreviation_marker() {
        let v = decoded("#A., abb.  N M  [XXXCO] ::");
        assert_eq!(v["abbreviation"], json!(true));
        assert_eq!(v["parts"], json!(["A."]));
    }

    #[test]
    fn markers_need_exactly_two_parts() {
        let v = decoded("#foo, bar, abb.  N M  [XXXCO] ::");
        assert!(v.get("abbreviation").is_none());
        assert_eq!(v["parts"], json!(["foo", "bar", "abb."]));
    }

    // ─────────────────────────────────────────────────────────────
    // Nouns and verbs
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn noun_without_classifiers() {
        let v = decoded("#pondo  N  [XXXBO] ::");
        assert_eq!(v["declension"], Value::Null);
        assert!(v.get("gender").is_none());
    }

    #[test]
    fn noun_gender_without_declension() {
        let v = decoded("#Abraham  N M  [XEXCE] ::");
        assert_eq!(v["declension"], Value::Null);
        assert_eq!(v["gender"]["code"], json!("M"));
    }

    #[test]
    fn noun_unknown_gender_code_x() {
        let v = decoded("#res, rei  N (5th) X  [XXXAX] ::");
        assert_eq!(v["gender"], json!({"code": "X", "value": null}));
    }

    #[test]
    fn noun_classifiers_out_of_order_are_rejected() {
        let err = decode("#puer, pueri  N M (2nd)  [XXXAX] ::").unwrap_err();
        assert_eq!(
            err,
            DecodeError::unknown_field("#puer, pueri  N M (2nd)  [XXXAX] ::", "noun classifier", "(2nd)")
        );
    }

    #[test]
    fn verb_with_conjugation_and_type() {
        let v = decoded("#amo, amare, amavi, amatus  V (1st) TRANS  [XXXAO] ::");
        assert_eq!(v["class"]["value"], json!("verb"));
        assert_eq!(v["conjugation"], json!(1));
        assert_eq!(v["type"], json!({"code": "TRANS", "value": "transitive"}));
        assert_eq!(v["parts"], json!(["amo", "amare", "amavi", "amatus"]));
    }

    #[test]
    fn verb_defaults_to_null() {
        let v = decoded("#inquam, -, -, -  V  [XXXAO] ::");
        assert_eq!(v["conjugation"], Value::Null);
        assert_eq!(v["type"], Value::Null);
        assert_eq!(v["parts"], json!(["inquam", null, null, null]));
    }

    #[test]
    fn undeclined_verb_is_not_conjugatable() {
        let v = decoded("#ave, undeclined  V  [XXXBO] ::");
        assert_eq!(v["conjugatable"], json!(false));
        assert!(v.get("declinable").is_none());
    }

    #[test]
    fn impersonal_perfect_definite() {
        let v = decoded("#oportuit, oportuisse, -  V IMPERS  [XXXCX] ::");
        assert_eq!(
            v["type"],
            json!({"code": "IMPERS", "value": "impersonal perfect definite"})
        );

        let v = decoded("#decuit, decuisse, decitum est  V IMPERS  [XXXCX] ::");
        assert_eq!(v["type"]["value"], json!("impersonal perfect definite"));
    }

    #[test]
    fn plain_impersonal_stays_impersonal() {
        let v = decoded("#oportet, oportere, oportuit, -  V (2nd) IMPERS  [XXXAX] ::");
        assert_eq!(v["type"], json!({"code": "IMPERS", "value": "impersonal"}));

        // Third part present but not a participle
        let v = decoded("#decuit, decuisse, decuit  V IMPERS  [XXXCX] ::");
        assert_eq!(v["type"]["value"], json!("impersonal"));
    }

    #[test]
    fn verb_unknown_classifier() {
        let err = decode("#amo, amare, amavi, amatus  V (1st) FOO  [XXXAO] ::").unwrap_err();
        match err {
            DecodeError::UnknownField { field, value, .. } => {
                assert_eq!(field, "verb classifier");
                assert_eq!(value, "FOO");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Adjectives
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn adjective_four_parts() {
        let v = decoded("#bonus, bona -um, melior -or -us, optimus -a -um  ADJ  [XXXAO] ::");
        assert_eq!(v["parts"], json!(["bonus", "bona", "bonum"]));
        assert_eq!(v["comparative"], json!(["melior", "melior", "melius"]));
        assert_eq!(v["superlative"], json!(["optimus", "optima", "optimum"]));
    }

    #[test]
    fn adjective_third_declension_and_missing_degrees() {
        let v = decoded("#fortis, fortis -e, -, -  ADJ  [XXXAO] ::");
        assert_eq!(v["parts"], json!(["fortis", "fortis", "forte"]));
        assert_eq!(v["comparative"], Value::Null);
        assert_eq!(v["superlative"], Value::Null);
    }

    #[test]
    fn adjective_genitive_in_second_of_four() {
        let v = decoded("#audax, audacis (gen.), audacior -or -us, audacissimus -a -um  ADJ  [XXXBO] ::");
        assert_eq!(v["parts"], json!(["audax", "audacis"]));
        assert_eq!(v["comparative"][0], json!("audacior"));
    }

    #[test]
    fn adjective_bad_comparative_is_fatal() {
        let err = decode("#bonus, bona -um, melior, optimus -a -um  ADJ  [XXXAO] ::").unwrap_err();
        match err {
            DecodeError::UnknownField { field, value, .. } => {
                assert_eq!(field, "comparative");
                assert_eq!(value, "melior");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn adjective_bad_superlative_is_fatal() {
        let err = decode("#bonus, bona -um, melior -or -us, optimus  ADJ  [XXXAO] ::").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownField { ref field, .. } if field == "superlative"));
    }

    #[test]
    fn adjective_degrees_only() {
        let v = decoded("#superior -or -us, supremus -a -um  ADJ  [XXXBO] ::");
        assert_eq!(v["parts"], Value::Null);
        assert_eq!(v["comparative"], json!(["superior", "superior", "superius"]));
        assert_eq!(v["superlative"], json!(["supremus", "suprema", "supremum"]));
    }

    #[test]
    fn adjective_half_degree_pair_is_rejected() {
        let err = decode("#superior -or -us, supremus  ADJ  [XXXBO] ::").unwrap_err();
        assert!(matches!(err, DecodeError::Shape { reason: "unknown adjective format", .. }));
    }

    #[test]
    fn adjective_two_plain_parts_are_kept() {
        let v = decoded("#vetus, veteris  ADJ  [XXXAO] ::");
        assert_eq!(v["parts"], json!(["vetus", "veteris"]));
        assert!(v.get("comparative").is_none());
    }

    #[test]
    fn adjective_genitive_marker_dropped() {
        let v = decoded("#audax, (gen.), audacis  ADJ  [XXXBO] ::");
        assert_eq!(v["parts"], json!(["audax", "audacis"]));
    }

    #[test]
    fn adjective_gen_ius_marker_is_not_a_superlative() {
        let err = decode("#alius, alia -ud, -, - (gen -ius)  ADJ  [XXXAO] ::").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownField { ref value, .. } if value == "- (gen -ius)"));
    }

    #[test]
    fn adjective_gen_ius_on_last_kept_part() {
        let v = decoded("#solus, sola, solum (gen -ius)  ADJ  [XXXAO] ::");
        assert_eq!(v["parts"], json!(["solus", "sola", "solum"]));
        assert_eq!(v["gen_ius"], json!(true));
    }

    #[test]
    fn adjective_classifiers_are_rejected() {
        let err = decode("#vetus, veteris  ADJ POS  [XXXAO] ::").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownField { ref field, .. } if field == "adjective classifier"));
    }

    // ─────────────────────────────────────────────────────────────
    // Prepositions and adverbs
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn preposition_case() {
        let v = decoded("#ad  PREP ACC  [XXXAO] ::");
        assert_eq!(v["case"], json!({"code": "ACC", "value": "accusative"}));
    }

    #[test]
    fn preposition_without_case_fails() {
        let err = decode("#ad  PREP  [XXXAO] ::").unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                header: "#ad  PREP  [XXXAO] ::".into(),
                field: "case",
                class: "preposition",
            }
        );
    }

    #[test]
    fn preposition_unknown_classifier_reported_first() {
        let err = decode("#ad  PREP DAT  [XXXAO] ::").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownField { ref value, .. } if value == "DAT"));
    }

    #[test]
    fn adverb_three_parts() {
        let v = decoded("#bene, melius, optime  ADV  [XXXAO] ::");
        assert_eq!(v["parts"], json!(["bene"]));
        assert_eq!(v["comparative"], json!(["melius"]));
        assert_eq!(v["superlative"], json!(["optime"]));
    }

    #[test]
    fn adverb_three_parts_with_absent_degrees() {
        let v = decoded("#semper, -, -  ADV  [XXXAO] ::");
        assert_eq!(v["comparative"], json!([null]));
        assert_eq!(v["superlative"], json!([null]));
    }

    #[test]
    fn adverb_degree_pair() {
        let v = decoded("#prius, prime  ADV  [XXXBO] ::");
        assert_eq!(v["parts"], Value::Null);
        assert_eq!(v["comparative"], json!(["prius"]));
        assert_eq!(v["superlative"], json!(["prime"]));
    }

    #[test]
    fn adverb_single_part() {
        let v = decoded("#semper  ADV  [XXXAO] ::");
        assert_eq!(v["parts"], json!(["semper"]));
        assert!(v.get("comparative").is_none());
    }

    #[test]
    fn adverb_other_counts_fail() {
        let err = decode("#foo, bar  ADV  [XXXAO] ::").unwrap_err();
        assert!(matches!(err, DecodeError::Shape { reason: "unknown adverb format", .. }));
        assert!(decode("#a, b, c, d  ADV  [XXXAO] ::").is_err());
    }

    // ─────────────────────────────────────────────────────────────
    // Numerals, pronouns, everything else
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn numeral_four_parts() {
        let v = decoded("#unus -a -um, primus -a -um, singuli -ae -a, semel  NUM  [XXXAO] ::");
        assert_eq!(v["class"], json!({"code": "NUM", "value": "number"}));
        assert_eq!(v["parts"], json!(["unus", "una", "unum"]));
        assert_eq!(v["ordinal"], json!(["primus", "prima", "primum"]));
        assert_eq!(v["distributive"], json!(["singuli", "singulae", "singula"]));
        assert_eq!(v["numeral_adverb"], json!(["semel"]));
    }

    #[test]
    fn numeral_duo_and_indeclinable_cardinal() {
        let v = decoded("#duo -ae o, secundus -a -um, bini -ae -a, bis  NUM  [XXXAO] ::");
        assert_eq!(v["parts"], json!(["duo", "duae", "duo"]));

        let v = decoded("#quinque, quintus -a -um, quini -ae -a, quinquiens  NUM  [XXXAO] ::");
        assert_eq!(v["parts"], json!(["quinque"]));
    }

    #[test]
    fn numeral_absent_forms() {
        let v = decoded("#mille, millesimus -a -um, -, -  NUM  [XXXAO] ::");
        assert_eq!(v["distributive"], Value::Null);
        assert_eq!(v["numeral_adverb"], json!([null]));
    }

    #[test]
    fn numeral_bad_ordinal_is_fatal() {
        let err = decode("#unus -a -um, primus, singuli -ae -a, semel  NUM  [XXXAO] ::").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownField { ref field, .. } if field == "ordinal"));
        let err = decode("#unus -a -um, primus -a -um, singuli, semel  NUM  [XXXAO] ::").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownField { ref field, .. } if field == "distributive"));
    }

    #[test]
    fn numeral_single_part_is_bare() {
        let v = decoded("#XII  NUM  [XXXAO] ::");
        assert_eq!(v["parts"], json!(["XII"]));
        assert!(v.get("ordinal").is_none());
        assert!(decode("#foo, bar  NUM  [XXXAO] ::").is_err());
    }

    #[test]
    fn pronoun_type_and_genitive() {
        let v = decoded("#cujus (GEN)  PRON REL  [XXXAO] ::");
        assert_eq!(v["type"], json!({"code": "REL", "value": "relative"}));
        assert_eq!(v["genitive"], json!(true));
        assert_eq!(v["parts"], json!(["cujus"]));
    }

    #[test]
    fn pack_decodes_as_pronoun() {
        let v = decoded("#quis  PACK  [XXXAO] ::");
        assert_eq!(v["class"], json!({"code": "PRON", "value": "pronoun"}));
        assert_eq!(v["pack"], json!(true));
        assert!(v.get("type").is_none());
        assert!(v.get("genitive").is_none());
    }

    #[test]
    fn pronoun_unknown_classifier() {
        let err = decode("#quis  PRON FOO  [XXXAO] ::").unwrap_err();
        assert_eq!(
            err,
            DecodeError::unknown_field("#quis  PRON FOO  [XXXAO] ::", "pronoun classifier", "FOO")
        );
    }

    #[test]
    fn conjunction_and_interjection() {
        let v = decoded("#et  CONJ  [XXXAX] ::");
        assert_eq!(v["parts"], json!(["et"]));
        let v = decoded("#eheu  INTERJ  [XXXBO] ::");
        assert_eq!(v["class"]["value"], json!("interjection"));
    }

    #[test]
    fn conjunction_part_count_and_classifiers() {
        let err = decode("#et, que  CONJ  [XXXAX] ::").unwrap_err();
        assert!(matches!(err, DecodeError::Shape { reason: "unexpected number of principal parts", .. }));
        let err = decode("#et  CONJ FOO  [XXXAX] ::").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownField { ref field, .. } if field == "conjunction classifier"));
    }

    // ─────────────────────────────────────────────────────────────
    // Cursor
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn cursor_only_consumes_matching_tokens() {
        let tables = FieldTables::builtin();
        let mut cursor = Classifiers::new(vec!["M", "(2nd)"]);
        assert_eq!(cursor.take_ordinal(&tables.ordinals), None);
        assert_eq!(cursor.take(&tables.genders).map(|c| c.code), Some("M".into()));
        assert_eq!(cursor.remaining(), &["(2nd)"]);
        assert_eq!(cursor.take(&tables.genders), None);
        assert_eq!(cursor.take_ordinal(&tables.ordinals), Some(2));
        assert!(cursor.remaining().is_empty());
        assert_eq!(cursor.peek(), None);
    }

    proptest! {
        #[test]
        fn decoding_is_deterministic(
            stem in "[a-z]{1,10}",
            pos in prop::sample::select(vec!["N (2nd) M", "V (1st) TRANS", "ADJ", "ADV", "PREP ABL", "CONJ", "PRON REL"]),
            flags in "[XA]{5}",
        ) {
            let header = format!("#{}, {}i  {}  [{}] ::", stem, stem, pos, flags);
            prop_assert_eq!(decode(&header), decode(&header));
        }
    }
}
