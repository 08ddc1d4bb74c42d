//! Stem expansion for the dictionary's compressed form notation.
//!
//! `bonus -a -um` stands for `bonus`, `bona`, `bonum`: the entry ends with its
//! endings joined by `" -"`, and everything before that is the shared stem.

/// Width of the raw file's principal-part columns. Entries of exactly this
/// length were cut off and may end in a partial abbreviation.
pub const TRUNCATED_WIDTH: usize = 24;

/// The one family whose last ending is written without its hyphen
/// (`duo -ae o`).
const DUO_ABBREVIATION: &str = "o -ae -o";
const DUO_REWRITE: &str = "o -ae oX";

pub const COMPARATIVE: &[&str] = &["or", "or", "us"];
pub const SUPERLATIVE: &[&str] = &["us", "a", "um"];
pub const ORDINAL: &[&str] = &["us", "a", "um"];
pub const DISTRIBUTIVE: &[&str] = &["i", "ae", "a"];

/// Cardinal numeral families, tried in order.
pub const CARDINALS: &[&[&str]] = &[
    &["i", "ae", "a"],
    &["us", "a", "um"],
    &["o", "ae", "o"],
    &["es", "es", "ia"],
];

/// Expand `entry` into one form per ending, or `None` if it is not an
/// abbreviation of `endings`.
///
/// Shortened abbreviations are only tried for entries of
/// [`TRUNCATED_WIDTH`] characters, plus the `duo -ae o` spelling.
pub fn explode(entry: &str, endings: &[&str]) -> Option<Vec<String>> {
    let truncated = entry.chars().count() == TRUNCATED_WIDTH;
    let mut abbrev = endings.join(" -");

    while !abbrev.is_empty() {
        if let Some(stem) = entry.strip_suffix(abbrev.as_str()) {
            return Some(endings.iter().map(|ending| format!("{stem}{ending}")).collect());
        }
        if abbrev == DUO_ABBREVIATION {
            abbrev = DUO_REWRITE.to_string();
        } else if !truncated {
            break;
        }
        abbrev.pop();
    }

    None
}

/// Try each family in order and return the first expansion that applies.
pub fn explode_first(entry: &str, families: &[&[&str]]) -> Option<Vec<String>> {
    families.iter().find_map(|endings| explode(entry, endings))
}
