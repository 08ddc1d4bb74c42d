//! Block segmentation and the lazy scanning pipeline.
//!
//! Consecutive lines that share a header belong to one dictionary entry.
//! [`Blocks`] groups a line stream into such runs and [`Scanner`] decodes
//! each run into an [`Outcome`].

use crate::classify::Decoder;
use crate::error::DecodeError;
use crate::header::header_key;
use crate::record::Record;
use std::convert::Infallible;

/// A maximal run of consecutive lines with the same header key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Shared header text, or `None` for a run of lines without one.
    pub header: Option<String>,
    pub lines: Vec<String>,
}

impl Block {
    pub fn decode(self, decoder: &Decoder<'_>) -> Outcome {
        let Block { header, lines } = self;
        match header {
            None => Outcome::Unlocated(lines),
            Some(header) => match decoder.decode(&header) {
                Ok(data) => Outcome::Record(Record::assemble(data, &lines)),
                Err(error) => Outcome::Rejected { error, lines },
            },
        }
    }
}

/// What became of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Record(Record),
    /// Lines in which no header end could be found.
    Unlocated(Vec<String>),
    /// A header that failed to decode, with the block's raw lines.
    Rejected {
        error: DecodeError,
        lines: Vec<String>,
    },
}

impl Outcome {
    pub fn record(&self) -> Option<&Record> {
        match self {
            Outcome::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Outcome::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Raw lines destined for the error channel.
    pub fn failed_lines(&self) -> &[String] {
        match self {
            Outcome::Record(_) => &[],
            Outcome::Unlocated(lines) | Outcome::Rejected { lines, .. } => lines,
        }
    }
}

/// Groups a line stream into [`Block`]s.
///
/// Holds at most one line of lookahead. A source error is yielded once and
/// ends the stream.
pub struct Blocks<I> {
    lines: I,
    pending: Option<String>,
    failed: bool,
}

impl<I> Blocks<I> {
    pub fn new(lines: I) -> Self {
        Blocks {
            lines,
            pending: None,
            failed: false,
        }
    }
}

impl<I, E> Iterator for Blocks<I>
where
    I: Iterator<Item = Result<String, E>>,
{
    type Item = Result<Block, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let first = match self.pending.take() {
            Some(line) => line,
            None => match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            },
        };

        let header = header_key(&first).map(str::to_string);
        let mut lines = vec![first];

        for line in self.lines.by_ref() {
            match line {
                Ok(line) if header_key(&line) == header.as_deref() => lines.push(line),
                Ok(line) => {
                    self.pending = Some(line);
                    break;
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }

        Some(Ok(Block { header, lines }))
    }
}

/// Lines in, outcomes out.
pub struct Scanner<'t, I> {
    blocks: Blocks<I>,
    decoder: Decoder<'t>,
}

impl<'t, I> Scanner<'t, I> {
    pub fn new(lines: I, decoder: Decoder<'t>) -> Self {
        Scanner {
            blocks: Blocks::new(lines),
            decoder,
        }
    }
}

impl<I, E> Iterator for Scanner<'_, I>
where
    I: Iterator<Item = Result<String, E>>,
{
    type Item = Result<Outcome, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let decoder = self.decoder;
        self.blocks
            .next()
            .map(|block| block.map(|block| block.decode(&decoder)))
    }
}

/// Scan in-memory text with the built-in tables.
pub fn decode_text(text: &str) -> Vec<Outcome> {
    let lines = text.lines().map(|line| Ok::<_, Infallible>(line.to_string()));
    Scanner::new(lines, Decoder::builtin())
        .map(|outcome| match outcome {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        })
        .collect()
}
