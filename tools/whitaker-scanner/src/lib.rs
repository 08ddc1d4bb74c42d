//! Decoder for William Whitaker's `DICTPAGE.RAW` Latin dictionary export.
//!
//! Each dictionary entry is a run of lines sharing one header:
//!
//! ```text
//! #bonus, bona -um, melior -or -us, optimus -a -um  ADJ  [XXXAO] :: good, honest;
//! ```
//!
//! The header carries principal parts in compressed notation, a part-of-speech
//! code, classifier tokens and a five-letter flag code. [`Scanner`] groups lines
//! into entries and decodes each header into a [`Record`] with its definition.
//!
//! ```
//! use whitaker_scanner::{decode_text, Outcome};
//!
//! let outcomes = decode_text("#et  CONJ  [XXXAX] :: and, and even;");
//! match &outcomes[0] {
//!     Outcome::Record(record) => assert_eq!(record.definition, "and, and even"),
//!     other => panic!("{:?}", other),
//! }
//! ```

pub mod class;
pub mod classify;
pub mod error;
pub mod explode;
pub mod header;
pub mod output;
pub mod parallel;
pub mod record;
pub mod segment;
pub mod source;
pub mod tables;

pub use class::PartOfSpeech;
pub use classify::Decoder;
pub use error::{DecodeError, TableError};
pub use output::{OutputFormat, RecordWriter};
pub use parallel::{decode_ordered, ParallelConfig};
pub use record::{HeaderData, Record};
pub use segment::{decode_text, Block, Blocks, Outcome, Scanner};
pub use source::{Encoding, Lines};
pub use tables::{Coded, FieldTables};
