//! Streaming JSON output.

use crate::record::Record;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::{self, Write};

const INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One JSON array, four-space indented
    #[default]
    Json,
    /// One compact record per line
    Jsonl,
}

/// Writes records one at a time; the array form is opened on creation and
/// closed by [`RecordWriter::finish`].
pub struct RecordWriter<W: Write> {
    out: W,
    format: OutputFormat,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(mut out: W, format: OutputFormat) -> io::Result<Self> {
        if format == OutputFormat::Json {
            out.write_all(b"[")?;
        }
        Ok(RecordWriter {
            out,
            format,
            written: 0,
        })
    }

    pub fn write(&mut self, record: &Record) -> io::Result<()> {
        let value = record.to_json()?;
        match self.format {
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut self.out, &value)?;
                self.out.write_all(b"\n")?;
            }
            OutputFormat::Json => {
                let mut buf = Vec::new();
                let mut ser =
                    serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
                value.serialize(&mut ser)?;

                let separator: &[u8] = if self.written == 0 { b"\n" } else { b",\n" };
                self.out.write_all(separator)?;
                for (i, line) in buf.split(|&b| b == b'\n').enumerate() {
                    if i > 0 {
                        self.out.write_all(b"\n")?;
                    }
                    self.out.write_all(INDENT)?;
                    self.out.write_all(line)?;
                }
            }
        }
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Close the array if there is one, flush, and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.format == OutputFormat::Json {
            let close: &[u8] = if self.written == 0 { b"]\n" } else { b"\n]\n" };
            self.out.write_all(close)?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}
