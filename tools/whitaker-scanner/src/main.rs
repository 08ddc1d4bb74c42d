use anyhow::{Context, Result};
use bzip2::read::BzDecoder;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use whitaker_scanner::{
    decode_ordered, Decoder, Encoding, FieldTables, Lines, Outcome, OutputFormat, ParallelConfig,
    RecordWriter, Scanner,
};

const IO_BUFFER: usize = 256 * 1024;

#[derive(Parser)]
#[command(name = "whitaker-scanner")]
#[command(about = "Decode Whitaker's Words DICTPAGE.RAW into JSON records")]
struct Args {
    /// Input file (DICTPAGE.RAW or .bz2); stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the raw lines of every block that failed to decode here
    #[arg(short = 'E', long)]
    error_file: Option<PathBuf>,

    /// Quiet mode - no diagnostics, progress or summary
    #[arg(short, long)]
    quiet: bool,

    /// Input is UTF-8 rather than Latin-1
    #[arg(short = 'U', long)]
    utf8: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Decoding threads (1 = sequential, 0 = auto-detect)
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Stop after this many records
    #[arg(long)]
    limit: Option<usize>,

    /// Field table schema YAML (default: built-in tables)
    #[arg(long)]
    schema: Option<PathBuf>,
}

#[derive(Default)]
struct Stats {
    blocks: usize,
    records: usize,
    rejected: usize,
    unlocated_lines: usize,
    elapsed: Duration,
}

/// Receives outcomes in block order: records go to the output, failed blocks
/// to the diagnostics and the error file.
struct Sink<W: Write, E: Write> {
    records: RecordWriter<W>,
    errors: Option<E>,
    encoding: Encoding,
    limit: Option<usize>,
    quiet: bool,
    pb: ProgressBar,
    start_time: Instant,
    stats: Stats,
}

impl<W: Write, E: Write> Sink<W, E> {
    fn new(
        records: RecordWriter<W>,
        errors: Option<E>,
        encoding: Encoding,
        limit: Option<usize>,
        quiet: bool,
    ) -> Self {
        Sink {
            records,
            errors,
            encoding,
            limit,
            quiet,
            pb: spinner(quiet),
            start_time: Instant::now(),
            stats: Stats::default(),
        }
    }

    fn limit_reached(&self) -> bool {
        self.limit.map_or(false, |limit| self.records.written() >= limit)
    }

    /// Handle one outcome. Returns `Ok(false)` once no more are wanted.
    fn accept(&mut self, outcome: Outcome) -> io::Result<bool> {
        if self.limit_reached() {
            return Ok(false);
        }
        self.stats.blocks += 1;

        match &outcome {
            Outcome::Record(record) => self.records.write(record)?,
            Outcome::Unlocated(lines) => {
                self.stats.unlocated_lines += lines.len();
                if !self.quiet {
                    self.pb.suspend(|| {
                        for line in lines {
                            eprintln!("Could not locate end of header in line {:?}", line);
                        }
                    });
                }
            }
            Outcome::Rejected { error, .. } => {
                self.stats.rejected += 1;
                if !self.quiet {
                    self.pb.suspend(|| eprintln!("{}", error));
                }
            }
        }

        if let Some(errors) = self.errors.as_mut() {
            for line in outcome.failed_lines() {
                errors.write_all(&self.encoding.encode(line))?;
                errors.write_all(b"\n")?;
            }
        }

        if !self.quiet && self.stats.blocks % 1000 == 0 {
            let rate = self.stats.blocks as f64 / self.start_time.elapsed().as_secs_f64();
            self.pb.set_message(format!(
                "Blocks: {} | Records: {} | Rejected: {} | Rate: {:.0} blk/s",
                self.stats.blocks,
                self.records.written(),
                self.stats.rejected,
                rate
            ));
        }

        Ok(!self.limit_reached())
    }

    /// Close the output and error file and return both with the final stats.
    fn finish(self) -> Result<(W, Option<E>, Stats)> {
        let mut stats = self.stats;
        stats.records = self.records.written();

        let out = self.records.finish().context("writing output")?;
        let errors = match self.errors {
            Some(mut errors) => {
                errors.flush().context("writing error file")?;
                Some(errors)
            }
            None => None,
        };

        self.pb.finish_and_clear();
        stats.elapsed = self.start_time.elapsed();
        Ok((out, errors, stats))
    }
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead + Send>> {
    let Some(path) = path.filter(|p| *p != Path::new("-")) else {
        return Ok(Box::new(BufReader::with_capacity(IO_BUFFER, io::stdin())));
    };

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(if path.to_string_lossy().ends_with(".bz2") {
        Box::new(BufReader::with_capacity(IO_BUFFER, BzDecoder::new(file)))
    } else {
        Box::new(BufReader::with_capacity(IO_BUFFER, file))
    })
}

fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>> {
    let out: Box<dyn Write> = match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    Ok(BufWriter::with_capacity(IO_BUFFER, out))
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    }
}

/// Run the scanner on this thread, stopping when the sink says so.
fn run_sequential<I>(
    scanner: Scanner<'_, I>,
    mut sink: impl FnMut(Outcome) -> io::Result<bool>,
) -> io::Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    for outcome in scanner {
        if !sink(outcome?)? {
            break;
        }
    }
    Ok(())
}

fn print_stats(stats: &Stats) {
    let secs = stats.elapsed.as_secs_f64();
    eprintln!();
    eprintln!("============================================================");
    eprintln!("Blocks processed: {}", stats.blocks);
    eprintln!("Records written: {}", stats.records);
    eprintln!("Rejected headers: {}", stats.rejected);
    eprintln!("Unlocated lines: {}", stats.unlocated_lines);
    eprintln!("Time: {}m {}s", stats.elapsed.as_secs() / 60, stats.elapsed.as_secs() % 60);
    eprintln!("Rate: {:.0} blocks/sec", stats.blocks as f64 / secs.max(f64::EPSILON));
    eprintln!("============================================================");
}

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded;
    let tables = match &args.schema {
        Some(path) => {
            loaded = FieldTables::load(path)
                .with_context(|| format!("loading field tables from {}", path.display()))?;
            &loaded
        }
        None => FieldTables::builtin(),
    };
    let decoder = Decoder::new(tables);
    let encoding = if args.utf8 { Encoding::Utf8 } else { Encoding::Latin1 };

    let threads = match args.threads {
        0 => ParallelConfig::default().num_workers,
        n => n,
    };

    if !args.quiet {
        let show = |p: &Option<PathBuf>| {
            p.as_ref()
                .map_or_else(|| "-".to_string(), |p| p.display().to_string())
        };
        eprintln!("Input: {}", show(&args.input));
        eprintln!("Output: {}", show(&args.output));
        eprintln!("Encoding: {:?}", encoding);
        if threads > 1 {
            eprintln!("Threads: {}", threads);
        }
        if let Some(limit) = args.limit {
            eprintln!("Limit: {} records", limit);
        }
        eprintln!();
    }

    let lines = Lines::new(open_input(args.input.as_deref())?, encoding);
    let records = RecordWriter::new(open_output(args.output.as_deref())?, args.format)
        .context("writing output")?;
    let errors = match &args.error_file {
        Some(path) => Some(BufWriter::with_capacity(
            IO_BUFFER,
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => None,
    };

    let mut sink = Sink::new(records, errors, encoding, args.limit, args.quiet);
    let handle = |outcome: Outcome| sink.accept(outcome);

    if threads > 1 {
        decode_ordered(lines, decoder, &ParallelConfig::with_workers(threads), handle)
    } else {
        run_sequential(Scanner::new(lines, decoder), handle)
    }
    .context("decoding dictionary")?;

    let (_, _, stats) = sink.finish()?;
    if !args.quiet {
        print_stats(&stats);
    }

    Ok(())
}
