//! Ordered multi-threaded decoding.
//!
//! A reader thread groups lines into blocks and numbers them, worker threads
//! decode blocks, and the calling thread hands outcomes to the sink in block
//! order through a reorder buffer. The sink sees exactly the sequence a
//! sequential [`Scanner`](crate::Scanner) would produce.
//!
//! At most `channel_buffer` blocks are in flight between the reader and the
//! sink. The reader takes a credit before sending each block and the emitter
//! returns it once that block's outcome has been handed on, so one slow block
//! holds back intake instead of growing the reorder buffer.

use crate::classify::Decoder;
use crate::segment::{Block, Blocks, Outcome};

use std::collections::BTreeMap;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;

/// Configuration for parallel decoding
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of decoding threads
    pub num_workers: usize,
    /// Capacity of the block and outcome channels, and the most blocks in
    /// flight at once
    pub channel_buffer: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        let cpus = thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);
        Self {
            num_workers: cpus.saturating_sub(1).max(1),
            channel_buffer: 1024,
        }
    }
}

impl ParallelConfig {
    pub fn with_workers(num_workers: usize) -> Self {
        Self {
            num_workers: num_workers.max(1),
            ..Self::default()
        }
    }
}

/// Decode `lines` on worker threads, passing outcomes to `sink` in input
/// order. The sink returns `Ok(false)` to stop early.
///
/// A source error is returned after every block read before it has been
/// emitted; a sink error is returned at once.
pub fn decode_ordered<I, E, F>(
    lines: I,
    decoder: Decoder<'_>,
    config: &ParallelConfig,
    mut sink: F,
) -> Result<(), E>
where
    I: Iterator<Item = Result<String, E>> + Send,
    E: Send,
    F: FnMut(Outcome) -> Result<bool, E>,
{
    let (block_tx, block_rx) = sync_channel::<(usize, Block)>(config.channel_buffer);
    let (outcome_tx, outcome_rx) = sync_channel::<(usize, Outcome)>(config.channel_buffer);
    let (credit_tx, credit_rx) = credits(config.channel_buffer.max(1));
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        let stop = &stop;
        let reader =
            scope.spawn(move || read_blocks(Blocks::new(lines), block_tx, credit_rx, stop));

        // Workers own the receiver so it closes once they have all exited
        let block_rx = Arc::new(Mutex::new(block_rx));
        for _ in 0..config.num_workers.max(1) {
            let rx = Arc::clone(&block_rx);
            let tx = outcome_tx.clone();
            scope.spawn(move || decode_worker(rx, tx, decoder));
        }
        drop(block_rx);
        drop(outcome_tx);

        let emitted = emit_in_order(outcome_rx, credit_tx, &mut sink);
        if !matches!(emitted, Ok(true)) {
            stop.store(true, Ordering::SeqCst);
        }

        let read = reader
            .join()
            .unwrap_or_else(|payload| panic::resume_unwind(payload));
        emitted?;
        read
    })
}

/// A channel preloaded with `window` credits.
fn credits(window: usize) -> (SyncSender<()>, Receiver<()>) {
    let (tx, rx) = sync_channel(window);
    for _ in 0..window {
        // Cannot fail: the receiver is alive and the buffer has room
        let _ = tx.try_send(());
    }
    (tx, rx)
}

fn read_blocks<I, E>(
    blocks: Blocks<I>,
    tx: SyncSender<(usize, Block)>,
    credits: Receiver<()>,
    stop: &AtomicBool,
) -> Result<(), E>
where
    I: Iterator<Item = Result<String, E>>,
{
    for (block_id, block) in blocks.enumerate() {
        let block = block?;
        // Waits while the window is full; fails once the emitter is gone
        if credits.recv().is_err() || stop.load(Ordering::Relaxed) {
            break;
        }
        if tx.send((block_id, block)).is_err() {
            break;
        }
    }
    Ok(())
}

fn decode_worker(
    rx: Arc<Mutex<Receiver<(usize, Block)>>>,
    tx: SyncSender<(usize, Outcome)>,
    decoder: Decoder<'_>,
) {
    loop {
        let item = {
            let lock = rx.lock().ok();
            lock.and_then(|guard| guard.recv().ok())
        };

        match item {
            Some((block_id, block)) => {
                if tx.send((block_id, block.decode(&decoder))).is_err() {
                    break;
                }
            }
            None => break,
        }
    }
}

/// Hand outcomes to the sink in block order using a streaming reorder buffer,
/// returning a credit to the reader for each one handed on. Returns
/// `Ok(false)` if the sink asked to stop.
fn emit_in_order<E, F>(
    rx: Receiver<(usize, Outcome)>,
    credits: SyncSender<()>,
    sink: &mut F,
) -> Result<bool, E>
where
    F: FnMut(Outcome) -> Result<bool, E>,
{
    let mut emit = |outcome: Outcome| -> Result<bool, E> {
        let more = sink(outcome)?;
        let _ = credits.try_send(());
        Ok(more)
    };

    // Outcomes that arrived before their predecessors
    let mut pending: BTreeMap<usize, Outcome> = BTreeMap::new();
    let mut next_expected: usize = 0;

    for (block_id, outcome) in rx {
        if block_id != next_expected {
            pending.insert(block_id, outcome);
            continue;
        }

        if !emit(outcome)? {
            return Ok(false);
        }
        next_expected += 1;

        while let Some(buffered) = pending.remove(&next_expected) {
            if !emit(buffered)? {
                return Ok(false);
            }
            next_expected += 1;
        }
    }

    // Only reachable with gaps, i.e. a worker died mid-block
    for (_, outcome) in pending {
        if !emit(outcome)? {
            return Ok(false);
        }
    }
    Ok(true)
}
