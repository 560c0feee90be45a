//! Staged output pipeline for the renderer.
//!
//! Worker threads emit formatted pixel strings on their own bounded
//! channels. Because worker k owns exactly the pixel indices congruent to
//! k modulo the worker count, taking one item from each stream in turn
//! reconstructs the global row-major order without any sorting or
//! priority queue. Downstream, pixels are batched into chunks and handed
//! through a bounded buffer to the single thread that owns the sink.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender};
use std::sync::Arc;
use thiserror::Error;

/// Pixels per aggregated chunk.
pub const CHUNK_SIZE: usize = 5000;

/// Chunks in flight between the aggregator and the writer.
pub const CHUNK_BUFFER: usize = 2;

/// Pixels buffered per worker stream.
pub const PIXEL_BUFFER: usize = 1024;

/// Errors surfaced by a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write to output sink: {0}")]
    Sink(#[from] std::io::Error),

    #[error("render was cancelled")]
    Cancelled,
}

/// Shared flag that asks every pipeline stage to wind down.
///
/// Workers stop enumerating pixels once set; the stages behind them drain
/// and exit as their input channels close. Output produced before the
/// cancellation may already have reached the sink.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Round-robin fan-in of the worker streams.
///
/// Takes one item from each open input in turn and forwards it, restoring
/// ascending pixel order from the strided worker subsets. Returns when
/// every input has closed, or when the output side hangs up.
pub fn interleave(inputs: Vec<Receiver<String>>, output: SyncSender<String>) {
    let mut open = vec![true; inputs.len()];
    let mut remaining = inputs.len();

    while remaining > 0 {
        for (input, is_open) in inputs.iter().zip(open.iter_mut()) {
            if !*is_open {
                continue;
            }
            match input.recv() {
                Ok(item) => {
                    if output.send(item).is_err() {
                        return;
                    }
                }
                Err(_) => {
                    *is_open = false;
                    remaining -= 1;
                }
            }
        }
    }
}

/// Collect up to `chunk_size` items per chunk, flushing the remainder when
/// the input closes.
pub fn aggregate(input: Receiver<String>, output: SyncSender<Vec<String>>, chunk_size: usize) {
    let mut chunk = Vec::with_capacity(chunk_size);

    while let Ok(item) = input.recv() {
        chunk.push(item);
        if chunk.len() == chunk_size {
            let full = std::mem::replace(&mut chunk, Vec::with_capacity(chunk_size));
            if output.send(full).is_err() {
                return;
            }
        }
    }

    if !chunk.is_empty() {
        let _ = output.send(chunk);
    }
}

/// Write the pixmap header and then every chunk, one pixel per line.
///
/// The first write error stops the drain; the channel hang-up it causes
/// unwinds the rest of the pipeline.
pub fn drain_chunks<W: Write>(
    writer: &mut W,
    header: &str,
    chunks: Receiver<Vec<String>>,
) -> Result<(), RenderError> {
    writer.write_all(header.as_bytes())?;

    let mut written = 0usize;
    while let Ok(chunk) = chunks.recv() {
        written += chunk.len();
        let mut block = chunk.join("\n");
        block.push('\n');
        writer.write_all(block.as_bytes())?;
        log::debug!("drained {written} pixels to sink");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::mpsc::sync_channel;
    use std::thread;

    #[test]
    fn test_interleave_restores_global_order() {
        // Three workers with strided subsets of 0..10
        let workers = 3;
        let total = 10;
        let mut receivers = Vec::new();
        for k in 0..workers {
            let (tx, rx) = sync_channel(4);
            receivers.push(rx);
            thread::spawn(move || {
                for idx in (k..total).step_by(workers) {
                    tx.send(idx.to_string()).unwrap();
                }
            });
        }

        let (out_tx, out_rx) = sync_channel(4);
        let handle = thread::spawn(move || interleave(receivers, out_tx));

        let collected: Vec<String> = out_rx.iter().collect();
        handle.join().unwrap();

        let expected: Vec<String> = (0..total).map(|i| i.to_string()).collect();
        assert_eq!(collected, expected);
    }

    #[test]
    fn test_interleave_uneven_streams() {
        // 2 workers over 5 items: worker 0 owns 0,2,4 and worker 1 owns 1,3
        let workers = 2;
        let total = 5;
        let mut receivers = Vec::new();
        for k in 0..workers {
            let (tx, rx) = sync_channel(4);
            receivers.push(rx);
            thread::spawn(move || {
                for idx in (k..total).step_by(workers) {
                    tx.send(idx.to_string()).unwrap();
                }
            });
        }

        let (out_tx, out_rx) = sync_channel(4);
        let handle = thread::spawn(move || interleave(receivers, out_tx));

        let collected: Vec<String> = out_rx.iter().collect();
        handle.join().unwrap();
        assert_eq!(collected, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_aggregate_batches_and_flushes() {
        let (in_tx, in_rx) = sync_channel(16);
        let (out_tx, out_rx) = sync_channel(16);

        let handle = thread::spawn(move || aggregate(in_rx, out_tx, 3));
        for i in 0..7 {
            in_tx.send(i.to_string()).unwrap();
        }
        drop(in_tx);
        handle.join().unwrap();

        let chunks: Vec<Vec<String>> = out_rx.iter().collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], vec!["0", "1", "2"]);
        assert_eq!(chunks[1], vec!["3", "4", "5"]);
        // Remainder flushed on close
        assert_eq!(chunks[2], vec!["6"]);
    }

    #[test]
    fn test_drain_writes_header_then_chunks() {
        let (tx, rx) = sync_channel(4);
        tx.send(vec!["1 2 3".to_string(), "4 5 6".to_string()])
            .unwrap();
        tx.send(vec!["7 8 9".to_string()]).unwrap();
        drop(tx);

        let mut sink = Vec::new();
        drain_chunks(&mut sink, "P3\n2 2\n255\n", rx).unwrap();

        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text, "P3\n2 2\n255\n1 2 3\n4 5 6\n7 8 9\n");
    }

    #[test]
    fn test_drain_surfaces_write_error() {
        struct FailingSink;
        impl Write for FailingSink {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let (tx, rx) = sync_channel::<Vec<String>>(4);
        drop(tx);

        let err = drain_chunks(&mut FailingSink, "P3\n1 1\n255\n", rx).unwrap_err();
        assert!(matches!(err, RenderError::Sink(_)));
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
