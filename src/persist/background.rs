//! Background persistence
//!
//! Moves snapshot writes off the calling thread.
//!
//! ## Concurrency:
//! - Snapshots are queued in mutation order on an unbounded channel
//! - One writer thread drains the queue; when several snapshots are
//!   waiting, only the newest is written
//! - `flush()` enqueues a barrier and blocks until everything queued
//!   before it is on disk

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use crate::config::PersistStrategy;
use crate::error::{Result, StoreError};

use super::SnapshotWriter;

/// Routes snapshots to disk according to the configured strategy
pub enum Persister {
    /// Write on the calling thread
    Immediate(SnapshotWriter),

    /// Write on a dedicated thread
    Background(BackgroundWriter),
}

impl Persister {
    /// Build a persister for `strategy`
    pub fn new(writer: SnapshotWriter, strategy: PersistStrategy) -> Result<Self> {
        match strategy {
            PersistStrategy::Immediate => Ok(Persister::Immediate(writer)),
            PersistStrategy::Background => Ok(Persister::Background(BackgroundWriter::spawn(writer)?)),
        }
    }

    /// Persist a full snapshot
    pub fn submit(&self, bytes: Vec<u8>) -> Result<()> {
        match self {
            Persister::Immediate(writer) => writer.write(&bytes),
            Persister::Background(background) => background.submit(bytes),
        }
    }

    /// Wait until every submitted snapshot is on disk
    pub fn flush(&self) -> Result<()> {
        match self {
            Persister::Immediate(_) => Ok(()),
            Persister::Background(background) => background.flush(),
        }
    }

    /// Drain outstanding writes and stop any writer thread
    pub fn shutdown(&self) -> Result<()> {
        match self {
            Persister::Immediate(_) => Ok(()),
            Persister::Background(background) => background.shutdown(),
        }
    }
}

enum Job {
    Write(Vec<u8>),
    Flush(Sender<Option<String>>),
    Shutdown,
}

/// Writer thread handle
pub struct BackgroundWriter {
    sender: Sender<Job>,

    handle: Mutex<Option<JoinHandle<()>>>,

    /// First write error since the last flush
    failure: Arc<Mutex<Option<String>>>,
}

impl BackgroundWriter {
    /// Start the writer thread
    pub fn spawn(writer: SnapshotWriter) -> Result<Self> {
        let (sender, receiver) = channel::unbounded();
        let failure = Arc::new(Mutex::new(None));
        let thread_failure = Arc::clone(&failure);

        let handle = thread::Builder::new()
            .name("taskdb-persist".to_string())
            .spawn(move || run(writer, receiver, thread_failure))?;

        Ok(Self {
            sender,
            handle: Mutex::new(Some(handle)),
            failure,
        })
    }

    /// Queue a snapshot
    pub fn submit(&self, bytes: Vec<u8>) -> Result<()> {
        self.sender
            .send(Job::Write(bytes))
            .map_err(|_| StoreError::Persist("background writer stopped".to_string()))
    }

    /// Block until every snapshot queued so far is written
    ///
    /// Reports the first write failure since the previous flush.
    pub fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = channel::bounded(1);

        self.sender
            .send(Job::Flush(ack_tx))
            .map_err(|_| StoreError::Persist("background writer stopped".to_string()))?;

        match ack_rx.recv() {
            Ok(None) => Ok(()),
            Ok(Some(message)) => Err(StoreError::Persist(message)),
            Err(_) => Err(StoreError::Persist(
                "background writer exited before flush completed".to_string(),
            )),
        }
    }

    /// Write what is queued, then stop the thread
    pub fn shutdown(&self) -> Result<()> {
        let Some(handle) = self.handle.lock().take() else {
            return Ok(());
        };

        // A send error means the thread is already gone; join reports why.
        let _ = self.sender.send(Job::Shutdown);

        if handle.join().is_err() {
            return Err(StoreError::Persist("background writer panicked".to_string()));
        }

        match self.failure.lock().take() {
            Some(message) => Err(StoreError::Persist(message)),
            None => Ok(()),
        }
    }
}

impl Drop for BackgroundWriter {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::error!(error = %e, "store shutdown lost a write");
        }
    }
}

fn run(writer: SnapshotWriter, receiver: Receiver<Job>, failure: Arc<Mutex<Option<String>>>) {
    let mut pending: Option<Vec<u8>> = None;

    while let Ok(first) = receiver.recv() {
        let batch: Vec<Job> = std::iter::once(first).chain(receiver.try_iter()).collect();

        for job in batch {
            match job {
                Job::Write(bytes) => pending = Some(bytes),
                Job::Flush(ack) => {
                    write_pending(&writer, &mut pending, &failure);
                    let _ = ack.send(failure.lock().take());
                }
                Job::Shutdown => {
                    write_pending(&writer, &mut pending, &failure);
                    tracing::debug!("background writer stopped");
                    return;
                }
            }
        }

        write_pending(&writer, &mut pending, &failure);
    }

    // All senders dropped without an explicit shutdown
    write_pending(&writer, &mut pending, &failure);
}

fn write_pending(
    writer: &SnapshotWriter,
    pending: &mut Option<Vec<u8>>,
    failure: &Mutex<Option<String>>,
) {
    let Some(bytes) = pending.take() else {
        return;
    };

    if let Err(e) = writer.write(&bytes) {
        tracing::error!(path = %writer.path().display(), error = %e, "background snapshot write failed");
        failure.lock().get_or_insert_with(|| e.to_string());
    }
}
