//! Bounded-queue adapter in front of a single-threaded writer.
//!
//! Producers on any thread push events into a bounded channel; one consumer
//! thread owns the [`TripleWriter`] and drains the channel in order. A full
//! queue blocks producers, which caps memory use on very large inputs.

use crate::sink::{SinkError, TripleSink};
use crate::term::Triple;
use crate::writer::TripleWriter;
use std::io;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Default number of queued events before producers block.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

enum Event {
    Base(String),
    Prefix(String, String),
    Triple(Triple),
}

/// Thread-safe sink that serializes all events onto one writer thread.
pub struct QueuedSink<W> {
    sender: SyncSender<Event>,
    consumer: JoinHandle<io::Result<(W, usize)>>,
}

impl<W: TripleWriter + Send + 'static> QueuedSink<W> {
    /// Start a consumer thread with the default queue capacity.
    pub fn new(writer: W) -> Result<Self, SinkError> {
        Self::with_capacity(writer, DEFAULT_QUEUE_CAPACITY)
    }

    /// Start a consumer thread with a queue of `capacity` events (at least one).
    pub fn with_capacity(writer: W, capacity: usize) -> Result<Self, SinkError> {
        let (sender, receiver) = sync_channel(capacity.max(1));
        let consumer = thread::Builder::new()
            .name("triple-writer".into())
            .spawn(move || consume(writer, receiver))?;
        Ok(Self { sender, consumer })
    }

    /// Close the queue, wait for the writer to drain it, and return the writer.
    pub fn finish(self) -> Result<W, SinkError> {
        drop(self.sender);
        let (writer, written) = self
            .consumer
            .join()
            .map_err(|_| SinkError::WriterPanicked)??;
        debug!(triples = written, "triple writer finished");
        Ok(writer)
    }

    fn send(&self, event: Event) -> Result<(), SinkError> {
        self.sender.send(event).map_err(|_| SinkError::Closed)
    }
}

impl<W: TripleWriter + Send + 'static> TripleSink for QueuedSink<W> {
    fn base(&self, iri: &str) -> Result<(), SinkError> {
        self.send(Event::Base(iri.to_string()))
    }

    fn prefix(&self, prefix: &str, namespace: &str) -> Result<(), SinkError> {
        self.send(Event::Prefix(prefix.to_string(), namespace.to_string()))
    }

    fn triple(&self, triple: Triple) -> Result<(), SinkError> {
        self.send(Event::Triple(triple))
    }
}

fn consume<W: TripleWriter>(mut writer: W, receiver: Receiver<Event>) -> io::Result<(W, usize)> {
    let mut written = 0usize;
    for event in receiver {
        let result = match event {
            Event::Base(iri) => writer.base(&iri),
            Event::Prefix(prefix, ns) => writer.prefix(&prefix, &ns),
            Event::Triple(triple) => {
                written += 1;
                writer.triple(&triple)
            }
        };
        if let Err(e) = result {
            error!(error = %e, "triple writer failed");
            return Err(e);
        }
    }
    writer.finish()?;
    Ok((writer, written))
}
