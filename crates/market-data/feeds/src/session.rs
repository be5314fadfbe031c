//! Chunk reassembly over the stateless receiver
//!
//! The receiver itself keeps nothing between calls; retaining a trailing
//! partial frame and prepending it to the next chunk is the transport
//! layer's job. [`FeedSession`] is that layer: feed it chunks as they
//! arrive and it carries the unconsumed suffix forward.

use crate::handler::FeedHandler;
use crate::wire::SynthMd;
use protocol::{FrameError, Receiver};
use thiserror::Error;
use tracing::warn;

/// Fatal session failure.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The stream lost framing. Resynchronizing a binary stream is
    /// unsafe; the session drops its buffered bytes and the connection
    /// should be reset.
    #[error("corrupt feed stream: {0}")]
    Corrupt(#[from] FrameError),
}

/// Stateful chunk reassembler for one `SYNTH-MD` connection.
pub struct FeedSession {
    receiver: Receiver<FeedHandler, SynthMd>,
    carry: Vec<u8>,
}

impl FeedSession {
    /// Start a session delivering to `handler`.
    #[must_use]
    pub fn new(handler: FeedHandler) -> Self {
        Self {
            receiver: Receiver::new(handler),
            carry: Vec::new(),
        }
    }

    /// Ingest one inbound chunk, dispatching every complete frame.
    ///
    /// Returns the number of frames dispatched across the carried bytes
    /// plus this chunk.
    ///
    /// # Errors
    /// [`SessionError::Corrupt`] when a frame header declares a length
    /// smaller than the header itself; the session discards its buffer
    /// and the caller should drop the connection.
    pub fn ingest(&mut self, chunk: &[u8]) -> Result<usize, SessionError> {
        self.carry.extend_from_slice(chunk);

        let (dispatched, consumed, error) = {
            let drain = self.receiver.process(&self.carry);
            (
                drain.dispatched,
                self.carry.len() - drain.remainder.len(),
                drain.error,
            )
        };
        self.carry.drain(..consumed);

        if let Some(error) = error {
            warn!(buffered = self.carry.len(), %error, "dropping corrupt session buffer");
            self.carry.clear();
            return Err(error.into());
        }
        Ok(dispatched)
    }

    /// Bytes currently carried while waiting for the rest of a frame.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.carry.len()
    }

    /// Borrow the bound handler.
    #[must_use]
    pub fn handler(&self) -> &FeedHandler {
        self.receiver.handler()
    }

    /// Tear down the session and return the handler.
    #[must_use]
    pub fn into_handler(self) -> FeedHandler {
        self.receiver.into_handler()
    }
}
