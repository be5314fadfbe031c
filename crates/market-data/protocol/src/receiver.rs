//! Streaming frame slicer and dispatcher
//!
//! [`Receiver::process`] walks a byte buffer, slicing complete frames per
//! the header contract and dispatching each through the pairing's table.
//! It keeps no state between calls: whatever trails the last complete
//! frame comes back in [`Drain::remainder`], and the caller prepends it to
//! the next inbound chunk.

use crate::dispatch::{Dispatch, DispatchTable, table_for};
use crate::header::Header;
use crate::schema::{Indicator, Protocol};
use thiserror::Error;
use tracing::{trace, warn};

/// Corruption detected while slicing a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// A header declared a frame shorter than the header itself. The
    /// stream has lost framing; nothing after this offset is trusted.
    #[error(
        "runt frame at offset {offset}: declared {declared} bytes, header alone is {header_len}"
    )]
    RuntFrame {
        /// Byte offset of the corrupt header within the processed buffer.
        offset: usize,
        /// Frame length the header declared.
        declared: usize,
        /// Header length for this protocol.
        header_len: usize,
    },
}

/// Outcome of draining one buffer through [`Receiver::process`].
#[derive(Debug)]
#[must_use]
pub struct Drain<'a> {
    /// Trailing bytes not consumed: a partial frame, bytes shorter than a
    /// header, or, on error, everything from the corrupt header on.
    /// Retain and prepend to the next chunk.
    pub remainder: &'a [u8],
    /// Callbacks delivered from this buffer.
    pub dispatched: usize,
    /// Set when processing stopped at a corrupt header instead of running
    /// out of bytes.
    pub error: Option<FrameError>,
}

impl Drain<'_> {
    /// True when the buffer ended without corruption.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }
}

/// Synchronous frame receiver binding a handler to a protocol.
///
/// Construction resolves the (handler type, protocol) dispatch table from
/// the process-wide registry; every receiver of the same pairing shares
/// one table. `process` never blocks, never spawns, and dispatches frames
/// strictly in wire order on the calling thread.
pub struct Receiver<H: 'static, P: Protocol> {
    handler: H,
    table: &'static DispatchTable<H, P>,
}

impl<H, P> Receiver<H, P>
where
    H: Dispatch<P>,
    P: Protocol,
{
    /// Bind `handler` to protocol `P`.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            table: table_for::<H, P>(),
        }
    }

    /// Slice `buf` into frames, dispatching each complete one.
    ///
    /// Stops at the first of: a trailing partial frame (returned in the
    /// remainder), fewer bytes than a header, or a header declaring a
    /// frame shorter than the header itself (returned in the remainder
    /// with [`Drain::error`] set; a corrupt binary stream is unsafe to
    /// resync, so nothing past that point is touched). Frames whose
    /// indicator has no route are skipped by their declared length with
    /// no callback.
    pub fn process<'a>(&mut self, buf: &'a [u8]) -> Drain<'a> {
        let header_len = P::header_len();
        let mut cur = 0usize;
        let mut dispatched = 0usize;

        while buf.len() - cur >= header_len {
            let Some(header) = Header::<P>::read(&buf[cur..]) else {
                break;
            };
            let frame_len = header.frame_len();
            if frame_len < header_len {
                warn!(
                    protocol = P::NAME,
                    offset = cur,
                    declared = frame_len,
                    "runt frame header, stream corrupt from here"
                );
                return Drain {
                    remainder: &buf[cur..],
                    dispatched,
                    error: Some(FrameError::RuntFrame {
                        offset: cur,
                        declared: frame_len,
                        header_len,
                    }),
                };
            }
            if buf.len() - cur < frame_len {
                break; // partial frame, caller retries with more bytes
            }

            let frame = &buf[cur..cur + frame_len];
            if let Some(thunk) = self.table.get(header.indicator()) {
                thunk(&mut self.handler, frame);
                dispatched += 1;
            } else {
                trace!(
                    protocol = P::NAME,
                    indicator = header.indicator().widen(),
                    "no route for frame, skipped"
                );
            }
            cur += frame_len;
        }

        Drain {
            remainder: &buf[cur..],
            dispatched,
            error: None,
        }
    }

    /// Borrow the bound handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutably borrow the bound handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Unbind and return the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }
}
