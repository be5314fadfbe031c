//! Frame header contract
//!
//! Every frame of every protocol starts with `(indicator, length)` in the
//! protocol's byte order, where `length` is the total frame length in
//! bytes *including* the header. The framing layer reads nothing else;
//! payload layout is the message type's business.

use crate::schema::{Indicator, Protocol};
use byteorder::ByteOrder;
use std::fmt;
use zerocopy::byteorder::{NetworkEndian, U16};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

/// Wire width of the frame-length field.
pub const FRAME_LEN_WIDTH: usize = 2;

/// Parsed view of a frame header. Does not alias the buffer.
pub struct Header<P: Protocol> {
    indicator: P::Indicator,
    frame_len: usize,
}

impl<P: Protocol> Header<P> {
    /// Read a header from the front of `buf` in the protocol's byte
    /// order; `None` when `buf` is shorter than the header.
    #[must_use]
    pub fn read(buf: &[u8]) -> Option<Self> {
        if buf.len() < P::header_len() {
            return None;
        }
        let indicator = <P::Indicator as Indicator>::read::<P::Order>(buf);
        let frame_len = usize::from(<P::Order as ByteOrder>::read_u16(
            &buf[<P::Indicator as Indicator>::WIDTH..],
        ));
        Some(Self {
            indicator,
            frame_len,
        })
    }

    /// Raw wire indicator.
    #[must_use]
    pub fn indicator(&self) -> P::Indicator {
        self.indicator
    }

    /// Declared total frame length, header included.
    #[must_use]
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }
}

impl<P: Protocol> Clone for Header<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Protocol> Copy for Header<P> {}

impl<P: Protocol> fmt::Debug for Header<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("indicator", &self.indicator)
            .field("frame_len", &self.frame_len)
            .finish()
    }
}

/// Concrete header prefix for the recommended wire contract: u16
/// indicator and u16 length, both network byte order.
///
/// Message structs embed this as their first field so the header is a
/// layout prefix of every message.
#[derive(FromBytes, FromZeroes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct MessageHeader {
    indicator: U16<NetworkEndian>,
    length: U16<NetworkEndian>,
}

impl MessageHeader {
    /// Wire length of the header itself.
    pub const LEN: usize = std::mem::size_of::<Self>();

    /// Build a header for a frame of `length` total bytes.
    #[must_use]
    pub fn new(indicator: u16, length: u16) -> Self {
        Self {
            indicator: U16::new(indicator),
            length: U16::new(length),
        }
    }

    /// Wire indicator value.
    #[must_use]
    pub fn indicator(&self) -> u16 {
        self.indicator.get()
    }

    /// Declared total frame length, header included.
    #[must_use]
    pub fn length(&self) -> u16 {
        self.length.get()
    }
}
