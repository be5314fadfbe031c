//! Fixed-layout message contract

use crate::schema::Protocol;
use zerocopy::{AsBytes, FromBytes, Unaligned};

/// A fixed-layout wire message bound to exactly one (protocol, indicator)
/// pair.
///
/// Requirements the bounds encode:
/// - `FromBytes + AsBytes`: every byte pattern of the right length is a
///   valid message and the struct has no padding, so a validated frame can
///   be reinterpreted in place;
/// - `Unaligned`: all fields are byte-array-backed (zerocopy byte-order
///   integers), so a frame at any buffer offset can be borrowed directly.
///
/// By convention the first field is the frame header
/// ([`crate::MessageHeader`] for network-order/u16 protocols), making the
/// header a layout prefix. The dispatch layer only ever constructs
/// messages by borrowing a validated byte range; they are never
/// heap-allocated and never outlive the buffer they alias.
pub trait Message: FromBytes + AsBytes + Unaligned + Sized + 'static {
    /// Protocol this message belongs to.
    type Protocol: Protocol;

    /// Catalog indicator identifying this message on the wire.
    const INDICATOR: <Self::Protocol as Protocol>::Indicator;

    /// Fixed wire length of this message layout.
    #[must_use]
    fn wire_len() -> usize {
        std::mem::size_of::<Self>()
    }
}
