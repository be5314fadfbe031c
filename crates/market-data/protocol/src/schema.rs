//! Compile-time protocol descriptors
//!
//! A protocol is a *type*: its name, version, wire byte order, and ordered
//! message catalog are associated constants, so mixing messages from two
//! protocols is a type error rather than a runtime surprise.

use crate::header::FRAME_LEN_WIDTH;
use crate::version::Version;
use byteorder::ByteOrder;
use std::fmt;
use std::hash::Hash;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// Integer type carrying message indicators on the wire.
///
/// Sealed to `u8` and `u16`: dispatch tables are sized by the full value
/// range of the indicator type, which only stays reasonable for one- and
/// two-byte indicators.
pub trait Indicator:
    sealed::Sealed + Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static
{
    /// Bytes this indicator occupies on the wire.
    const WIDTH: usize;
    /// Number of distinct encodable values; the dispatch-table row count.
    const CARDINALITY: usize;

    /// Read an indicator from the front of `buf` in byte order `O`.
    ///
    /// Callers guarantee `buf.len() >= WIDTH`.
    fn read<O: ByteOrder>(buf: &[u8]) -> Self;

    /// Write this indicator to the front of `buf` in byte order `O`.
    fn write<O: ByteOrder>(self, buf: &mut [u8]);

    /// Row index in a full-range dispatch table.
    fn index(self) -> usize;

    /// Widened value for diagnostics and descriptors.
    fn widen(self) -> u16;
}

impl Indicator for u8 {
    const WIDTH: usize = 1;
    const CARDINALITY: usize = 1 << 8;

    fn read<O: ByteOrder>(buf: &[u8]) -> Self {
        buf[0]
    }

    fn write<O: ByteOrder>(self, buf: &mut [u8]) {
        buf[0] = self;
    }

    fn index(self) -> usize {
        usize::from(self)
    }

    fn widen(self) -> u16 {
        u16::from(self)
    }
}

impl Indicator for u16 {
    const WIDTH: usize = 2;
    const CARDINALITY: usize = 1 << 16;

    fn read<O: ByteOrder>(buf: &[u8]) -> Self {
        O::read_u16(buf)
    }

    fn write<O: ByteOrder>(self, buf: &mut [u8]) {
        O::write_u16(buf, self);
    }

    fn index(self) -> usize {
        usize::from(self)
    }

    fn widen(self) -> u16 {
        self
    }
}

/// Compile-time description of one wire protocol.
///
/// Implemented on an empty marker type per protocol. The catalog is fixed
/// at definition time; the framework never mutates it.
pub trait Protocol: 'static {
    /// Wire encoding of message indicators.
    type Indicator: Indicator;
    /// Byte order of the header fields. A property of the wire format,
    /// chosen by the protocol, never inferred from content.
    type Order: ByteOrder + 'static;

    /// Protocol name as published by the venue.
    const NAME: &'static str;
    /// Protocol revision.
    const VERSION: Version;
    /// Ordered, duplicate-free catalog of declared message indicators.
    const CATALOG: &'static [Self::Indicator];

    /// Total header length: indicator plus the u16 frame-length field.
    #[must_use]
    fn header_len() -> usize {
        <Self::Indicator as Indicator>::WIDTH + FRAME_LEN_WIDTH
    }

    /// True when `indicator` is part of the declared catalog.
    #[must_use]
    fn in_catalog(indicator: Self::Indicator) -> bool {
        Self::CATALOG.contains(&indicator)
    }

    /// Runtime reflection of this protocol for comparison and logging.
    #[must_use]
    fn descriptor() -> ProtocolDescriptor {
        ProtocolDescriptor {
            name: Self::NAME,
            version: Self::VERSION,
            catalog: Self::CATALOG.iter().map(|i| i.widen()).collect(),
        }
    }
}

/// Runtime-comparable reflection of a [`Protocol`] type.
///
/// Two protocols are the same wire contract iff name, version, and the
/// full indicator sequence are equal; ordering compares in that priority.
/// The protocol *type* remains the compile-time identity; this value
/// exists to detect accidental protocol/version mismatches in tests and
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolDescriptor {
    /// Declared protocol name.
    pub name: &'static str,
    /// Declared revision.
    pub version: Version,
    /// Catalog widened to u16 for uniform comparison.
    pub catalog: Vec<u16>,
}

impl fmt::Display for ProtocolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} messages)",
            self.name,
            self.version,
            self.catalog.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};

    #[test]
    fn test_u16_indicator_respects_byte_order() {
        let mut buf = [0u8; 2];
        0x0102u16.write::<BigEndian>(&mut buf);
        assert_eq!(buf, [0x01, 0x02]);
        assert_eq!(u16::read::<BigEndian>(&buf), 0x0102);
        assert_eq!(u16::read::<LittleEndian>(&buf), 0x0201);
    }

    #[test]
    fn test_u8_indicator_ignores_byte_order() {
        let mut buf = [0u8; 1];
        7u8.write::<BigEndian>(&mut buf);
        assert_eq!(u8::read::<LittleEndian>(&buf), 7);
        assert_eq!(7u8.index(), 7);
    }
}
