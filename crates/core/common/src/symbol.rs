//! Fixed-width wire symbol names
//!
//! Exchange wire formats carry instrument names as fixed-width, space-padded
//! ASCII fields. [`SymbolName`] keeps that exact layout so message structs
//! can embed it directly.

use std::fmt;
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

/// Padding byte used to fill unused trailing positions.
pub const FILL: u8 = b' ';

/// Fixed-width, space-padded symbol name as it appears on the wire.
///
/// `N` is the wire width in bytes. Construction truncates overlong input;
/// comparison and hashing operate on the raw padded bytes, matching how the
/// field compares inside a frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash, FromBytes, FromZeroes, AsBytes, Unaligned)]
#[repr(transparent)]
pub struct SymbolName<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> SymbolName<N> {
    /// Build a name from a string, truncating at `N` and padding with spaces.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let mut bytes = [FILL; N];
        let src = name.as_bytes();
        let take = src.len().min(N);
        bytes[..take].copy_from_slice(&src[..take]);
        Self { bytes }
    }

    /// Wrap raw wire bytes without inspection.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    /// The name with trailing padding removed.
    ///
    /// Non-UTF-8 wire bytes render as an empty name rather than panicking.
    #[must_use]
    pub fn as_str(&self) -> &str {
        let end = self
            .bytes
            .iter()
            .rposition(|&b| b != FILL)
            .map_or(0, |i| i + 1);
        std::str::from_utf8(&self.bytes[..end]).unwrap_or("")
    }

    /// Raw padded bytes as laid out on the wire.
    #[must_use]
    pub const fn as_wire_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Length of the name excluding padding.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// True when every position is padding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(|&b| b == FILL)
    }

    /// Wire width in bytes.
    #[must_use]
    pub const fn capacity() -> usize {
        N
    }
}

impl<const N: usize> Default for SymbolName<N> {
    fn default() -> Self {
        Self { bytes: [FILL; N] }
    }
}

impl<const N: usize> fmt::Display for SymbolName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for SymbolName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolName({:?})", self.as_str())
    }
}

impl<const N: usize> From<&str> for SymbolName<N> {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
