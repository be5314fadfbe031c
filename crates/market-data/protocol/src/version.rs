//! Protocol version markers

use std::fmt;

/// Protocol revision: major, minor, and a vendor revision letter.
///
/// Ordering is major, then minor, then letter, so catalogs can assert a
/// minimum revision with a plain comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major revision; wire-incompatible changes bump this.
    pub major: u32,
    /// Minor revision; catalog additions bump this.
    pub minor: u32,
    /// Vendor revision letter, `'\0'` when unused.
    pub letter: char,
}

impl Version {
    /// Create a version constant.
    #[must_use]
    pub const fn new(major: u32, minor: u32, letter: char) -> Self {
        Self {
            major,
            minor,
            letter,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.letter.is_ascii_alphanumeric() {
            write!(f, "{}", self.letter)?;
        }
        Ok(())
    }
}
