//! Core fixed-point and identifier types
//!
//! Prices and quantities are stored as `i64` ticks with 4 implied decimal
//! places so arithmetic stays deterministic across hosts. Wire layers move
//! the raw tick counts; floats only appear at the display/ingest edges.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Implied decimal places carried by [`Px`] and [`Qty`].
pub const FIXED_DECIMALS: u32 = 4;

/// Ticks per whole unit (10^4).
const SCALE: i64 = 10_000;

/// Symbol identifier for trading instruments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(pub u32);

impl Symbol {
    /// Create a new Symbol with given ID
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SYM_{}", self.0)
    }
}

/// Error parsing a decimal literal into a fixed-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseFixedError {
    /// Input is not a decimal number.
    #[error("invalid decimal literal")]
    Invalid,
    /// More fractional digits than the tick grid carries.
    #[error("more than 4 fractional digits")]
    Precision,
    /// Magnitude exceeds the i64 tick range.
    #[error("value out of range")]
    Range,
}

/// Parse a decimal string into ticks without going through f64.
fn parse_ticks(s: &str) -> Result<i64, ParseFixedError> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, f),
        None => (rest, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ParseFixedError::Invalid);
    }
    if frac_part.len() > FIXED_DECIMALS as usize {
        return Err(ParseFixedError::Precision);
    }

    let mut ticks: i64 = 0;
    for b in int_part.bytes() {
        if !b.is_ascii_digit() {
            return Err(ParseFixedError::Invalid);
        }
        ticks = ticks
            .checked_mul(10)
            .and_then(|t| t.checked_add(i64::from(b - b'0')))
            .ok_or(ParseFixedError::Range)?;
    }
    ticks = ticks.checked_mul(SCALE).ok_or(ParseFixedError::Range)?;

    let mut frac: i64 = 0;
    for b in frac_part.bytes() {
        if !b.is_ascii_digit() {
            return Err(ParseFixedError::Invalid);
        }
        frac = frac * 10 + i64::from(b - b'0');
    }
    for _ in frac_part.len()..FIXED_DECIMALS as usize {
        frac *= 10;
    }
    ticks = ticks.checked_add(frac).ok_or(ParseFixedError::Range)?;

    if negative {
        ticks = -ticks;
    }
    Ok(ticks)
}

/// Price type (stored as i64 ticks for determinism, 4 decimal places)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Px(i64); // Internal: price in ticks (1 tick = 0.0001)

impl Px {
    /// Create a new Price from f64 (converts to ticks)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(value: f64) -> Self {
        Self((value * 10000.0).round() as i64)
    }

    /// Get the price as f64
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// Get price as i64 ticks
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Create from i64 ticks
    #[must_use]
    pub const fn from_i64(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Zero price
    pub const ZERO: Self = Self(0);
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.as_f64())
    }
}

impl FromStr for Px {
    type Err = ParseFixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_ticks(s).map(Self)
    }
}

impl std::ops::Add for Px {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Px {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

/// Quantity type for order sizes (stored as i64 units for determinism, 4 decimal places)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Qty(i64); // Internal: quantity in units (1 unit = 0.0001)

impl Qty {
    /// Create a new Quantity from f64
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(value: f64) -> Self {
        Self((value * 10000.0).round() as i64)
    }

    /// Get the quantity as f64
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// Get quantity as i64 units
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Create from i64 units
    #[must_use]
    pub const fn from_i64(units: i64) -> Self {
        Self(units)
    }

    /// Check if quantity is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Zero quantity
    pub const ZERO: Self = Self(0);
}

impl fmt::Display for Qty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.as_f64())
    }
}

impl FromStr for Qty {
    type Err = ParseFixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_ticks(s).map(Self)
    }
}

impl std::ops::Add for Qty {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Qty {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

/// Timestamp in nanoseconds since UNIX epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ts(pub u64);

impl Ts {
    /// Get current timestamp
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| std::time::Duration::from_secs(0))
            .as_nanos() as u64;
        Self(nanos)
    }

    /// Create timestamp from nanoseconds
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Get timestamp as nanoseconds
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Get timestamp as microseconds
    #[must_use]
    pub const fn as_micros(&self) -> u64 {
        self.0 / 1000
    }

    /// Get timestamp as milliseconds
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000_000
    }
}

impl fmt::Display for Ts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_serde() -> Result<(), Box<dyn std::error::Error>> {
        let px = Px::new(1234.56);
        let encoded = bincode::serialize(&px)?;
        let decoded: Px = bincode::deserialize(&encoded)?;
        assert_eq!(px, decoded);
        Ok(())
    }

    #[test]
    fn test_px_parse() {
        assert_eq!("1234.56".parse::<Px>(), Ok(Px::from_i64(12_345_600)));
        assert_eq!("-0.0001".parse::<Px>(), Ok(Px::from_i64(-1)));
        assert_eq!("42".parse::<Px>(), Ok(Px::from_i64(420_000)));
        assert_eq!(".5".parse::<Px>(), Ok(Px::from_i64(5_000)));
        assert_eq!("".parse::<Px>(), Err(ParseFixedError::Invalid));
        assert_eq!("1.2.3".parse::<Px>(), Err(ParseFixedError::Invalid));
        assert_eq!("1.00001".parse::<Px>(), Err(ParseFixedError::Precision));
        assert_eq!(
            "99999999999999999999".parse::<Px>(),
            Err(ParseFixedError::Range)
        );
    }

    #[test]
    fn test_px_parse_matches_float_constructor() {
        let parsed: Px = "65000.25".parse().unwrap();
        assert_eq!(parsed, Px::new(65000.25));
    }

    #[test]
    fn test_px_arithmetic() {
        let a = Px::new(100.5);
        let b = Px::new(0.5);
        assert_eq!(a + b, Px::new(101.0));
        assert_eq!(a - b, Px::new(100.0));
    }

    #[test]
    fn test_qty_serde() -> Result<(), Box<dyn std::error::Error>> {
        let qty = Qty::new(100.0);
        let encoded = bincode::serialize(&qty)?;
        let decoded: Qty = bincode::deserialize(&encoded)?;
        assert_eq!(qty, decoded);
        Ok(())
    }

    #[test]
    fn test_qty_zero() {
        assert!(Qty::ZERO.is_zero());
        assert!(!Qty::new(0.0001).is_zero());
    }

    #[test]
    fn test_ts_conversions() {
        let ts = Ts::from_nanos(1_234_567_890);
        assert_eq!(ts.as_nanos(), 1_234_567_890);
        assert_eq!(ts.as_micros(), 1_234_567);
        assert_eq!(ts.as_millis(), 1_234);
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::new(42).to_string(), "SYM_42");
    }
}
