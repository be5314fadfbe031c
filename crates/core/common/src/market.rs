//! Normalized market-data types shared across feed handlers

use crate::types::{Px, Qty, Symbol, Ts};
use serde::{Deserialize, Serialize};

/// Side of the order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Buy side (bid)
    Bid = 0,
    /// Sell side (ask/offer)
    Ask = 1,
}

impl Side {
    /// Wire byte for this side.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Side {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Bid),
            1 => Ok(Self::Ask),
            other => Err(other),
        }
    }
}

/// Normalized L2 update (absolute replace at price level)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2Update {
    /// Event timestamp in nanoseconds
    pub ts: Ts,
    /// Trading symbol
    pub symbol: Symbol,
    /// Side of the book
    pub side: Side,
    /// Price level
    pub price: Px,
    /// Quantity at this level (0 = remove level)
    pub qty: Qty,
    /// Level index (0 = best)
    pub level: u8,
}
