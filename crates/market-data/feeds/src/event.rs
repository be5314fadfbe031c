//! Normalized events emitted by feed handlers

use common::{L2Update, Px, Qty, Symbol, Ts};

/// One normalized market-data event, decoded from a wire frame.
///
/// Owns its data; unlike the wire messages it does not alias the receive
/// buffer, so it can cross threads through the event queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketEvent {
    /// Feed liveness beacon.
    Heartbeat {
        /// Monotone feed sequence number.
        sequence: u32,
    },
    /// Executed trade print.
    Trade {
        /// Event timestamp.
        ts: Ts,
        /// Instrument identifier.
        symbol: Symbol,
        /// Aggressor side.
        side: common::Side,
        /// Traded price.
        price: Px,
        /// Traded quantity.
        qty: Qty,
    },
    /// Absolute replace of one book level; a quote frame becomes one of
    /// these per side.
    Depth(L2Update),
}
