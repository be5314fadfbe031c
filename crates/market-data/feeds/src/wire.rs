//! The `SYNTH-MD` wire protocol
//!
//! A compact network-byte-order market-data format with three messages:
//! heartbeat, trade, and top-of-book quote. Prices and quantities travel
//! as i64 ticks on the 4-decimal grid [`common::Px`]/[`common::Qty`] use,
//! so decoding is a reinterpretation, not a conversion.

use common::{Px, Qty, Side, Symbol, Ts};
use protocol::{Message, MessageHeader, Protocol, Version};
use zerocopy::byteorder::{I64, NetworkEndian, U32, U64};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

/// Message indicators declared by the protocol catalog.
pub mod indicator {
    /// Liveness beacon.
    pub const HEARTBEAT: u16 = 1;
    /// Executed trade print.
    pub const TRADE: u16 = 2;
    /// Top-of-book quote replace.
    pub const QUOTE_L1: u16 = 3;
}

/// Marker type describing the `SYNTH-MD` wire contract.
pub struct SynthMd;

impl Protocol for SynthMd {
    type Indicator = u16;
    type Order = byteorder::NetworkEndian;
    const NAME: &'static str = "SYNTH-MD";
    const VERSION: Version = Version::new(1, 0, 'a');
    const CATALOG: &'static [u16] = &[
        indicator::HEARTBEAT,
        indicator::TRADE,
        indicator::QUOTE_L1,
    ];
}

/// Liveness beacon with a monotone sequence number (8 bytes).
#[derive(FromBytes, FromZeroes, AsBytes, Unaligned, Clone, Copy, Debug)]
#[repr(C)]
pub struct Heartbeat {
    header: MessageHeader,
    sequence: U32<NetworkEndian>,
}

impl Heartbeat {
    /// Build a heartbeat frame.
    #[must_use]
    pub fn new(sequence: u32) -> Self {
        Self {
            header: MessageHeader::new(indicator::HEARTBEAT, Self::wire_len() as u16),
            sequence: U32::new(sequence),
        }
    }

    /// Monotone feed sequence number.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.sequence.get()
    }
}

impl Message for Heartbeat {
    type Protocol = SynthMd;
    const INDICATOR: u16 = indicator::HEARTBEAT;
}

/// Executed trade print (36 bytes).
#[derive(FromBytes, FromZeroes, AsBytes, Unaligned, Clone, Copy, Debug)]
#[repr(C)]
pub struct Trade {
    header: MessageHeader,
    ts: U64<NetworkEndian>,
    price_ticks: I64<NetworkEndian>,
    qty_units: I64<NetworkEndian>,
    symbol: U32<NetworkEndian>,
    side: u8,
    _pad: [u8; 3],
}

impl Trade {
    /// Build a trade frame.
    #[must_use]
    pub fn new(ts: Ts, symbol: Symbol, side: Side, price: Px, qty: Qty) -> Self {
        Self {
            header: MessageHeader::new(indicator::TRADE, Self::wire_len() as u16),
            ts: U64::new(ts.as_nanos()),
            price_ticks: I64::new(price.as_i64()),
            qty_units: I64::new(qty.as_i64()),
            symbol: U32::new(symbol.0),
            side: side.as_u8(),
            _pad: [0; 3],
        }
    }

    /// Event timestamp.
    #[must_use]
    pub fn ts(&self) -> Ts {
        Ts::from_nanos(self.ts.get())
    }

    /// Traded price.
    #[must_use]
    pub fn price(&self) -> Px {
        Px::from_i64(self.price_ticks.get())
    }

    /// Traded quantity.
    #[must_use]
    pub fn qty(&self) -> Qty {
        Qty::from_i64(self.qty_units.get())
    }

    /// Instrument identifier.
    #[must_use]
    pub fn symbol(&self) -> Symbol {
        Symbol::new(self.symbol.get())
    }

    /// Aggressor side; `None` when the wire byte is out of range.
    #[must_use]
    pub fn side(&self) -> Option<Side> {
        Side::try_from(self.side).ok()
    }
}

impl Message for Trade {
    type Protocol = SynthMd;
    const INDICATOR: u16 = indicator::TRADE;
}

/// Top-of-book quote replace (48 bytes).
#[derive(FromBytes, FromZeroes, AsBytes, Unaligned, Clone, Copy, Debug)]
#[repr(C)]
pub struct QuoteL1 {
    header: MessageHeader,
    ts: U64<NetworkEndian>,
    bid_ticks: I64<NetworkEndian>,
    ask_ticks: I64<NetworkEndian>,
    bid_units: I64<NetworkEndian>,
    ask_units: I64<NetworkEndian>,
    symbol: U32<NetworkEndian>,
}

impl QuoteL1 {
    /// Build a quote frame.
    #[must_use]
    pub fn new(ts: Ts, symbol: Symbol, bid: (Px, Qty), ask: (Px, Qty)) -> Self {
        Self {
            header: MessageHeader::new(indicator::QUOTE_L1, Self::wire_len() as u16),
            ts: U64::new(ts.as_nanos()),
            bid_ticks: I64::new(bid.0.as_i64()),
            ask_ticks: I64::new(ask.0.as_i64()),
            bid_units: I64::new(bid.1.as_i64()),
            ask_units: I64::new(ask.1.as_i64()),
            symbol: U32::new(symbol.0),
        }
    }

    /// Event timestamp.
    #[must_use]
    pub fn ts(&self) -> Ts {
        Ts::from_nanos(self.ts.get())
    }

    /// Best bid price and size.
    #[must_use]
    pub fn bid(&self) -> (Px, Qty) {
        (
            Px::from_i64(self.bid_ticks.get()),
            Qty::from_i64(self.bid_units.get()),
        )
    }

    /// Best ask price and size.
    #[must_use]
    pub fn ask(&self) -> (Px, Qty) {
        (
            Px::from_i64(self.ask_ticks.get()),
            Qty::from_i64(self.ask_units.get()),
        )
    }

    /// Instrument identifier.
    #[must_use]
    pub fn symbol(&self) -> Symbol {
        Symbol::new(self.symbol.get())
    }
}

impl Message for QuoteL1 {
    type Protocol = SynthMd;
    const INDICATOR: u16 = indicator::QUOTE_L1;
}
