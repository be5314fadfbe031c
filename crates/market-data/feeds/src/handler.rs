//! Frame handler bridging the receiver to the event queue
//!
//! [`FeedHandler`] is the dispatch target for `SYNTH-MD`: each routed
//! message decodes into a [`MarketEvent`] and goes onto an SPSC ring for
//! whatever thread consumes events. The queue never blocks the receive
//! path; when the consumer falls behind, events are dropped and counted.

use crate::event::MarketEvent;
use crate::wire::{Heartbeat, QuoteL1, SynthMd, Trade};
use bus::{Full, Producer};
use common::{L2Update, Side};
use protocol::{Dispatch, Handle, Routes};
use tracing::{debug, warn};

/// Decodes `SYNTH-MD` frames into [`MarketEvent`]s on an SPSC ring.
pub struct FeedHandler {
    events: Producer<MarketEvent>,
    dropped: u64,
    last_sequence: Option<u32>,
}

impl FeedHandler {
    /// Bind the handler to the producing half of an event queue.
    #[must_use]
    pub fn new(events: Producer<MarketEvent>) -> Self {
        Self {
            events,
            dropped: 0,
            last_sequence: None,
        }
    }

    /// Events discarded because the consumer fell behind.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn emit(&mut self, event: MarketEvent) {
        if let Err(Full(_)) = self.events.push(event) {
            self.dropped += 1;
            debug!(dropped = self.dropped, "event queue full, event dropped");
        }
    }
}

impl Handle<Heartbeat> for FeedHandler {
    fn handle(&mut self, message: &Heartbeat) {
        let sequence = message.sequence();
        if let Some(last) = self.last_sequence {
            if sequence != last.wrapping_add(1) {
                warn!(last, sequence, "heartbeat sequence gap");
            }
        }
        self.last_sequence = Some(sequence);
        self.emit(MarketEvent::Heartbeat { sequence });
    }
}

impl Handle<Trade> for FeedHandler {
    fn handle(&mut self, message: &Trade) {
        let Some(side) = message.side() else {
            debug!(symbol = message.symbol().0, "trade with invalid side byte, ignored");
            return;
        };
        self.emit(MarketEvent::Trade {
            ts: message.ts(),
            symbol: message.symbol(),
            side,
            price: message.price(),
            qty: message.qty(),
        });
    }
}

impl Handle<QuoteL1> for FeedHandler {
    fn handle(&mut self, message: &QuoteL1) {
        let ts = message.ts();
        let symbol = message.symbol();
        let (bid, bid_qty) = message.bid();
        let (ask, ask_qty) = message.ask();
        self.emit(MarketEvent::Depth(L2Update {
            ts,
            symbol,
            side: Side::Bid,
            price: bid,
            qty: bid_qty,
            level: 0,
        }));
        self.emit(MarketEvent::Depth(L2Update {
            ts,
            symbol,
            side: Side::Ask,
            price: ask,
            qty: ask_qty,
            level: 0,
        }));
    }
}

impl Dispatch<SynthMd> for FeedHandler {
    fn routes(routes: &mut Routes<Self, SynthMd>) {
        routes.route::<Heartbeat>().route::<Trade>().route::<QuoteL1>();
    }
}
