//! End-to-end feed tests: wire bytes → receiver → handler → event queue

use bus::SpscQueue;
use common::{L2Update, Px, Qty, Side, Symbol, Ts};
use feeds::wire::{Heartbeat, QuoteL1, Trade};
use feeds::{FeedHandler, FeedSession, MarketEvent, SessionError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use protocol::MessageHeader;
use zerocopy::AsBytes;

fn sample_stream() -> (Vec<u8>, Vec<MarketEvent>) {
    let ts = Ts::from_nanos(1_700_000_000_000_000_000);
    let sym = Symbol::new(5);

    let mut bytes = Vec::new();
    bytes.extend_from_slice(Heartbeat::new(1).as_bytes());
    bytes.extend_from_slice(
        Trade::new(ts, sym, Side::Bid, Px::new(101.5), Qty::new(2.0)).as_bytes(),
    );
    bytes.extend_from_slice(
        QuoteL1::new(
            ts,
            sym,
            (Px::new(101.4), Qty::new(7.0)),
            (Px::new(101.6), Qty::new(3.0)),
        )
        .as_bytes(),
    );
    bytes.extend_from_slice(Heartbeat::new(2).as_bytes());

    let expected = vec![
        MarketEvent::Heartbeat { sequence: 1 },
        MarketEvent::Trade {
            ts,
            symbol: sym,
            side: Side::Bid,
            price: Px::new(101.5),
            qty: Qty::new(2.0),
        },
        MarketEvent::Depth(L2Update {
            ts,
            symbol: sym,
            side: Side::Bid,
            price: Px::new(101.4),
            qty: Qty::new(7.0),
            level: 0,
        }),
        MarketEvent::Depth(L2Update {
            ts,
            symbol: sym,
            side: Side::Ask,
            price: Px::new(101.6),
            qty: Qty::new(3.0),
            level: 0,
        }),
        MarketEvent::Heartbeat { sequence: 2 },
    ];
    (bytes, expected)
}

#[test]
fn contiguous_stream_reaches_the_consumer_in_order() {
    let (bytes, expected) = sample_stream();
    let (tx, mut rx) = SpscQueue::with_capacity::<MarketEvent>(16);
    let mut session = FeedSession::new(FeedHandler::new(tx));

    let dispatched = session.ingest(&bytes).unwrap();
    assert_eq!(dispatched, 4);
    assert_eq!(session.buffered(), 0);

    let mut events = Vec::new();
    while let Some(event) = rx.pop() {
        events.push(event);
    }
    assert_eq!(events, expected);
    assert_eq!(session.handler().dropped(), 0);
}

#[test]
fn events_cross_to_a_consumer_thread() {
    let (bytes, expected) = sample_stream();
    let (tx, mut rx) = SpscQueue::with_capacity::<MarketEvent>(16);

    let consumer = std::thread::spawn(move || {
        let mut events = Vec::new();
        while events.len() < 5 {
            match rx.pop() {
                Some(event) => events.push(event),
                None => std::thread::yield_now(),
            }
        }
        events
    });

    let mut session = FeedSession::new(FeedHandler::new(tx));
    session.ingest(&bytes).unwrap();

    assert_eq!(consumer.join().unwrap(), expected);
}

#[test]
fn full_queue_counts_drops_without_blocking() {
    let (bytes, _) = sample_stream();
    let (tx, mut rx) = SpscQueue::with_capacity::<MarketEvent>(2);
    let mut session = FeedSession::new(FeedHandler::new(tx));

    // 4 frames decode to 5 events; a 2-slot queue delivers 2, drops 3.
    let dispatched = session.ingest(&bytes).unwrap();
    assert_eq!(dispatched, 4);
    assert_eq!(session.handler().dropped(), 3);
    assert_eq!(rx.len(), 2);
    assert_eq!(rx.pop(), Some(MarketEvent::Heartbeat { sequence: 1 }));
}

#[test]
fn corrupt_header_kills_the_session_buffer() {
    let (tx, _rx) = SpscQueue::with_capacity::<MarketEvent>(16);
    let mut session = FeedSession::new(FeedHandler::new(tx));

    let mut bytes = Heartbeat::new(1).as_bytes().to_vec();
    bytes.extend_from_slice(MessageHeader::new(2, 1).as_bytes()); // runt
    bytes.extend_from_slice(Heartbeat::new(2).as_bytes());

    match session.ingest(&bytes) {
        Err(SessionError::Corrupt(_)) => {}
        Ok(n) => panic!("corrupt stream must error, dispatched {n}"),
    }
    assert_eq!(session.buffered(), 0);
}

proptest! {
    /// However a stream is split into chunks, the consumer sees exactly
    /// the contiguous-delivery events.
    #[test]
    fn chunking_never_changes_the_event_stream(cuts in prop::collection::vec(1usize..64, 0..32)) {
        let (bytes, expected) = sample_stream();
        let (tx, mut rx) = SpscQueue::with_capacity::<MarketEvent>(32);
        let mut session = FeedSession::new(FeedHandler::new(tx));

        let mut offset = 0;
        for cut in cuts {
            let end = (offset + cut).min(bytes.len());
            session.ingest(&bytes[offset..end]).unwrap();
            offset = end;
        }
        session.ingest(&bytes[offset..]).unwrap();

        let mut events = Vec::new();
        while let Some(event) = rx.pop() {
            events.push(event);
        }
        prop_assert_eq!(events, expected);
        prop_assert_eq!(session.buffered(), 0);
    }
}
