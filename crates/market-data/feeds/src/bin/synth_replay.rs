//! Synthetic feed replay: generate SYNTH-MD frames, run them through a
//! session in network-sized chunks, and consume the events on a second
//! thread. Smoke-tests the whole receive path without a network.

use anyhow::Result;
use bus::SpscQueue;
use common::{Px, Qty, Side, Symbol, Ts};
use feeds::wire::{Heartbeat, QuoteL1, Trade};
use feeds::{FeedHandler, FeedSession, MarketEvent};
use tracing::info;
use zerocopy::AsBytes;

const TICKS: u32 = 1_000;
const CHUNK: usize = 1_460; // one TCP segment's worth

fn synthetic_stream() -> Vec<u8> {
    let mut bytes = Vec::new();
    let symbol = Symbol::new(1);
    for i in 0..TICKS {
        let ts = Ts::from_nanos(u64::from(i) * 1_000_000);
        let mid = Px::new(100.0) + Px::from_i64(i64::from(i % 200));
        bytes.extend_from_slice(Heartbeat::new(i).as_bytes());
        bytes.extend_from_slice(
            Trade::new(ts, symbol, Side::Bid, mid, Qty::new(1.0)).as_bytes(),
        );
        bytes.extend_from_slice(
            QuoteL1::new(
                ts,
                symbol,
                (mid - Px::from_i64(5), Qty::new(10.0)),
                (mid + Px::from_i64(5), Qty::new(8.0)),
            )
            .as_bytes(),
        );
    }
    bytes
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (tx, mut rx) = SpscQueue::with_capacity::<MarketEvent>(4_096);

    let consumer = std::thread::spawn(move || {
        let mut trades = 0u64;
        let mut levels = 0u64;
        let mut beats = 0u64;
        let mut seen = 0u64;
        loop {
            match rx.pop() {
                Some(MarketEvent::Trade { .. }) => trades += 1,
                Some(MarketEvent::Depth(_)) => levels += 1,
                Some(MarketEvent::Heartbeat { .. }) => beats += 1,
                None => {
                    std::thread::yield_now();
                    continue;
                }
            }
            seen += 1;
            if seen == u64::from(TICKS) * 4 {
                return (beats, trades, levels);
            }
        }
    });

    let stream = synthetic_stream();
    info!(bytes = stream.len(), "replaying synthetic stream");

    let mut session = FeedSession::new(FeedHandler::new(tx));
    let mut dispatched = 0;
    for chunk in stream.chunks(CHUNK) {
        dispatched += session.ingest(chunk)?;
    }

    let (beats, trades, levels) = consumer
        .join()
        .map_err(|_| anyhow::anyhow!("consumer thread panicked"))?;
    info!(
        dispatched,
        beats,
        trades,
        levels,
        dropped = session.handler().dropped(),
        "replay complete"
    );
    Ok(())
}
