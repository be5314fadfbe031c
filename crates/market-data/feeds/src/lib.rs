//! Feed wiring for the Tickwire stack
//!
//! Connects the framing layer to downstream consumers end to end:
//! - [`wire`]: the synthetic `SYNTH-MD` wire protocol and its messages
//! - [`event`]: the normalized [`MarketEvent`] handed to consumers
//! - [`handler`]: decodes frames into events and queues them on an SPSC
//!   ring for another thread
//! - [`session`]: carries partial frames across inbound chunks and
//!   surfaces stream corruption
//!
//! Real venue adapters follow the same shape; `SYNTH-MD` exists so the
//! whole path can run and be tested without a network.

#![deny(warnings)]
#![deny(clippy::all)]

pub mod event;
pub mod handler;
pub mod session;
pub mod wire;

pub use event::MarketEvent;
pub use handler::FeedHandler;
pub use session::{FeedSession, SessionError};
pub use wire::SynthMd;
