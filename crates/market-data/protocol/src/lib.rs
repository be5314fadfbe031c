//! Binary message protocol framework
//!
//! Turns raw exchange bytes into typed, dispatched messages with no
//! per-message allocation and no runtime type inspection:
//!
//! - [`schema`]: compile-time protocol descriptors: name, version, wire
//!   byte order, and the ordered catalog of message indicators
//! - [`header`]: the `(indicator, length)` prefix contract every frame
//!   starts with
//! - [`message`]: the fixed-layout message contract (zerocopy types whose
//!   first bytes are the header)
//! - [`dispatch`]: explicit route registration compiled into an immutable
//!   indicator-indexed function-pointer table, built once per
//!   (handler type, protocol) pair
//! - [`receiver`]: the streaming frame slicer that walks a buffer,
//!   dispatches complete frames in wire order, and returns the trailing
//!   bytes the caller must carry into the next chunk
//!
//! Transport acquisition, exchange schemas, and persistence live elsewhere;
//! this crate begins at "bytes are in memory" and ends at "handler saw a
//! typed message".

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(missing_docs)]

pub mod dispatch;
pub mod header;
pub mod message;
pub mod receiver;
pub mod schema;
pub mod version;

pub use dispatch::{Dispatch, DispatchTable, Handle, Routes};
pub use header::{FRAME_LEN_WIDTH, Header, MessageHeader};
pub use message::Message;
pub use receiver::{Drain, FrameError, Receiver};
pub use schema::{Indicator, Protocol, ProtocolDescriptor};
pub use version::Version;
