//! Core value types for the Tickwire connectivity stack
//!
//! Everything here is a plain value: fixed-point prices and quantities,
//! instrument identifiers, timestamps, and the normalized book-update
//! types the feed layer emits. No I/O, no state machines.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(missing_docs)]

pub mod market;
pub mod symbol;
pub mod time;
pub mod types;

pub use market::{L2Update, Side};
pub use symbol::SymbolName;
pub use time::TimeOfDay;
pub use types::{ParseFixedError, Px, Qty, Symbol, Ts};
