//! Lock-free thread plumbing for ultra-low-latency message passing
//!
//! Two primitives, both allocation-free after construction:
//! - [`spsc`]: a fixed-capacity single-producer/single-consumer ring for
//!   handing values between exactly two threads without locks
//! - [`spin`]: a busy-wait mutual exclusion lock keyed by owning-thread
//!   identity, for short critical sections outside the SPSC path
//!
//! Neither primitive parks threads or touches the OS scheduler; waiting is
//! CPU-bound polling by design.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(missing_docs)]

pub mod spin;
pub mod spsc;

pub use spin::{SpinGuard, SpinLock};
pub use spsc::{Consumer, Full, Producer, SpscQueue};
