//! Route registration and the per-pairing dispatch table
//!
//! Dispatch is resolved once, at receiver construction: each (handler
//! type, protocol) pair gets an immutable table with one row per encodable
//! indicator value, holding either a monomorphized function pointer or
//! nothing. The hot path is a single indexed load and an indirect call:
//! no enum match, no hash lookup, no content inspection.

use crate::message::Message;
use crate::schema::{Indicator, Protocol};
use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::{OnceLock, PoisonError, RwLock};
use tracing::{debug, warn};

/// Monomorphized entry point delivering one framed message to a handler.
type Thunk<H> = fn(&mut H, &[u8]);

/// Capability to consume messages of type `M`.
///
/// A handler participates in dispatch for an indicator iff it implements
/// `Handle` for that indicator's message type *and* registers the route in
/// [`Dispatch::routes`]. Handlers without the capability simply never see
/// the message; there is no runtime interface to miss.
pub trait Handle<M> {
    /// Consume one message. The reference aliases the receive buffer and
    /// is only valid for the duration of the call.
    fn handle(&mut self, message: &M);
}

/// Declares which messages a handler consumes from protocol `P`.
pub trait Dispatch<P: Protocol>: Sized + 'static {
    /// Register every message this handler wants via [`Routes::route`].
    fn routes(routes: &mut Routes<Self, P>);
}

/// Route registration builder handed to [`Dispatch::routes`].
pub struct Routes<H, P: Protocol> {
    rows: Box<[Option<Thunk<H>>]>,
    _protocol: PhantomData<fn() -> P>,
}

impl<H: 'static, P: Protocol> Routes<H, P> {
    fn new() -> Self {
        Self {
            rows: vec![None; <P::Indicator as Indicator>::CARDINALITY].into_boxed_slice(),
            _protocol: PhantomData,
        }
    }

    /// Route frames carrying `M::INDICATOR` to the handler's
    /// [`Handle<M>`] implementation.
    ///
    /// An indicator outside the protocol's declared catalog is ignored
    /// with a warning: only catalog ∩ capability rows are populated, and
    /// everything else stays a silent drop.
    pub fn route<M>(&mut self) -> &mut Self
    where
        M: Message<Protocol = P>,
        H: Handle<M>,
    {
        if !P::in_catalog(M::INDICATOR) {
            warn!(
                protocol = P::NAME,
                indicator = M::INDICATOR.widen(),
                "route ignored: indicator not in protocol catalog"
            );
            return self;
        }
        debug_assert!(M::wire_len() >= P::header_len());
        self.rows[M::INDICATOR.index()] = Some(deliver::<H, M>);
        self
    }

    fn into_table(self) -> DispatchTable<H, P> {
        DispatchTable {
            rows: self.rows,
            _protocol: PhantomData,
        }
    }
}

/// Reinterpret a complete frame as `M` and hand it to the handler.
fn deliver<H, M>(handler: &mut H, frame: &[u8])
where
    M: Message,
    H: Handle<M>,
{
    match M::ref_from_prefix(frame) {
        Some(message) => handler.handle(message),
        // The declared frame length undershot the message layout; refusing
        // to reinterpret a short buffer, the frame is dropped.
        None => warn!(
            indicator = M::INDICATOR.widen(),
            frame_len = frame.len(),
            wire_len = M::wire_len(),
            "frame shorter than message layout, dropped"
        ),
    }
}

/// Immutable indicator-indexed dispatch table for one
/// (handler type, protocol) pair.
///
/// Built exactly once per pairing and shared by every receiver of that
/// pairing for the life of the process.
pub struct DispatchTable<H, P: Protocol> {
    rows: Box<[Option<Thunk<H>>]>,
    _protocol: PhantomData<fn() -> P>,
}

impl<H, P: Protocol> DispatchTable<H, P> {
    /// Entry point for `indicator`, if any route was registered.
    pub(crate) fn get(&self, indicator: P::Indicator) -> Option<Thunk<H>> {
        self.rows[indicator.index()]
    }

    /// Number of populated rows.
    #[must_use]
    pub fn routed(&self) -> usize {
        self.rows.iter().filter(|row| row.is_some()).count()
    }
}

type RegistryKey = (TypeId, TypeId);
type RegistryMap = FxHashMap<RegistryKey, &'static (dyn Any + Send + Sync)>;

static REGISTRY: OnceLock<RwLock<RegistryMap>> = OnceLock::new();

/// The process-wide table for the `(H, P)` pairing, building it on first
/// use.
///
/// The build runs under the registry's write lock, so concurrent receiver
/// construction performs a single definite initialization; later callers
/// only take the read lock.
pub(crate) fn table_for<H, P>() -> &'static DispatchTable<H, P>
where
    H: Dispatch<P>,
    P: Protocol,
{
    let registry = REGISTRY.get_or_init(|| RwLock::new(FxHashMap::default()));
    let key = (TypeId::of::<H>(), TypeId::of::<P>());

    {
        let map = registry.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = map.get(&key) {
            return downcast::<H, P>(*entry);
        }
    }

    let mut map = registry.write().unwrap_or_else(PoisonError::into_inner);
    let entry = map.entry(key).or_insert_with(|| {
        let mut routes = Routes::new();
        H::routes(&mut routes);
        let table = routes.into_table();
        debug!(
            protocol = P::NAME,
            routed = table.routed(),
            "dispatch table built"
        );
        let leaked: &'static DispatchTable<H, P> = Box::leak(Box::new(table));
        leaked as &'static (dyn Any + Send + Sync)
    });
    downcast::<H, P>(*entry)
}

fn downcast<H, P>(entry: &'static (dyn Any + Send + Sync)) -> &'static DispatchTable<H, P>
where
    H: Dispatch<P>,
    P: Protocol,
{
    match entry.downcast_ref::<DispatchTable<H, P>>() {
        Some(table) => table,
        // The key is derived from the same TypeIds the entry was stored
        // under; a mismatch cannot be constructed.
        None => unreachable!("dispatch registry entry has wrong type"),
    }
}
