//! Deferred sub-dissection dispatch
//!
//! Some messages carry, nested inside their body, a payload belonging to
//! a different protocol that is discovered before the enclosing
//! message's own summary has been finalized. Invoking that protocol's
//! handler immediately would corrupt in-progress summary text and risks
//! re-entrant mutation of per-message state, so payloads are queued and
//! flushed, in insertion order, once the enclosing decode completes.
//!
//! The queue is scoped to exactly one top-level message: `flush`
//! consumes it, so it can never be drained twice or reused.

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::error::{RasError, Result};

/// Opaque reference to the point in the caller's output a dissected
/// payload should attach to; passed through untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachPoint(pub u64);

/// Handler for a nested protocol payload
pub trait SubDissector {
    /// Handler identifier (e.g. "h245", "q931")
    fn name(&self) -> &'static str;

    /// Dissect one queued payload
    fn dissect(&mut self, payload: &[u8], attach: Option<AttachPoint>);
}

/// Copyable token identifying a registered sub-dissector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DissectorHandle(usize);

/// Registry of sub-dissectors
pub struct DissectorRegistry {
    dissectors: Vec<Box<dyn SubDissector>>,
    by_name: HashMap<&'static str, DissectorHandle>,
}

impl DissectorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            dissectors: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a dissector and hand back its handle
    pub fn register(&mut self, dissector: Box<dyn SubDissector>) -> Result<DissectorHandle> {
        let name = dissector.name();
        if self.by_name.contains_key(name) {
            return Err(RasError::DuplicateDissector(name));
        }

        let handle = DissectorHandle(self.dissectors.len());
        self.dissectors.push(dissector);
        self.by_name.insert(name, handle);
        Ok(handle)
    }

    /// Look up a handle by name
    pub fn lookup(&self, name: &str) -> Option<DissectorHandle> {
        self.by_name.get(name).copied()
    }

    /// Number of registered dissectors
    pub fn len(&self) -> usize {
        self.dissectors.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.dissectors.is_empty()
    }

    fn get_mut(&mut self, handle: DissectorHandle) -> Option<&mut Box<dyn SubDissector>> {
        self.dissectors.get_mut(handle.0)
    }
}

impl Default for DissectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// One queued nested payload
struct PendingDissection {
    payload: Vec<u8>,
    preferred: Option<DissectorHandle>,
    attach: Option<AttachPoint>,
}

/// Per-message FIFO of nested payloads awaiting dispatch
#[derive(Default)]
pub struct DispatchQueue {
    items: VecDeque<PendingDissection>,
}

impl DispatchQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a payload for dispatch after the enclosing decode finishes;
    /// never dispatches synchronously
    pub fn enqueue(
        &mut self,
        payload: Vec<u8>,
        preferred: Option<DissectorHandle>,
        attach: Option<AttachPoint>,
    ) {
        self.items.push_back(PendingDissection {
            payload,
            preferred,
            attach,
        });
    }

    /// Number of queued payloads
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dispatch all queued payloads in insertion order
    ///
    /// Each non-empty payload goes to its preferred handler if set, else
    /// `default`, else `fallback`. Consumes the queue; returns the
    /// number of payloads dispatched.
    pub fn flush(
        self,
        registry: &mut DissectorRegistry,
        default: Option<DissectorHandle>,
        fallback: DissectorHandle,
    ) -> usize {
        let mut dispatched = 0;

        for item in self.items {
            if item.payload.is_empty() {
                continue;
            }

            let handle = item.preferred.or(default).unwrap_or(fallback);
            if let Some(dissector) = registry.get_mut(handle) {
                trace!(
                    "dispatching {} byte payload to {}",
                    item.payload.len(),
                    dissector.name()
                );
                dissector.dissect(&item.payload, item.attach);
                dispatched += 1;
            }
        }

        dispatched
    }
}
