//! # Loopback Transport
//!
//! An in-process `Transport` that hosts local objects behind numeric handles.
//! Transactions sent to a handle are delivered straight to the hosted object's
//! `LocalObject::deliver`, the same way a real transport would deliver them
//! after crossing a process boundary.
//!
//! Used by the test suites and the demo binary. It also counts proxy
//! acquire/release calls per handle and can simulate remote death.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use tracing::debug;

use crate::binder::Binder;
use crate::code::TransactionCode;
use crate::code::TransactionFlags;
use crate::parcel::Parcel;
use crate::status::STATUS_OK;
use crate::status::StatusCode;
use crate::transport;
use crate::transport::RemoteHandle;
use crate::transport::Transport;
use crate::transport::TransportError;

/// Acquire/release totals observed for one handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandleRefs {
    pub acquired: u64,
    pub released: u64,
}

impl HandleRefs {
    /// Proxies currently holding the handle.
    pub fn outstanding(&self) -> u64 {
        self.acquired.saturating_sub(self.released)
    }
}

/// Cheaply clonable; clones share the same hosted objects.
#[derive(Clone, Default)]
pub struct LoopbackTransport {
    inner: Arc<LoopbackInner>,
}

#[derive(Default)]
struct LoopbackInner {
    hosted: DashMap<RemoteHandle, Binder>,
    // Object address -> handle, so one object never gets two handles.
    published: DashMap<usize, RemoteHandle>,
    refs: DashMap<RemoteHandle, HandleRefs>,
    next_handle: AtomicU64,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hosts a local object and returns the handle peers use to reach it.
    ///
    /// Publishing an object that is already hosted returns its existing
    /// handle. The transport keeps a strong reference until `kill` is called.
    /// Proxies cannot be published.
    pub fn publish(&self, binder: &Binder) -> transport::Result<RemoteHandle> {
        let Some(local) = binder.as_local() else {
            return Err(TransportError::Io("only local objects can be published".into()));
        };

        let key = Arc::as_ptr(&binder.inner) as usize;
        let handle = *self.inner.published.entry(key).or_insert_with(|| {
            let handle = RemoteHandle(self.inner.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
            debug!(%handle, interface = %local.interface_descriptor(), "published local object");
            self.inner.hosted.insert(handle, binder.clone());
            handle
        });
        Ok(handle)
    }

    /// Simulates death of the object behind `handle`.
    ///
    /// Drops the transport's reference; later transactions fail with
    /// `DeadObject`. Returns false if the handle was not hosted.
    pub fn kill(&self, handle: RemoteHandle) -> bool {
        let Some((_, binder)) = self.inner.hosted.remove(&handle) else {
            debug!(%handle, "kill of a handle that is not hosted");
            return false;
        };
        self.inner.published.remove(&(Arc::as_ptr(&binder.inner) as usize));
        debug!(%handle, "killed hosted object");
        // Dropping `binder` here may run the object's destroy callback.
        true
    }

    pub fn refs(&self, handle: RemoteHandle) -> HandleRefs {
        self.inner.refs.get(&handle).map(|r| *r).unwrap_or_default()
    }

    fn hosted(&self, handle: RemoteHandle) -> Option<Binder> {
        // Clone out so no map guard is held while the handler runs.
        self.inner.hosted.get(&handle).map(|entry| entry.value().clone())
    }
}

#[async_trait::async_trait]
impl Transport for LoopbackTransport {
    async fn transact(
        &self,
        handle: RemoteHandle,
        code: TransactionCode,
        data: Parcel,
        flags: TransactionFlags,
    ) -> transport::Result<Parcel> {
        let binder = self.hosted(handle).ok_or(TransportError::DeadObject)?;
        let local = binder
            .as_local()
            .ok_or_else(|| TransportError::Io(format!("{handle} does not host a local object")))?;

        let mut reply = Parcel::new();
        let raw = match local.deliver(code, &data, &mut reply, flags) {
            Ok(()) => STATUS_OK,
            Err(status) => status.to_raw(),
        };

        // The status crosses the boundary as a plain i32, as it would on a wire.
        StatusCode::from_raw(raw).map_err(TransportError::Remote)?;
        Ok(reply)
    }

    fn acquire(&self, handle: RemoteHandle) {
        self.inner.refs.entry(handle).or_default().acquired += 1;
    }

    fn release(&self, handle: RemoteHandle) {
        self.inner.refs.entry(handle).or_default().released += 1;
    }

    fn is_alive(&self, handle: RemoteHandle) -> bool {
        self.inner.hosted.contains_key(&handle)
    }
}
