//! # Runtime
//!
//! Per-transport process state: the transport itself, the table mapping
//! handles to live proxies, and configuration for outgoing calls.
//!
//! ## Identity preservation
//!
//! A handle names exactly one remote object, so the runtime hands out at most
//! one live proxy per handle. The table holds weak entries; a proxy removes
//! its own entry when its last strong reference is dropped, unless the entry
//! has already been replaced by a newer proxy for the same handle.

use std::sync::Arc;
use std::sync::Weak;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;
use tracing::trace;

use crate::binder::Binder;
use crate::binder::BinderInner;
use crate::proxy::RemoteProxy;
use crate::status::Result;
use crate::status::StatusCode;
use crate::transport::RemoteHandle;
use crate::transport::Transport;

/// Timeout applied to outgoing remote transactions unless configured.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// The handle table and transport shared by every proxy it resolves.
#[derive(Clone)]
pub struct Runtime {
    pub(crate) inner: Arc<RuntimeInner>,
}

pub(crate) struct RuntimeInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) call_timeout: Duration,
    pub(crate) proxies: DashMap<RemoteHandle, Weak<BinderInner>>,
}

impl RuntimeInner {
    /// Drops the table entry for `handle` if it no longer names a live proxy.
    pub(crate) fn forget(&self, handle: RemoteHandle) {
        self.proxies.remove_if(&handle, |_, weak| weak.strong_count() == 0);
    }
}

impl Runtime {
    /// Creates a runtime over `transport` with default configuration.
    pub fn new(transport: impl Transport) -> Self {
        Self::from_parts(Arc::new(transport), DEFAULT_CALL_TIMEOUT)
    }

    pub fn builder(transport: impl Transport) -> RuntimeBuilder {
        RuntimeBuilder {
            transport: Arc::new(transport),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    fn from_parts(transport: Arc<dyn Transport>, call_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(RuntimeInner {
                transport,
                call_timeout,
                proxies: DashMap::new(),
            }),
        }
    }

    /// Resolves `handle` into a binder.
    ///
    /// Returns the existing proxy if one is alive for this handle, otherwise
    /// creates a new, unassociated one.
    pub fn from_handle(&self, handle: RemoteHandle) -> Binder {
        let (binder, created) = match self.inner.proxies.entry(handle) {
            Entry::Occupied(mut entry) => match entry.get().upgrade() {
                Some(inner) => (Binder { inner }, false),
                None => {
                    let binder = self.new_proxy(handle);
                    entry.insert(Arc::downgrade(&binder.inner));
                    (binder, true)
                }
            },
            Entry::Vacant(entry) => {
                let binder = self.new_proxy(handle);
                entry.insert(Arc::downgrade(&binder.inner));
                (binder, true)
            }
        };

        // The shard guard is gone; the transport may call back into the table.
        if created {
            self.inner.transport.acquire(handle);
            debug!(%handle, "created remote proxy");
        } else {
            trace!(%handle, "reusing live proxy");
        }
        binder
    }

    fn new_proxy(&self, handle: RemoteHandle) -> Binder {
        Binder::new_remote(RemoteProxy::new(handle, Arc::clone(&self.inner)))
    }

    /// Number of handles that currently have a live proxy.
    pub fn live_proxies(&self) -> usize {
        self.inner
            .proxies
            .iter()
            .filter(|entry| entry.value().strong_count() > 0)
            .count()
    }

    pub fn call_timeout(&self) -> Duration {
        self.inner.call_timeout
    }
}

/// Configures a `Runtime` before it starts resolving handles.
pub struct RuntimeBuilder {
    transport: Arc<dyn Transport>,
    call_timeout: Duration,
}

impl RuntimeBuilder {
    /// Upper bound on how long an outgoing remote transaction may take.
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Builds the runtime. A zero call timeout is rejected with `BadValue`.
    pub fn build(self) -> Result<Runtime> {
        if self.call_timeout.is_zero() {
            return Err(StatusCode::BadValue);
        }
        Ok(Runtime::from_parts(self.transport, self.call_timeout))
    }
}
