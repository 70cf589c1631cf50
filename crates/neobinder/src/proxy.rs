//! # Remote Proxies
//!
//! A `RemoteProxy` is the variant of a binder that stands for an object in
//! another process. It wraps exactly one `RemoteHandle` and forwards
//! transactions to the runtime's transport.
//!
//! Proxies are only created through `Runtime::from_handle`, which keeps one
//! live proxy per handle. Dropping the last reference releases the handle on
//! the transport and clears the runtime's table entry.

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use crate::code::TransactionCode;
use crate::code::TransactionFlags;
use crate::parcel::Parcel;
use crate::runtime::RuntimeInner;
use crate::status::Result;
use crate::status::StatusCode;
use crate::transport::RemoteHandle;

pub struct RemoteProxy {
    handle: RemoteHandle,
    runtime: Arc<RuntimeInner>,
}

impl RemoteProxy {
    /// The caller acquires `handle` on the transport once the proxy is
    /// registered; `Drop` releases it.
    pub(crate) fn new(handle: RemoteHandle, runtime: Arc<RuntimeInner>) -> Self {
        Self { handle, runtime }
    }

    /// The transport handle this proxy wraps.
    pub fn handle(&self) -> RemoteHandle {
        self.handle
    }

    pub fn is_alive(&self) -> bool {
        self.runtime.transport.is_alive(self.handle)
    }

    /// Forwards a transaction to the transport, bounded by the runtime's call
    /// timeout.
    pub(crate) async fn transact(
        &self,
        code: TransactionCode,
        data: Parcel,
        flags: TransactionFlags,
    ) -> Result<Parcel> {
        let call = self.runtime.transport.transact(self.handle, code, data, flags);

        match tokio::time::timeout(self.runtime.call_timeout, call).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                debug!(handle = %self.handle, code, error = %e, "remote transaction failed");
                Err(StatusCode::from(e))
            }
            Err(_) => {
                warn!(handle = %self.handle, code, "remote transaction timed out");
                Err(StatusCode::TimedOut)
            }
        }
    }
}

impl Drop for RemoteProxy {
    fn drop(&mut self) {
        self.runtime.forget(self.handle);
        self.runtime.transport.release(self.handle);
        debug!(handle = %self.handle, "released remote proxy");
    }
}

impl fmt::Debug for RemoteProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteProxy").field("handle", &self.handle).finish()
    }
}
