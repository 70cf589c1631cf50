//! # Transport Abstraction
//!
//! The narrow interface to whatever actually moves transactions between
//! processes.
//!
//! ## Philosophy
//!
//! - **Handle-Oriented**: A remote object is named by an opaque
//!   `RemoteHandle`. The transport owns what a handle means.
//! - **Request-Response**: Sending a transaction to a handle yields the
//!   reply parcel or an error. Thread pools, framing, and wire formats live
//!   behind this trait.
//! - **Counted**: Proxies tell the transport when they start and stop
//!   referencing a handle, so it can keep the remote object pinned.

use std::fmt;

use crate::code::TransactionCode;
use crate::code::TransactionFlags;
use crate::parcel::Parcel;
use crate::status::StatusCode;

/// Handle to an object owned by another process, scoped to one transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemoteHandle(pub u64);

impl fmt::Display for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

/// Errors that occur at the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The peer process is unreachable or the connection was dropped.
    ConnectionLost(String),
    /// The handle no longer names a live object.
    DeadObject,
    /// The transaction timed out before a reply was received.
    Timeout,
    /// The transport refused the payload size.
    PayloadTooLarge,
    /// Generic I/O error or internal transport failure.
    Io(String),
    /// The remote object answered with a failure status.
    Remote(StatusCode),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            Self::DeadObject => write!(f, "Remote object is dead"),
            Self::Timeout => write!(f, "Transaction timed out"),
            Self::PayloadTooLarge => write!(f, "Payload too large for transport"),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
            Self::Remote(status) => write!(f, "Remote failure: {}", status),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Remote(status) => Some(status),
            _ => None,
        }
    }
}

impl From<TransportError> for StatusCode {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::ConnectionLost(_) | TransportError::DeadObject => StatusCode::DeadObject,
            TransportError::Timeout => StatusCode::TimedOut,
            TransportError::PayloadTooLarge => StatusCode::FailedTransaction,
            TransportError::Io(_) => StatusCode::UnknownError,
            TransportError::Remote(status) => status,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// A mechanism for sending transactions to remote objects.
///
/// This trait is designed to be object-safe (`Arc<dyn Transport>`).
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a transaction to `handle` and waits for the reply.
    ///
    /// # invariants
    /// - Must return `Ok(reply)` when the remote object reports success.
    /// - Must return `Err(Remote(status))` when the remote object reports a
    ///   failure status, carrying that status unchanged.
    /// - Should not interpret the payload content.
    async fn transact(
        &self,
        handle: RemoteHandle,
        code: TransactionCode,
        data: Parcel,
        flags: TransactionFlags,
    ) -> Result<Parcel>;

    /// Called when a proxy for `handle` is created.
    ///
    /// Runs after the proxy is registered and with no table lock held, so an
    /// implementation may call back into the `Runtime`.
    fn acquire(&self, _handle: RemoteHandle) {}

    /// Called when the last reference to a proxy for `handle` is released.
    fn release(&self, _handle: RemoteHandle) {}

    /// Returns true if the object behind `handle` is still reachable.
    fn is_alive(&self, handle: RemoteHandle) -> bool;
}
