//! # neobinder
//!
//! Object identity and transaction dispatch for binder-style IPC.
//!
//! A process exposes a callable object by defining a `ClassDescriptor` and
//! creating a local `Binder` of that class. Other processes reach it through
//! a transport handle, which a `Runtime` resolves into a proxy `Binder`. Both
//! kinds answer the same API, so callers do not need to know which side of
//! the boundary an object lives on.
//!
//! Incoming transactions are gated by code: only codes in
//! `[FIRST_CALL_TRANSACTION, LAST_CALL_TRANSACTION]` reach application
//! handlers.

pub mod binder;
pub mod class;
pub mod code;
pub mod local;
pub mod loopback;
pub mod parcel;
pub mod proxy;
pub mod runtime;
pub mod status;
pub mod transport;

pub use binder::{Binder, WeakBinder};
pub use class::{ClassDescriptor, CreateArgs, UserData};
pub use code::{
    FIRST_CALL_TRANSACTION, FLAG_ONEWAY, INTERFACE_TRANSACTION, LAST_CALL_TRANSACTION,
    PING_TRANSACTION, TransactionCode, TransactionFlags, is_user_code,
};
pub use local::LocalObject;
pub use loopback::LoopbackTransport;
pub use parcel::{Parcel, ParcelReader};
pub use proxy::RemoteProxy;
pub use runtime::{Runtime, RuntimeBuilder};
pub use status::{Result, StatusCode};
pub use transport::{RemoteHandle, Transport, TransportError};
