//! # Local Objects
//!
//! A `LocalObject` is the variant of a binder that lives in this process. It
//! owns the user data produced by its class's `on_create` and hands incoming
//! transactions to the class's `on_transact`.
//!
//! ## Invariants
//!
//! - Every `LocalObject` was built by `Binder::new_local`, so its user data
//!   came from its own class's `on_create`.
//! - Only user codes reach `on_transact`. Everything else is answered here or
//!   rejected with `UnknownTransaction`.
//! - `on_destroy` runs exactly once, when the object is dropped.
//!
//! Dispatch takes `&self` and touches no mutable state of its own, so the
//! transport may drive it from any number of threads at once. Handlers
//! synchronize their own user data.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tracing::trace;
use tracing::warn;

use crate::class::ClassDescriptor;
use crate::class::CreateArgs;
use crate::class::UserData;
use crate::code;
use crate::code::TransactionCode;
use crate::code::TransactionFlags;
use crate::parcel::Parcel;
use crate::status::Result;
use crate::status::StatusCode;

pub struct LocalObject {
    class: Arc<ClassDescriptor>,
    user_data: Option<UserData>,
}

impl LocalObject {
    pub(crate) fn new(class: Arc<ClassDescriptor>, args: CreateArgs) -> Self {
        let user_data = (class.on_create)(args);
        trace!(
            interface = %class.interface_descriptor(),
            has_user_data = user_data.is_some(),
            "created local object"
        );
        Self { class, user_data }
    }

    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.class
    }

    /// The interface name of this object's class.
    ///
    /// Needed by the transport to answer interface queries without calling
    /// into application code.
    pub fn interface_descriptor(&self) -> &str {
        self.class.interface_descriptor()
    }

    /// The opaque state produced by `on_create`, if any.
    pub fn user_data(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.user_data.as_deref()
    }

    /// The user data downcast to a concrete type.
    pub fn user_data_as<T: Any>(&self) -> Option<&T> {
        self.user_data()?.downcast_ref::<T>()
    }

    /// Gates and dispatches a user transaction.
    ///
    /// Codes outside the user window return `UnknownTransaction` and never
    /// reach the handler. Otherwise the handler's status is returned as is.
    pub fn on_transaction(
        &self,
        code: TransactionCode,
        data: &Parcel,
        reply: &mut Parcel,
        flags: TransactionFlags,
    ) -> Result<()> {
        if !code::is_user_code(code) {
            warn!(
                interface = %self.interface_descriptor(),
                code,
                "rejected transaction outside the user code range"
            );
            return Err(StatusCode::UnknownTransaction);
        }

        (self.class.on_transact)(self, code, data, reply, flags)
    }

    /// Entry point for transactions delivered by a transport.
    ///
    /// Ping and interface queries are answered here. All other codes go
    /// through `on_transaction`.
    pub fn deliver(
        &self,
        code: TransactionCode,
        data: &Parcel,
        reply: &mut Parcel,
        flags: TransactionFlags,
    ) -> Result<()> {
        match code {
            code::PING_TRANSACTION => Ok(()),
            code::INTERFACE_TRANSACTION => reply.write_str(self.interface_descriptor()),
            _ => self.on_transaction(code, data, reply, flags),
        }
    }
}

impl Drop for LocalObject {
    fn drop(&mut self) {
        trace!(interface = %self.interface_descriptor(), "destroying local object");
        (self.class.on_destroy)(self.user_data.take());
    }
}

impl fmt::Debug for LocalObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalObject")
            .field("interface", &self.interface_descriptor())
            .field("has_user_data", &self.user_data.is_some())
            .finish()
    }
}
