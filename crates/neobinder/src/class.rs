//! # Class Descriptors
//!
//! A `ClassDescriptor` binds an interface name to the three callbacks that
//! give a local object its behavior:
//!
//! - `on_create` turns construction arguments into opaque user data,
//! - `on_destroy` receives that user data back when the object dies,
//! - `on_transact` answers user transactions.
//!
//! Descriptors are immutable and shared (`Arc`) by every object of the
//! interface. The interface name is the identity key for compatibility checks:
//! two descriptors with the same name are treated as the same interface.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::code::TransactionCode;
use crate::code::TransactionFlags;
use crate::local::LocalObject;
use crate::parcel::Parcel;
use crate::status::Result;
use crate::status::StatusCode;

/// Opaque per-object application state.
pub type UserData = Box<dyn Any + Send + Sync>;

/// Arguments handed to `on_create`.
pub type CreateArgs = Box<dyn Any + Send>;

pub type OnCreate = dyn Fn(CreateArgs) -> Option<UserData> + Send + Sync;
pub type OnDestroy = dyn Fn(Option<UserData>) + Send + Sync;
pub type OnTransact = dyn Fn(&LocalObject, TransactionCode, &Parcel, &mut Parcel, TransactionFlags) -> Result<()>
    + Send
    + Sync;

/// An immutable interface definition shared by all of its objects.
pub struct ClassDescriptor {
    interface_descriptor: String,
    pub(crate) on_create: Box<OnCreate>,
    pub(crate) on_destroy: Box<OnDestroy>,
    pub(crate) on_transact: Box<OnTransact>,
}

impl ClassDescriptor {
    /// Defines a new interface.
    ///
    /// Returns `BadValue` if `interface_descriptor` is empty. Uniqueness of the
    /// name is a caller convention and is not checked.
    pub fn define<C, D, T>(
        interface_descriptor: impl Into<String>,
        on_create: C,
        on_destroy: D,
        on_transact: T,
    ) -> Result<Arc<Self>>
    where
        C: Fn(CreateArgs) -> Option<UserData> + Send + Sync + 'static,
        D: Fn(Option<UserData>) + Send + Sync + 'static,
        T: Fn(&LocalObject, TransactionCode, &Parcel, &mut Parcel, TransactionFlags) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        let interface_descriptor = interface_descriptor.into();
        if interface_descriptor.is_empty() {
            return Err(StatusCode::BadValue);
        }

        tracing::debug!(interface = %interface_descriptor, "defined binder class");

        Ok(Arc::new(Self {
            interface_descriptor,
            on_create: Box::new(on_create),
            on_destroy: Box::new(on_destroy),
            on_transact: Box::new(on_transact),
        }))
    }

    /// The interface name objects of this class answer to.
    pub fn interface_descriptor(&self) -> &str {
        &self.interface_descriptor
    }

    /// Returns true if both descriptors name the same interface.
    pub fn same_interface(&self, other: &ClassDescriptor) -> bool {
        self.interface_descriptor == other.interface_descriptor
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("interface_descriptor", &self.interface_descriptor)
            .finish_non_exhaustive()
    }
}
