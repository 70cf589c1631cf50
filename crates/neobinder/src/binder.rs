//! # Binder Identity
//!
//! `Binder` is the one handle application code holds for "a thing you can
//! call", whether it lives in this process or another one. It is a cheap,
//! clonable, reference-counted pointer; the object is torn down synchronously
//! when the last strong reference is dropped.
//!
//! ## Variants
//!
//! The concrete kind is a closed set chosen at creation time:
//!
//! - `Local(LocalObject)` — created by `Binder::new_local`.
//! - `Remote(RemoteProxy)` — resolved by `Runtime::from_handle`.
//!
//! `is_remote` reads the variant; there is no separate flag to drift.
//!
//! ## Association
//!
//! A binder carries at most one associated `ClassDescriptor`, set once and
//! never replaced. Local objects are associated with their own class from the
//! start. Proxies begin unassociated; the first successful
//! `associate_class` fixes how the handle is interpreted, and later attempts
//! succeed only if they name the same interface.

use std::any::Any;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::Weak;

use tracing::warn;

use crate::class::ClassDescriptor;
use crate::code;
use crate::code::TransactionCode;
use crate::code::TransactionFlags;
use crate::local::LocalObject;
use crate::parcel::Parcel;
use crate::proxy::RemoteProxy;
use crate::status::Result;
use crate::status::StatusCode;

pub(crate) struct BinderInner {
    class: OnceLock<Arc<ClassDescriptor>>,
    kind: Kind,
}

enum Kind {
    Local(LocalObject),
    Remote(RemoteProxy),
}

/// A strong reference to a local object or a remote proxy.
#[derive(Clone)]
pub struct Binder {
    pub(crate) inner: Arc<BinderInner>,
}

impl Binder {
    /// Creates a local object of `class`.
    ///
    /// Runs `class.on_create(args)` to produce the object's user data. The
    /// returned binder holds the only reference.
    pub fn new_local<A: Any + Send>(class: &Arc<ClassDescriptor>, args: A) -> Self {
        let local = LocalObject::new(Arc::clone(class), Box::new(args));
        Self {
            inner: Arc::new(BinderInner {
                class: OnceLock::from(Arc::clone(class)),
                kind: Kind::Local(local),
            }),
        }
    }

    pub(crate) fn new_remote(proxy: RemoteProxy) -> Self {
        Self {
            inner: Arc::new(BinderInner {
                class: OnceLock::new(),
                kind: Kind::Remote(proxy),
            }),
        }
    }

    /// Associates this binder with `class`.
    ///
    /// Succeeds if the binder had no class yet (and binds it), or if the bound
    /// class has the same interface name as `class`. Returns false and leaves
    /// the binding untouched otherwise.
    pub fn associate_class(&self, class: &Arc<ClassDescriptor>) -> bool {
        let bound = self.inner.class.get_or_init(|| Arc::clone(class));
        if bound.same_interface(class) {
            return true;
        }

        warn!(
            bound = %bound.interface_descriptor(),
            requested = %class.interface_descriptor(),
            "refused to re-associate binder with a different interface"
        );
        false
    }

    /// Checks the remote interface name before associating.
    ///
    /// For an unassociated proxy the remote object is asked for its interface
    /// descriptor first; a mismatch returns `Ok(false)` without binding. In
    /// every other case this is `associate_class`.
    pub async fn associate_verified(&self, class: &Arc<ClassDescriptor>) -> Result<bool> {
        if self.is_remote() && self.associated_class().is_none() {
            let remote = self.interface_descriptor().await?;
            if remote != class.interface_descriptor() {
                warn!(
                    remote = %remote,
                    requested = %class.interface_descriptor(),
                    "remote object does not implement the requested interface"
                );
                return Ok(false);
            }
        }
        Ok(self.associate_class(class))
    }

    pub fn associated_class(&self) -> Option<&Arc<ClassDescriptor>> {
        self.inner.class.get()
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.inner.kind, Kind::Remote(_))
    }

    pub fn as_local(&self) -> Option<&LocalObject> {
        match &self.inner.kind {
            Kind::Local(local) => Some(local),
            Kind::Remote(_) => None,
        }
    }

    pub fn as_remote(&self) -> Option<&RemoteProxy> {
        match &self.inner.kind {
            Kind::Local(_) => None,
            Kind::Remote(proxy) => Some(proxy),
        }
    }

    /// Returns true unless the transport reports the remote object gone.
    pub fn is_alive(&self) -> bool {
        match &self.inner.kind {
            Kind::Local(_) => true,
            Kind::Remote(proxy) => proxy.is_alive(),
        }
    }

    /// Number of strong references currently held. Diagnostic only.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    pub fn downgrade(&self) -> WeakBinder {
        WeakBinder { inner: Arc::downgrade(&self.inner) }
    }

    /// Sends a transaction to this object.
    ///
    /// The binder must be associated with a class first, otherwise this
    /// returns `InvalidOperation`. Local objects are dispatched in place;
    /// proxies go through the transport. With `FLAG_ONEWAY` the reply is
    /// dropped and an empty parcel is returned.
    ///
    /// A one-way call on a proxy still waits for the transport to finish the
    /// call, bounded by the runtime's call timeout. Only the reply is
    /// discarded, so transport and handler failures are still reported.
    pub async fn transact(
        &self,
        code: TransactionCode,
        data: Parcel,
        flags: TransactionFlags,
    ) -> Result<Parcel> {
        if self.associated_class().is_none() {
            warn!(code, "transaction on a binder with no associated class");
            return Err(StatusCode::InvalidOperation);
        }
        self.transact_raw(code, data, flags).await
    }

    async fn transact_raw(
        &self,
        code: TransactionCode,
        data: Parcel,
        flags: TransactionFlags,
    ) -> Result<Parcel> {
        let reply = match &self.inner.kind {
            Kind::Local(local) => {
                let mut reply = Parcel::new();
                local.deliver(code, &data, &mut reply, flags)?;
                reply
            }
            Kind::Remote(proxy) => proxy.transact(code, data, flags).await?,
        };

        if code::is_oneway(flags) {
            return Ok(Parcel::new());
        }
        Ok(reply)
    }

    /// Checks that the object answers at all. Needs no associated class.
    pub async fn ping(&self) -> Result<()> {
        self.transact_raw(code::PING_TRANSACTION, Parcel::new(), 0).await.map(|_| ())
    }

    /// The interface name the object reports.
    ///
    /// Local objects answer from their class; proxies ask the remote object.
    pub async fn interface_descriptor(&self) -> Result<String> {
        if let Kind::Local(local) = &self.inner.kind {
            return Ok(local.interface_descriptor().to_owned());
        }

        let reply = self
            .transact_raw(code::INTERFACE_TRANSACTION, Parcel::new(), 0)
            .await?;
        let mut reader = reply.reader();
        reader.read_str().map(str::to_owned)
    }
}

impl PartialEq for Binder {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Binder {}

impl Hash for Binder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Binder");
        match &self.inner.kind {
            Kind::Local(local) => s.field("local", local),
            Kind::Remote(proxy) => s.field("remote", proxy),
        };
        s.field(
            "class",
            &self.associated_class().map(|c| c.interface_descriptor()),
        )
        .finish()
    }
}

/// A non-owning reference to a binder.
#[derive(Clone)]
pub struct WeakBinder {
    inner: Weak<BinderInner>,
}

impl WeakBinder {
    /// Returns a strong reference if the object is still alive.
    pub fn promote(&self) -> Option<Binder> {
        self.inner.upgrade().map(|inner| Binder { inner })
    }
}

impl fmt::Debug for WeakBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakBinder")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
