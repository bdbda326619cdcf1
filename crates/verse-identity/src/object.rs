//! Identity-bearing object handles
//!
//! Provides [`Obj`], a shared handle that assigns a fresh [`Identity`] to the
//! value it wraps, its type-erased form [`AnyObj`], and the non-owning
//! [`WeakObj`] that caches keep instead of a strong reference.
//!
//! Equality and hashing on handles are by identity only: two handles around
//! value-equal data created separately are never equal.

use crate::identity::{Identified, Identity};
use std::any::{Any, TypeId};
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, Weak};

/// Values that can stand as original or parallel objects
///
/// Blanket-implemented for every `'static` type that is `Debug + Send + Sync`.
pub trait Object: Any + Debug + Send + Sync {
    /// Upcast for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete type, for diagnostics
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Debug + Send + Sync> Object for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Shared allocation behind every handle
struct Inner<T: ?Sized> {
    id: Identity,
    /// Object this one was derived from, if any
    origin: Option<AnyObj>,
    value: T,
}

/// Handle capabilities shared by typed and erased handles
pub trait Handle: Identified {
    /// Type-erased handle to the same object
    fn to_any(&self) -> AnyObj;

    /// Original this object was derived from, `None` for plain originals
    fn origin(&self) -> Option<&AnyObj>;

    /// The original object this handle stands in for
    ///
    /// Plain objects report themselves. Derived (parallel) objects report the
    /// object they were built from, one step back. Reaching the root of a
    /// longer chain takes one `self_reference` per hop.
    fn self_reference(&self) -> AnyObj {
        match self.origin() {
            Some(origin) => origin.clone(),
            None => self.to_any(),
        }
    }
}

/// Typed, identity-bearing shared handle
///
/// # Example
/// ```
/// use verse_identity::{Identified, Obj};
///
/// let a = Obj::new(10_i64);
/// let b = Obj::new(10_i64);
///
/// assert_eq!(*a, *b);      // same value
/// assert_ne!(a, b);        // different identity
/// assert_eq!(a, a.clone()); // clones share identity
/// assert_eq!(a.identity(), a.clone().identity());
/// ```
pub struct Obj<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Object> Obj<T> {
    /// Wrap a value as a new original object with a fresh identity
    #[inline]
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: Identity::fresh(),
                origin: None,
                value,
            }),
        }
    }

    /// Wrap a value as a parallel object derived from `from`
    ///
    /// The new handle gets its own identity; its
    /// [`self_reference`](Handle::self_reference) reports `from` itself, even
    /// when `from` is a parallel object of its own.
    #[inline]
    #[must_use]
    pub fn derived(value: T, from: &impl Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: Identity::fresh(),
                origin: Some(from.to_any()),
                value,
            }),
        }
    }

    /// Borrow the wrapped value
    #[inline]
    #[must_use]
    pub fn get(&self) -> &T {
        &self.inner.value
    }

    /// Type-erased handle to the same object
    #[must_use]
    pub fn erase(&self) -> AnyObj {
        let inner: Arc<Inner<dyn Object>> = self.inner.clone();
        AnyObj { inner }
    }

    /// Non-owning handle to the same object
    #[inline]
    #[must_use]
    pub fn downgrade(&self) -> WeakObj {
        self.erase().downgrade()
    }

    /// Number of strong handles to this object
    #[inline]
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T> Clone for Obj<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Identified for Obj<T> {
    #[inline]
    fn identity(&self) -> Identity {
        self.inner.id
    }
}

impl<T: Object> Handle for Obj<T> {
    #[inline]
    fn to_any(&self) -> AnyObj {
        self.erase()
    }

    #[inline]
    fn origin(&self) -> Option<&AnyObj> {
        self.inner.origin.as_ref()
    }
}

impl<T> Deref for Obj<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.inner.value
    }
}

impl<T> PartialEq for Obj<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl<T> Eq for Obj<T> {}

impl<T> Hash for Obj<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl<T> PartialEq<AnyObj> for Obj<T> {
    fn eq(&self, other: &AnyObj) -> bool {
        self.inner.id == other.inner.id
    }
}

impl<T: Debug> Debug for Obj<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Obj")
            .field("id", &self.inner.id)
            .field("origin", &self.inner.origin.as_ref().map(AnyObj::identity))
            .field("value", &self.inner.value)
            .finish()
    }
}

/// Type-erased, identity-bearing shared handle
///
/// This is the form originals take when they reach a verse's creation rule.
/// Use [`downcast_ref`](Self::downcast_ref) or [`is`](Self::is) to branch on
/// the concrete type.
#[derive(Clone)]
pub struct AnyObj {
    inner: Arc<Inner<dyn Object>>,
}

impl AnyObj {
    /// Wrap a value as a new, already erased original object
    #[inline]
    #[must_use]
    pub fn new<T: Object>(value: T) -> Self {
        Obj::new(value).erase()
    }

    /// Borrow the wrapped value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &dyn Object {
        &self.inner.value
    }

    /// Check the concrete type of the wrapped value
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.value.as_any().is::<T>()
    }

    /// Borrow the wrapped value as `T`, if that is its concrete type
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.value.as_any().downcast_ref::<T>()
    }

    /// `TypeId` of the wrapped value
    #[inline]
    #[must_use]
    pub fn value_type_id(&self) -> TypeId {
        self.inner.value.as_any().type_id()
    }

    /// Type name of the wrapped value
    #[inline]
    #[must_use]
    pub fn value_type_name(&self) -> &'static str {
        self.inner.value.type_name()
    }

    /// Non-owning handle to the same object
    #[must_use]
    pub fn downgrade(&self) -> WeakObj {
        WeakObj {
            id: self.inner.id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Number of strong handles to this object
    #[inline]
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl Identified for AnyObj {
    #[inline]
    fn identity(&self) -> Identity {
        self.inner.id
    }
}

impl Handle for AnyObj {
    #[inline]
    fn to_any(&self) -> AnyObj {
        self.clone()
    }

    #[inline]
    fn origin(&self) -> Option<&AnyObj> {
        self.inner.origin.as_ref()
    }
}

impl<T: Object> From<Obj<T>> for AnyObj {
    fn from(obj: Obj<T>) -> Self {
        let inner: Arc<Inner<dyn Object>> = obj.inner;
        Self { inner }
    }
}

impl PartialEq for AnyObj {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for AnyObj {}

impl Hash for AnyObj {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl<T> PartialEq<Obj<T>> for AnyObj {
    fn eq(&self, other: &Obj<T>) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Debug for AnyObj {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyObj")
            .field("id", &self.inner.id)
            .field("origin", &self.inner.origin.as_ref().map(AnyObj::identity))
            .field("value", &&self.inner.value)
            .finish()
    }
}

/// Non-owning handle to an object
///
/// Keeps the identity without keeping the object alive.
#[derive(Clone)]
pub struct WeakObj {
    id: Identity,
    inner: Weak<Inner<dyn Object>>,
}

impl WeakObj {
    /// Recover a strong handle if the object is still alive
    #[inline]
    #[must_use]
    pub fn upgrade(&self) -> Option<AnyObj> {
        self.inner.upgrade().map(|inner| AnyObj { inner })
    }

    /// Whether any strong handle to the object remains
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl Identified for WeakObj {
    #[inline]
    fn identity(&self) -> Identity {
        self.id
    }
}

impl Debug for WeakObj {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakObj")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}
