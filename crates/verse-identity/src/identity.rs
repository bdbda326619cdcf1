//! Identity tokens
//!
//! Provides [`Identity`], the process-unique key every original object is
//! cached under, and the [`Identified`] trait for types that carry one.

use std::fmt::{self, Display, Formatter};
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

/// Next identity to hand out. Starts at 1 so tokens fit a `NonZeroU64`.
static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// Stable, never-reused identity token
///
/// Two handles compare equal by identity only if they were cloned from the
/// same allocation. Value-equal objects created separately always receive
/// distinct identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(NonZeroU64);

impl Identity {
    /// Allocate a fresh identity
    ///
    /// # Panics
    /// Panics if the 64-bit identity space is exhausted.
    #[inline]
    #[must_use]
    pub fn fresh() -> Self {
        let raw = NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed);
        match NonZeroU64::new(raw) {
            Some(id) => Self(id),
            None => panic!("identity space exhausted"),
        }
    }

    /// Raw token value
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything that can be used as an identity-keyed cache key
///
/// Implemented by [`Obj`](crate::Obj) and [`AnyObj`](crate::AnyObj). Types
/// that already carry a stable unique id of their own may implement it
/// directly, as long as two distinct objects never report the same identity.
pub trait Identified {
    /// The identity this object is keyed under
    fn identity(&self) -> Identity;
}

impl Identified for Identity {
    #[inline]
    fn identity(&self) -> Identity {
        *self
    }
}
