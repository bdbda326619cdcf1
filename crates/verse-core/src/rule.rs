//! Creation rules
//!
//! A [`CreationRule`] is what makes one verse different from another: the
//! function that turns an original object into its parallel object.

use crate::error::VerseResult;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;
use verse_identity::AnyObj;

/// The creation rule of a verse
///
/// `produce` has no default; every verse supplies its own. A rule that cannot
/// handle an original should fail with
/// [`VerseError::Unimplemented`](crate::VerseError::Unimplemented) rather than
/// hand the original back unchanged.
///
/// Rules are free to look up *other* originals in the same verse while
/// producing. Looking up the original currently being produced fails with
/// [`VerseError::CyclicCreation`](crate::VerseError::CyclicCreation).
pub trait CreationRule: Send + Sync {
    /// Parallel objects produced by this rule
    type Parallel: Clone + Send + Sync;

    /// Produce the parallel object for `original`
    ///
    /// Called at most once per original for the lifetime of the verse, unless
    /// a previous call failed.
    ///
    /// # Errors
    /// Returns an error if this rule cannot or will not produce a parallel
    /// object for `original`.
    fn produce(&self, original: &AnyObj) -> VerseResult<Self::Parallel>;
}

impl<R: CreationRule + ?Sized> CreationRule for Arc<R> {
    type Parallel = R::Parallel;

    #[inline]
    fn produce(&self, original: &AnyObj) -> VerseResult<Self::Parallel> {
        (**self).produce(original)
    }
}

impl<R: CreationRule + ?Sized> CreationRule for Box<R> {
    type Parallel = R::Parallel;

    #[inline]
    fn produce(&self, original: &AnyObj) -> VerseResult<Self::Parallel> {
        (**self).produce(original)
    }
}

/// Creation rule backed by a closure
pub struct FnRule<F, P> {
    f: F,
    _parallel: PhantomData<fn() -> P>,
}

impl<F, P> FnRule<F, P>
where
    F: Fn(&AnyObj) -> VerseResult<P>,
{
    /// Wrap a closure as a creation rule
    #[inline]
    #[must_use]
    pub fn new(f: F) -> Self {
        Self {
            f,
            _parallel: PhantomData,
        }
    }
}

impl<F, P> CreationRule for FnRule<F, P>
where
    F: Fn(&AnyObj) -> VerseResult<P> + Send + Sync,
    P: Clone + Send + Sync,
{
    type Parallel = P;

    #[inline]
    fn produce(&self, original: &AnyObj) -> VerseResult<P> {
        (self.f)(original)
    }
}

impl<F, P> Debug for FnRule<F, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("parallel", &std::any::type_name::<P>())
            .finish_non_exhaustive()
    }
}
