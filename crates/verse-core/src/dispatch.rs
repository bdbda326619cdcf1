//! Type-routed creation rules
//!
//! Provides [`Dispatch`], a creation rule that picks a constructor by the
//! concrete type of the original, with an explicit fallback for everything
//! else.
//!
//! # Example
//!
//! ```rust
//! use verse_core::{CreationRule, Dispatch};
//! use verse_identity::AnyObj;
//!
//! let rule = Dispatch::new()
//!     .on::<i64>(|_, n| Ok(format!("number {n}")))
//!     .on::<String>(|_, s| Ok(format!("text {s}")))
//!     .otherwise(|_| Ok(String::from("something else")));
//!
//! assert_eq!(rule.produce(&AnyObj::new(3_i64)).unwrap(), "number 3");
//! assert_eq!(rule.produce(&AnyObj::new(())).unwrap(), "something else");
//! ```

use crate::error::{VerseError, VerseResult};
use crate::rule::CreationRule;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use verse_identity::{AnyObj, Object};

type Constructor<P> = Box<dyn Fn(&AnyObj) -> VerseResult<P> + Send + Sync>;

struct Route<P> {
    type_name: &'static str,
    construct: Constructor<P>,
}

/// Creation rule routing on the original's concrete type
///
/// Routes are exact-type matches. An original with no route goes to the
/// fallback; with no fallback, [`produce`](CreationRule::produce) fails with
/// [`VerseError::Unimplemented`].
pub struct Dispatch<P> {
    routes: HashMap<TypeId, Route<P>>,
    fallback: Option<Constructor<P>>,
}

impl<P: 'static> Dispatch<P> {
    /// Create dispatch table with no routes and no fallback
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            fallback: None,
        }
    }

    /// Route originals of type `T` to `construct`
    ///
    /// Replaces any earlier route for `T`.
    #[must_use]
    pub fn on<T: Object>(
        mut self,
        construct: impl Fn(&AnyObj, &T) -> VerseResult<P> + Send + Sync + 'static,
    ) -> Self {
        let construct: Constructor<P> = Box::new(move |original: &AnyObj| {
            match original.downcast_ref::<T>() {
                Some(value) => construct(original, value),
                None => Err(VerseError::unimplemented_for(original)),
            }
        });
        self.routes.insert(
            TypeId::of::<T>(),
            Route {
                type_name: type_name::<T>(),
                construct,
            },
        );
        self
    }

    /// Send every original without a route to `construct`
    #[must_use]
    pub fn otherwise(
        mut self,
        construct: impl Fn(&AnyObj) -> VerseResult<P> + Send + Sync + 'static,
    ) -> Self {
        self.fallback = Some(Box::new(construct));
        self
    }

    /// Check if originals of type `T` have their own route
    #[inline]
    #[must_use]
    pub fn handles<T: Object>(&self) -> bool {
        self.routes.contains_key(&TypeId::of::<T>())
    }

    /// Check if a fallback is set
    #[inline]
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Names of the routed types
    #[must_use]
    pub fn routed_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.routes.values().map(|route| route.type_name).collect();
        names.sort_unstable();
        names
    }
}

impl<P: 'static> Default for Dispatch<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone + Send + Sync + 'static> CreationRule for Dispatch<P> {
    type Parallel = P;

    fn produce(&self, original: &AnyObj) -> VerseResult<P> {
        if let Some(route) = self.routes.get(&original.value_type_id()) {
            return (route.construct)(original);
        }

        match &self.fallback {
            Some(construct) => construct(original),
            None => Err(VerseError::unimplemented_for(original)),
        }
    }
}

impl<P> Debug for Dispatch<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<_> = self.routes.values().map(|route| route.type_name).collect();
        routes.sort_unstable();
        f.debug_struct("Dispatch")
            .field("routes", &routes)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
