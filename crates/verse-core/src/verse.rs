//! Verses
//!
//! Provides [`Verse`], a creation rule together with the identity-keyed cache
//! of every parallel object that rule has produced.
//!
//! # Lifecycle
//!
//! An association `(verse, original, parallel)` appears the first time the
//! original is looked up and never changes afterwards. It goes away when the
//! verse is dropped, or when [`Verse::prune`] is called after the original has
//! been dropped everywhere else.
//!
//! Parallel objects are held strongly. Originals are held only through a weak
//! handle, but a parallel object that keeps its original (as derived handles
//! do) keeps it alive for as long as the verse lives.
//!
//! A derived parallel object reports the original it was produced from. When
//! that original is itself a parallel object of another verse, it is the one
//! reported; the root of the chain is one `self_reference` per hop away.

use crate::config::VerseConfig;
use crate::error::VerseResult;
use crate::rule::{CreationRule, FnRule};
use std::fmt::{self, Debug, Formatter};
use verse_identity::{AnyObj, CacheStats, Handle, Identified, Identity, IdentityCache, WeakObj};

/// One cached `(original, parallel)` pair
#[derive(Clone)]
struct Association<P> {
    original: WeakObj,
    parallel: P,
}

/// A namespace producing at most one parallel object per original
///
/// # Example
/// ```
/// use verse_core::{Bridge, Verse, VerseResult};
/// use verse_identity::{AnyObj, Obj};
///
/// let shouting = Verse::from_fn(|original: &AnyObj| -> VerseResult<Obj<String>> {
///     let text = format!("{:?}", original.value()).to_uppercase();
///     Ok(Obj::derived(text, original))
/// });
///
/// let word = Obj::new("hello");
/// let loud = word.bridge_to(&shouting).unwrap();
///
/// assert_eq!(loud.as_str(), "\"HELLO\"");
/// assert_eq!(word.bridge_to(&shouting).unwrap(), loud);
/// ```
pub struct Verse<R: CreationRule> {
    id: Identity,
    name: String,
    rule: R,
    associations: IdentityCache<Association<R::Parallel>>,
}

impl<R: CreationRule> Verse<R> {
    /// Create verse with default configuration
    #[inline]
    #[must_use]
    pub fn new(rule: R) -> Self {
        Self::with_config(rule, VerseConfig::default())
    }

    /// Create verse with explicit configuration
    #[must_use]
    pub fn with_config(rule: R, config: VerseConfig) -> Self {
        let id = Identity::fresh();
        let name = config.name.unwrap_or_else(|| format!("verse{id}"));
        tracing::debug!(verse = %name, %id, "verse created");

        Self {
            id,
            name,
            rule,
            associations: IdentityCache::with_capacity(config.initial_capacity),
        }
    }

    /// Get the parallel object for `original`, producing it on first access
    ///
    /// Idempotent: every call for the same original returns the same parallel
    /// object, and the rule runs once.
    ///
    /// # Errors
    /// - [`VerseError::CyclicCreation`](crate::VerseError::CyclicCreation) if
    ///   called for `original` from within its own creation
    /// - Any error from the creation rule; nothing is cached in that case
    pub fn lookup_or_create(&self, original: &(impl Handle + ?Sized)) -> VerseResult<R::Parallel> {
        let original = original.to_any();

        let association = self.associations.get_or_try_insert_with(&original, || {
            match self.rule.produce(&original) {
                Ok(parallel) => {
                    tracing::debug!(
                        verse = %self.name,
                        original = %original.identity(),
                        original_type = original.value_type_name(),
                        "parallel object created"
                    );
                    Ok(Association {
                        original: original.downgrade(),
                        parallel,
                    })
                }
                Err(err) => {
                    tracing::warn!(
                        verse = %self.name,
                        original = %original.identity(),
                        error = %err,
                        "creation rule failed"
                    );
                    Err(err)
                }
            }
        })?;

        Ok(association.parallel)
    }

    /// Get the parallel object for `original` if it was already produced
    #[inline]
    #[must_use]
    pub fn get(&self, original: &impl Identified) -> Option<R::Parallel> {
        self.associations.get(original).map(|association| association.parallel)
    }

    /// Check if a parallel object exists for `original`
    #[inline]
    #[must_use]
    pub fn contains(&self, original: &impl Identified) -> bool {
        self.associations.contains(original)
    }

    /// Drop associations whose original has no strong handle left
    ///
    /// Never called implicitly. Returns the number of associations removed.
    pub fn prune(&self) -> usize {
        let removed = self
            .associations
            .retain(|_, association| association.original.is_alive());
        tracing::debug!(verse = %self.name, removed, "pruned associations");
        removed
    }

    /// Verse identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> Identity {
        self.id
    }

    /// Verse name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The creation rule
    #[inline]
    #[must_use]
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Number of associations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.associations.len()
    }

    /// Check if no association exists yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }

    /// Association cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.associations.stats()
    }
}

impl<F, P> Verse<FnRule<F, P>>
where
    F: Fn(&AnyObj) -> VerseResult<P> + Send + Sync,
    P: Clone + Send + Sync,
{
    /// Create verse whose creation rule is a closure
    #[inline]
    #[must_use]
    pub fn from_fn(f: F) -> Self {
        Self::new(FnRule::new(f))
    }
}

impl<R: CreationRule + Default> Default for Verse<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: CreationRule> Identified for Verse<R> {
    #[inline]
    fn identity(&self) -> Identity {
        self.id
    }
}

impl<R: CreationRule> Debug for Verse<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verse")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
