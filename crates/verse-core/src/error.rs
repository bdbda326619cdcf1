//! Error types for verses
//!
//! Provides error handling for:
//! - Missing creation rules (no route for an original's type)
//! - Cyclic creation (re-entrant lookup of the same original)
//! - Rules that refuse an original

use verse_identity::{AnyObj, CacheError, Identified, Identity};

/// Errors while producing or looking up a parallel object
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerseError {
    /// The verse has no creation rule for this original
    #[error("no creation rule for original of type `{type_name}`")]
    Unimplemented {
        /// Concrete type of the original
        type_name: &'static str,
    },

    /// The original's parallel object was requested while being created
    #[error("cyclic creation: parallel object for {original} requested while it is being created")]
    CyclicCreation {
        /// Original whose creation re-entered itself
        original: Identity,
    },

    /// The creation rule refused the original
    #[error("original {original} rejected: {reason}")]
    Rejected {
        /// Refused original
        original: Identity,
        /// Why the rule refused it
        reason: String,
    },
}

impl VerseError {
    /// Create unimplemented error naming the original's type
    #[inline]
    #[must_use]
    pub fn unimplemented_for(original: &AnyObj) -> Self {
        Self::Unimplemented {
            type_name: original.value_type_name(),
        }
    }

    /// Create rejection error for an original
    #[inline]
    pub fn rejected(original: &impl Identified, reason: impl Into<String>) -> Self {
        Self::Rejected {
            original: original.identity(),
            reason: reason.into(),
        }
    }
}

impl From<CacheError> for VerseError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::CyclicCreation { key } => Self::CyclicCreation { original: key },
        }
    }
}

/// Result type alias for verse operations
pub type VerseResult<T> = Result<T, VerseError>;
