//! Error types for identity-keyed caching

use crate::identity::Identity;

/// Errors during cache operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The key's factory is already running on this thread
    #[error("cyclic creation: value for {key} requested while it is being created")]
    CyclicCreation {
        /// Key whose creation re-entered itself
        key: Identity,
    },
}

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_creation_display() {
        let key = Identity::fresh();
        let err = CacheError::CyclicCreation { key };
        assert!(err.to_string().starts_with("cyclic creation"));
        assert!(err.to_string().contains(&key.to_string()));
    }
}
