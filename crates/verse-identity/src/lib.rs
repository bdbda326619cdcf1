//! Verse Identity Layer
//!
//! Identity tokens, identity-bearing object handles and the identity-keyed
//! lazy cache that verses are built on.
//!
//! # Overview
//!
//! - **Identity**: process-unique, never-reused key for an object
//! - **Obj / AnyObj**: shared handles compared by identity, never by value
//! - **WeakObj**: non-owning handle used to track whether an original lives
//! - **IdentityCache**: at-most-once lazy creation per identity
//!
//! # Example
//!
//! ```rust
//! use verse_identity::{IdentityCache, Obj};
//!
//! let cache = IdentityCache::new();
//! let a = Obj::new(10_i64);
//! let b = Obj::new(10_i64); // equal value, distinct identity
//!
//! let for_a = cache.get_or_insert_with(&a, || "for a").unwrap();
//! let for_b = cache.get_or_insert_with(&b, || "for b").unwrap();
//! assert_ne!(for_a, for_b);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod error;
pub mod identity;
pub mod object;

// Re-exports
pub use cache::{CacheStats, IdentityCache};
pub use error::{CacheError, CacheResult};
pub use identity::{Identified, Identity};
pub use object::{AnyObj, Handle, Obj, Object, WeakObj};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
