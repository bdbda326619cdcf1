//! Verse Core
//!
//! Lazily created, per-namespace parallel objects.
//!
//! A [`Verse`] owns a [`CreationRule`] and an identity-keyed cache. Asking a
//! verse for an original's parallel object produces it on first access and
//! returns the very same object on every later access. Originals never need
//! to know about verses beyond being [`Handle`]s.
//!
//! # Core Concepts
//!
//! - [`CreationRule`]: what a verse makes out of an original
//! - [`Verse`]: a rule plus the cache of everything it produced
//! - [`Bridge`]: `original.bridge_to(&verse)` convenience over lookup
//! - [`Dispatch`]: a rule routing on the original's concrete type
//!
//! # Example
//!
//! ```rust
//! use verse_core::prelude::*;
//!
//! let describe = Verse::new(
//!     Dispatch::new()
//!         .on::<i64>(|original, n| Ok(Obj::derived(format!("number {n}"), original)))
//!         .otherwise(|original| Ok(Obj::derived(String::from("other"), original))),
//! );
//!
//! let ten = Obj::new(10_i64);
//! let parallel = ten.bridge_to(&describe).unwrap();
//!
//! assert_eq!(parallel.as_str(), "number 10");
//! assert_eq!(parallel.self_reference(), ten);
//! assert_eq!(ten.bridge_to(&describe).unwrap(), parallel);
//! ```
//!
//! # Concurrency
//!
//! Verses are `Send + Sync`. Concurrent lookups of the same original run the
//! rule once; the other callers wait for its result. A rule that (directly or
//! not) looks up the original it is producing, on the same thread, fails with
//! [`VerseError::CyclicCreation`]. Cycles spanning several threads are not
//! detected and must be avoided by the rule.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod bridge;
mod config;
mod dispatch;
mod error;
mod rule;
mod verse;

// Re-exports
pub use bridge::Bridge;
pub use config::VerseConfig;
pub use dispatch::Dispatch;
pub use error::{VerseError, VerseResult};
pub use rule::{CreationRule, FnRule};
pub use verse::Verse;
pub use verse_identity::{AnyObj, CacheStats, Handle, Identified, Identity, Obj, Object, WeakObj};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with verses
    pub use crate::{
        AnyObj, Bridge, CreationRule, Dispatch, Handle, Identified, Obj, Verse, VerseConfig,
        VerseError, VerseResult,
    };
}
