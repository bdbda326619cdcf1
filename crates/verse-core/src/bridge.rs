//! Bridging
//!
//! Provides [`Bridge`], which lets any handle ask for its parallel object in
//! a verse, so call chains read left to right:
//!
//! ```rust,ignore
//! original.bridge_to(&verse)?.describe()
//! // instead of
//! verse.lookup_or_create(&original)?.describe()
//! ```

use crate::error::VerseResult;
use crate::rule::CreationRule;
use crate::verse::Verse;
use verse_identity::Handle;

/// Original-object capabilities: bridge into a verse, report the original
///
/// [`self_reference`](Handle::self_reference) comes from the [`Handle`]
/// supertrait. Implemented for every handle; holds no state of its own.
pub trait Bridge: Handle {
    /// This object's parallel object in `verse`
    ///
    /// Same as [`Verse::lookup_or_create`].
    ///
    /// # Errors
    /// Returns the verse's error if the parallel object cannot be produced.
    #[inline]
    fn bridge_to<R: CreationRule>(&self, verse: &Verse<R>) -> VerseResult<R::Parallel> {
        verse.lookup_or_create(self)
    }
}

impl<H: Handle + ?Sized> Bridge for H {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VerseError;
    use crate::rule::FnRule;
    use verse_identity::{AnyObj, Identified, Obj};

    fn mirror() -> Verse<FnRule<impl Fn(&AnyObj) -> VerseResult<Obj<u64>> + Send + Sync, Obj<u64>>> {
        Verse::from_fn(|original: &AnyObj| Ok(Obj::derived(original.identity().get(), original)))
    }

    #[test]
    fn bridge_matches_lookup() {
        let verse = mirror();
        let original = Obj::new("x");

        let bridged = original.bridge_to(&verse).unwrap();
        let looked_up = verse.lookup_or_create(&original).unwrap();

        assert_eq!(bridged, looked_up);
    }

    #[test]
    fn parallel_reports_original() {
        let verse = mirror();
        let original = Obj::new(10_i64);

        let parallel = original.bridge_to(&verse).unwrap();

        assert_eq!(parallel.self_reference(), original);
        assert_eq!(*parallel, original.identity().get());
    }

    #[test]
    fn chaining_through_self_reference_is_stable() {
        let verse = mirror();
        let original = Obj::new(10_i64);

        let again = original
            .bridge_to(&verse)
            .unwrap()
            .self_reference()
            .bridge_to(&verse)
            .unwrap();

        assert_eq!(again, verse.lookup_or_create(&original).unwrap());
        assert_eq!(verse.len(), 1);
    }

    #[test]
    fn chains_across_verses_step_back_one_hop() {
        let first = mirror();
        let second = mirror();
        let root = Obj::new("root");

        let p1 = root.bridge_to(&first).unwrap();
        let p2 = p1.bridge_to(&second).unwrap();

        assert_eq!(p2.self_reference(), p1);
        assert_eq!(p2.self_reference().self_reference(), root);
        assert_eq!(second.len(), 1);
        assert!(second.contains(&p1));
        assert!(!second.contains(&root));
    }

    #[test]
    fn bridge_propagates_errors() {
        let verse = Verse::from_fn(|original: &AnyObj| -> VerseResult<()> {
            Err(VerseError::unimplemented_for(original))
        });

        let err = Obj::new(3_u8).bridge_to(&verse).unwrap_err();
        assert_eq!(err, VerseError::Unimplemented { type_name: "u8" });
    }
}
