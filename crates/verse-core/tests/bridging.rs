//! Bridging behaviour of verses, end to end
//!
//! Uses the assistant verse from `verse-test-utils`: numbers get number
//! assistants, text gets text assistants, anything else the default one.

use pretty_assertions::assert_eq;
use verse_core::prelude::*;
use verse_test_utils::{assistant_verse, init_tracing, Assistant, AssistantKind};

#[test]
fn assistant_reports() {
    init_tracing();
    let verse = assistant_verse();

    let ten = Obj::new(10_i64);
    let hi = Obj::new("hi");
    let none = Obj::new(());

    assert_eq!(ten.bridge_to(&verse).unwrap().report(), "number for 10");
    assert_eq!(hi.bridge_to(&verse).unwrap().report(), "text for hi");
    assert_eq!(none.bridge_to(&verse).unwrap().report(), "default for <none>");
}

#[test]
fn every_primitive_number_gets_a_number_assistant() {
    let verse = assistant_verse();
    let originals = [
        AnyObj::new(10_i8),
        AnyObj::new(10_i16),
        AnyObj::new(10_i32),
        AnyObj::new(10_i64),
        AnyObj::new(10_i128),
        AnyObj::new(10_isize),
        AnyObj::new(10_u8),
        AnyObj::new(10_u16),
        AnyObj::new(10_u32),
        AnyObj::new(10_u64),
        AnyObj::new(10_u128),
        AnyObj::new(10_usize),
    ];

    for original in &originals {
        let assistant = original.bridge_to(&verse).unwrap();
        assert_eq!(assistant.report(), "number for 10", "{}", original.value_type_name());
    }
    assert_eq!(verse.rule().calls(), originals.len());
}

#[test]
fn only_unit_reads_as_none() {
    let verse = assistant_verse();

    let unit = Obj::new(()).bridge_to(&verse).unwrap();
    let empty = Obj::new(None::<i64>).bridge_to(&verse).unwrap();

    assert_eq!(unit.report(), "default for <none>");
    assert_eq!(empty.kind, AssistantKind::Default);
    assert_eq!(empty.report(), "default for None");
}

#[test]
fn second_lookup_returns_same_instance() {
    let verse = assistant_verse();
    let ten = Obj::new(10_i64);

    let first = verse.lookup_or_create(&ten).unwrap();
    let second = verse.lookup_or_create(&ten).unwrap();

    assert_eq!(first, second);
    assert_eq!(verse.rule().calls(), 1);
}

#[test]
fn verses_never_share_entries() {
    let v1 = assistant_verse();
    let v2 = assistant_verse();
    let ten = Obj::new(10_i64);

    let p1 = ten.bridge_to(&v1).unwrap();
    let p2 = ten.bridge_to(&v2).unwrap();

    assert_ne!(p1, p2);
    assert_eq!(p1.report(), p2.report());
    assert_eq!(v1.rule().calls(), 1);
    assert_eq!(v2.rule().calls(), 1);
}

#[test]
fn value_equal_originals_are_distinct_keys() {
    let verse = assistant_verse();
    let a = Obj::new(String::from("hi"));
    let b = Obj::new(String::from("hi"));

    let pa = a.bridge_to(&verse).unwrap();
    let pb = b.bridge_to(&verse).unwrap();

    assert_ne!(pa, pb);
    assert_eq!(pa.report(), pb.report());
    assert_eq!(verse.len(), 2);
    assert_eq!(verse.rule().calls(), 2);
}

#[test]
fn round_trip_recovers_original() {
    let verse = assistant_verse();
    let ten = Obj::new(10_i64);

    let parallel = verse.lookup_or_create(&ten).unwrap();

    assert_eq!(parallel.self_reference(), ten);
    assert_eq!(parallel.self_reference().downcast_ref::<i64>(), Some(&10));
}

#[test]
fn chaining_is_stable() {
    let verse = assistant_verse();
    let ten = Obj::new(10_i64);

    let chained = ten
        .bridge_to(&verse)
        .unwrap()
        .self_reference()
        .bridge_to(&verse)
        .unwrap();

    assert_eq!(chained, verse.lookup_or_create(&ten).unwrap());
    assert_eq!(verse.rule().calls(), 1);
}

#[test]
fn fallback_is_consistent() {
    let verse = assistant_verse();
    let unhandled = Obj::new(vec!['a', 'b']);

    let first = unhandled.bridge_to(&verse).unwrap();
    let second = unhandled.bridge_to(&verse).unwrap();

    assert_eq!(first.kind, AssistantKind::Default);
    assert_eq!(first.report(), "default for ['a', 'b']");
    assert_eq!(first, second);
}

#[test]
fn plain_object_references_itself() {
    let ten = Obj::new(10_i64);

    assert_eq!(ten.self_reference(), ten);
}

#[test]
fn alternating_verses_recover_root_by_hopping() {
    let numbers = assistant_verse();
    let others = assistant_verse();
    let root = Obj::new(42_u32);

    let assistant = root.bridge_to(&numbers).unwrap();
    let assistant_of_assistant = assistant.bridge_to(&others).unwrap();

    assert_eq!(assistant_of_assistant.kind, AssistantKind::Default);
    assert_eq!(assistant_of_assistant.self_reference(), assistant);

    let recovered = assistant_of_assistant.self_reference().self_reference();
    assert_eq!(recovered, root);
    assert_eq!(recovered.bridge_to(&numbers).unwrap(), assistant);
}

#[test]
fn round_trip_when_original_is_a_parallel_object() {
    let v1 = assistant_verse();
    let v2 = assistant_verse();
    let p1 = Obj::new(10_i64).bridge_to(&v1).unwrap();

    let p2 = v2.lookup_or_create(&p1).unwrap();

    assert_eq!(p2.self_reference(), p1);
    assert_eq!(p2.self_reference().downcast_ref::<Assistant>(), Some(&*p1));
}

#[test]
fn chaining_when_original_is_a_parallel_object() {
    let v1 = assistant_verse();
    let v2 = assistant_verse();
    let p1 = Obj::new("hi").bridge_to(&v1).unwrap();

    let chained = p1
        .bridge_to(&v2)
        .unwrap()
        .self_reference()
        .bridge_to(&v2)
        .unwrap();

    assert_eq!(chained, v2.lookup_or_create(&p1).unwrap());
    assert_eq!(v2.len(), 1);
    assert_eq!(v2.rule().calls(), 1);
}

#[test]
fn peek_never_creates() {
    let verse = assistant_verse();
    let ten = Obj::new(10_i64);

    assert_eq!(verse.get(&ten), None);
    assert_eq!(verse.rule().calls(), 0);

    let created = ten.bridge_to(&verse).unwrap();
    assert_eq!(verse.get(&ten), Some(created));
}

#[test]
fn stats_track_hits_and_misses() {
    let verse = assistant_verse();
    let ten = Obj::new(10_i64);
    let hi = Obj::new("hi");

    ten.bridge_to(&verse).unwrap();
    ten.bridge_to(&verse).unwrap();
    hi.bridge_to(&verse).unwrap();

    let stats = verse.stats();
    assert_eq!(stats.entry_count, 2);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.failed_creations, 0);
}

#[test]
fn missing_route_fails_loudly() {
    let verse = Verse::new(Dispatch::new().on::<i64>(|original, _| Ok(Obj::derived((), original))));
    let text = Obj::new("no route");

    let err = text.bridge_to(&verse).unwrap_err();

    assert_eq!(err, VerseError::Unimplemented { type_name: "&str" });
    assert!(!verse.contains(&text));
    assert_eq!(verse.stats().failed_creations, 1);
}
