//! Testing utilities for the verse workspace
//!
//! Shared fixtures: an illustrative "assistant" verse, a rule wrapper that
//! counts creations, and tracing setup.

#![allow(missing_docs)]

use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use verse_core::{AnyObj, CreationRule, Dispatch, Obj, Object, Verse, VerseConfig, VerseResult};

/// Which constructor an assistant came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantKind {
    Number,
    Text,
    Default,
}

impl Display for AssistantKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Number => "number",
            Self::Text => "text",
            Self::Default => "default",
        };
        f.write_str(label)
    }
}

/// Parallel object produced by the assistant verse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assistant {
    pub kind: AssistantKind,
    pub subject: String,
}

impl Assistant {
    pub fn report(&self) -> String {
        format!("{} for {}", self.kind, self.subject)
    }
}

pub type AssistantRule = Counting<Dispatch<Obj<Assistant>>>;
pub type AssistantVerse = Verse<AssistantRule>;

fn assist(kind: AssistantKind, subject: String, original: &AnyObj) -> VerseResult<Obj<Assistant>> {
    Ok(Obj::derived(Assistant { kind, subject }, original))
}

fn number<T: Object + Display>(original: &AnyObj, value: &T) -> VerseResult<Obj<Assistant>> {
    assist(AssistantKind::Number, value.to_string(), original)
}

fn text<T: Object + Display>(original: &AnyObj, value: &T) -> VerseResult<Obj<Assistant>> {
    assist(AssistantKind::Text, value.to_string(), original)
}

/// Textual form of an original the verse has no route for
///
/// `()` is the none value and reads as `<none>`. Everything else, an empty
/// `Option` included, reads as its `Debug` form.
pub fn describe_other(original: &AnyObj) -> String {
    if original.is::<()>() {
        String::from("<none>")
    } else {
        format!("{:?}", original.value())
    }
}

/// Verse producing number, text or default assistants
///
/// Every primitive integer and float type gets a number assistant, `String`
/// and `&'static str` get a text assistant. Reports read
/// `"<kind> for <original>"`; unit originals read as `<none>`.
pub fn assistant_verse() -> AssistantVerse {
    let rule = Dispatch::new()
        .on::<i8>(number::<i8>)
        .on::<i16>(number::<i16>)
        .on::<i32>(number::<i32>)
        .on::<i64>(number::<i64>)
        .on::<i128>(number::<i128>)
        .on::<isize>(number::<isize>)
        .on::<u8>(number::<u8>)
        .on::<u16>(number::<u16>)
        .on::<u32>(number::<u32>)
        .on::<u64>(number::<u64>)
        .on::<u128>(number::<u128>)
        .on::<usize>(number::<usize>)
        .on::<f32>(number::<f32>)
        .on::<f64>(number::<f64>)
        .on::<String>(text::<String>)
        .on::<&'static str>(text::<&'static str>)
        .otherwise(|original| assist(AssistantKind::Default, describe_other(original), original));

    Verse::with_config(Counting::new(rule), VerseConfig::new().with_name("assistants"))
}

/// Rule wrapper counting how often the inner rule ran
#[derive(Debug, Default)]
pub struct Counting<R> {
    inner: R,
    calls: AtomicUsize,
}

impl<R> Counting<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: CreationRule> CreationRule for Counting<R> {
    type Parallel = R::Parallel;

    fn produce(&self, original: &AnyObj) -> VerseResult<R::Parallel> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.produce(original)
    }
}

/// Install a test-writer tracing subscriber honouring `RUST_LOG`
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
