//! Interned type names.
//!
//! Every type name seen during a run (descriptors, documentation entries,
//! explicit references) is interned once so that registry lookups, graph
//! edges and member keys can carry a cheap, `Copy` handle instead of owned
//! strings.

use std::{
    cmp::Ordering,
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by all [`Id`]s.
///
/// # Thread Safety
///
/// Access goes through a `Mutex`; a run is single threaded, but tests may
/// create identifiers from several threads at once.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// An interned, fully qualified type name such as `Acme.Widgets.Button`.
///
/// # Examples
///
/// ```
/// use docinherit_core::identifier::Id;
///
/// let a = Id::new("Acme.ClassA");
/// let b: Id = "Acme.ClassA".into();
/// assert_eq!(a, b);
/// assert_eq!(a, "Acme.ClassA");
/// assert_eq!(a.simple_name(), "ClassA");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the interned string as an owned `String`.
    pub fn as_string(&self) -> String {
        interner()
            .resolve(self.0)
            .map(str::to_owned)
            .unwrap_or_default()
    }

    /// Returns the last dot-separated segment of the name.
    ///
    /// Generic arity markers and nested-type separators are kept as part of
    /// the segment.
    pub fn simple_name(&self) -> String {
        let full = self.as_string();
        match full.rfind('.') {
            Some(idx) => full[idx + 1..].to_string(),
            None => full,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let name = interner.resolve(self.0).unwrap_or_default();
        write!(f, "{name}")
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders identifiers by their text, not by interning order.
impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.0 == other.0 {
            return Ordering::Equal;
        }
        self.as_string().cmp(&other.as_string())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Id {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
