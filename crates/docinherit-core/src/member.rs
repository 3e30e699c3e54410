//! Member keys and the reference syntax used to spell them.
//!
//! Documentation entries and explicit `cref` targets share one textual form:
//!
//! ```text
//! kind-letter ':' type-name [ '.' member-name [ '(' param-types ')' ] ]
//! ```
//!
//! The kind letter is split off at the first colon. For non-type kinds the
//! member separator is the last `.` before the parameter list (if any), so
//! dotted parameter types such as `System.Int32` never split the name.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::identifier::Id;

/// Kind of documented element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Type,
    Field,
    Property,
    Method,
    Event,
}

impl MemberKind {
    /// Map a reference kind letter (`T`, `F`, `P`, `M`, `E`) to a kind.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "T" => Some(Self::Type),
            "F" => Some(Self::Field),
            "P" => Some(Self::Property),
            "M" => Some(Self::Method),
            "E" => Some(Self::Event),
            _ => None,
        }
    }

    /// The kind letter used in references.
    pub fn letter(&self) -> char {
        match self {
            Self::Type => 'T',
            Self::Field => 'F',
            Self::Property => 'P',
            Self::Method => 'M',
            Self::Event => 'E',
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Reasons a reference string cannot be turned into a [`MemberKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("reference `{0}` has no kind prefix")]
    MissingKind(String),

    #[error("unsupported reference kind `{kind}` in `{text}`")]
    UnsupportedKind { kind: String, text: String },

    #[error("reference `{0}` has an empty type or member name")]
    EmptyName(String),
}

/// Identity of a documented element.
///
/// For methods the member name carries the parameter signature, e.g.
/// `MethodA(System.Int32)`, which keeps overloads apart. Equality is
/// structural.
///
/// # Examples
///
/// ```
/// use docinherit_core::member::{MemberKey, MemberKind};
///
/// let key: MemberKey = "M:Acme.ClassCA.MethodA(System.Int32)".parse().unwrap();
/// assert_eq!(key.kind(), MemberKind::Method);
/// assert_eq!(key.type_name(), "Acme.ClassCA");
/// assert_eq!(key.name(), Some("MethodA"));
/// assert_eq!(key.signature(), Some("System.Int32"));
/// assert_eq!(key.to_string(), "M:Acme.ClassCA.MethodA(System.Int32)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
    kind: MemberKind,
    type_name: Id,
    member: Option<String>,
}

impl MemberKey {
    /// Key of a type-level entry.
    pub fn for_type(type_name: impl Into<Id>) -> Self {
        Self {
            kind: MemberKind::Type,
            type_name: type_name.into(),
            member: None,
        }
    }

    /// Key of a member entry. `member` includes any parameter list.
    pub fn for_member(kind: MemberKind, type_name: impl Into<Id>, member: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
            member: Some(member.into()),
        }
    }

    /// Parse a reference string.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError`] when the kind prefix is missing or unknown,
    /// or when the type or member portion is empty.
    pub fn parse(text: &str) -> Result<Self, ReferenceError> {
        let (letter, rest) = text
            .split_once(':')
            .ok_or_else(|| ReferenceError::MissingKind(text.to_string()))?;

        let kind = MemberKind::from_letter(letter).ok_or_else(|| ReferenceError::UnsupportedKind {
            kind: letter.to_string(),
            text: text.to_string(),
        })?;

        if rest.is_empty() {
            return Err(ReferenceError::EmptyName(text.to_string()));
        }

        if kind == MemberKind::Type {
            return Ok(Self::for_type(rest));
        }

        let search_end = rest.find('(').unwrap_or(rest.len());
        match rest[..search_end].rfind('.') {
            Some(dot) => {
                let (type_name, member) = (&rest[..dot], &rest[dot + 1..]);
                if type_name.is_empty() || member.is_empty() {
                    return Err(ReferenceError::EmptyName(text.to_string()));
                }
                Ok(Self::for_member(kind, type_name, member))
            }
            None => Ok(Self {
                kind,
                type_name: Id::new(rest),
                member: None,
            }),
        }
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The owning (or, for type keys, the referenced) type.
    pub fn type_name(&self) -> Id {
        self.type_name
    }

    /// The member name including the parameter list, if any.
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    /// The member name without its parameter list.
    pub fn name(&self) -> Option<&str> {
        self.member
            .as_deref()
            .map(|member| member.split_once('(').map_or(member, |(name, _)| name))
    }

    /// The text between the parentheses of a method parameter list.
    pub fn signature(&self) -> Option<&str> {
        let member = self.member.as_deref()?;
        let open = member.find('(')?;
        let close = member.rfind(')').filter(|close| *close > open)?;
        Some(&member[open + 1..close])
    }

    /// Returns `true` for type-only keys.
    pub fn is_type_only(&self) -> bool {
        self.member.is_none()
    }

    /// Same kind and member (name and signature), ignoring the owning type.
    pub fn same_member(&self, other: &MemberKey) -> bool {
        self.kind == other.kind && self.member == other.member
    }

    /// The same member re-homed onto another type.
    pub fn rehomed(&self, type_name: Id) -> Self {
        Self {
            kind: self.kind,
            type_name,
            member: self.member.clone(),
        }
    }
}

impl FromStr for MemberKey {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Some(member) => write!(f, "{}:{}.{}", self.kind, self.type_name, member),
            None => write!(f, "{}:{}", self.kind, self.type_name),
        }
    }
}
