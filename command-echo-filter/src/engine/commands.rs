//! Protected command prefixes.
//!
//! A prefix is a command name followed by its delimiter, so `/login ` never
//! matches an unrelated command such as `/loginstats`.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Commands whose arguments carry credentials and must never be logged.
pub const PROTECTED_COMMAND_PREFIXES: &[&str] = &[
    "/login ",
    "/l ",
    "/log ",
    "/register ",
    "/reg ",
    "/premium ",
    "/autologin ",
    "/2faconfirm ",
    "/changepassword ",
    "/changepass ",
    "/passch ",
    "/passwd ",
    "/confirmpasswordreset ",
    "/setemail ",
    "/librelogin user register ",
    "/librelogin user pass-change ",
];

/// An immutable set of protected command prefixes.
///
/// The set keeps insertion order and holds no duplicates. Matching is
/// case-sensitive and exact.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<String>", into = "Vec<String>")
)]
pub struct ProtectedCommandSet {
    prefixes: Vec<Cow<'static, str>>,
}

impl ProtectedCommandSet {
    /// Builds a set from custom prefixes.
    ///
    /// Every prefix must be non-empty and end with a whitespace delimiter.
    /// Duplicates are collapsed, keeping the first occurrence.
    pub fn new<I, S>(prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let mut set = Self {
            prefixes: Vec::new(),
        };
        for prefix in prefixes {
            let prefix = prefix.into();
            validate(&prefix)?;
            if !set.contains(&prefix) {
                set.prefixes.push(prefix);
            }
        }
        Ok(set)
    }

    /// Returns `true` if `text` starts with any protected prefix.
    pub fn matches(&self, text: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| text.starts_with(prefix.as_ref()))
    }

    /// Returns `true` if `prefix` is part of the set.
    pub fn contains(&self, prefix: &str) -> bool {
        self.prefixes.iter().any(|known| known == prefix)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl Default for ProtectedCommandSet {
    fn default() -> Self {
        Self {
            prefixes: PROTECTED_COMMAND_PREFIXES
                .iter()
                .map(|prefix| Cow::Borrowed(*prefix))
                .collect(),
        }
    }
}

impl TryFrom<Vec<String>> for ProtectedCommandSet {
    type Error = Error;

    fn try_from(prefixes: Vec<String>) -> Result<Self> {
        Self::new(prefixes)
    }
}

impl From<ProtectedCommandSet> for Vec<String> {
    fn from(set: ProtectedCommandSet) -> Self {
        set.prefixes.into_iter().map(Cow::into_owned).collect()
    }
}

fn validate(prefix: &str) -> Result<()> {
    match prefix.chars().last() {
        None => Err(Error::EmptyPrefix),
        Some(last) if !last.is_whitespace() => Err(Error::MissingDelimiter(prefix.to_owned())),
        Some(_) => Ok(()),
    }
}
