// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style names.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An opaque, cheaply clonable identifier used to look up styles.
///
/// [`StyleName::NONE`] is the "no name" sentinel. It never compares equal to a
/// real name (not even the empty string), and resolving a style carrying it
/// never touches the registry.
///
/// ```
/// use dynstyle::StyleName;
///
/// let card = StyleName::new("Card");
/// assert_eq!(card.as_str(), Some("Card"));
/// assert!(StyleName::NONE.is_none());
/// assert_ne!(StyleName::new(""), StyleName::NONE);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleName(Option<Arc<str>>);

impl StyleName {
    /// The "no name" sentinel.
    pub const NONE: Self = Self(None);

    /// Create a name from a string.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Some(Arc::from(name.as_ref())))
    }

    /// Returns `true` for the "no name" sentinel.
    #[must_use]
    #[inline]
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Returns `true` for a real name.
    #[must_use]
    #[inline]
    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// The name as a string slice, or `None` for the sentinel.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Debug for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(name) => write!(f, "StyleName({name:?})"),
            None => f.write_str("StyleName::NONE"),
        }
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("<none>"))
    }
}

impl From<&str> for StyleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for StyleName {
    fn from(name: String) -> Self {
        Self(Some(Arc::from(name)))
    }
}

impl Serialize for StyleName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StyleName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.map_or(Self::NONE, Self::from))
    }
}
