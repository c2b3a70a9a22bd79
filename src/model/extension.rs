use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ValidationError;

/// Name of a caller-defined entry field.
///
/// Extension keys always start with an underscore so they can never shadow a
/// standard entry field. [`ExtensionKey::new`] adds the underscore when it is
/// missing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ExtensionKey(Cow<'static, str>);

impl ExtensionKey {
    pub const COMMENTS: ExtensionKey = ExtensionKey(Cow::Borrowed("_comments"));
    pub const VIEWS: ExtensionKey = ExtensionKey(Cow::Borrowed("_views"));
    pub const LIKES: ExtensionKey = ExtensionKey(Cow::Borrowed("_likes"));
    pub const SHARES: ExtensionKey = ExtensionKey(Cow::Borrowed("_shares"));
    pub const RATINGS: ExtensionKey = ExtensionKey(Cow::Borrowed("_ratings"));

    /// Builds a key, prefixing `_` if needed.
    ///
    /// # Errors
    ///
    /// Fails with a `ValidationError` on field `extensions` when the name is
    /// empty (or only `_`) or contains whitespace.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let bare = name.strip_prefix('_').unwrap_or(name);
        if bare.is_empty() {
            return Err(ValidationError::new(
                "extensions",
                "extension key must not be empty",
            ));
        }
        if bare.chars().any(char::is_whitespace) {
            return Err(ValidationError::new(
                "extensions",
                format!("extension key contains whitespace: {name:?}"),
            ));
        }
        Ok(Self(Cow::Owned(format!("_{bare}"))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recognises wire member names that are extension fields.
    fn from_member(name: &str) -> Option<Self> {
        if name.starts_with('_') {
            Self::new(name).ok()
        } else {
            None
        }
    }
}

impl fmt::Display for ExtensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extension fields attached to an entry, keyed by [`ExtensionKey`].
///
/// On the wire these are flattened into the item object. When decoding, only
/// underscore-prefixed members are kept; any other unknown member is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Extensions(BTreeMap<ExtensionKey, Value>);

impl Extensions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, key: ExtensionKey, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key, value.into())
    }

    pub fn get(&self, key: &ExtensionKey) -> Option<&Value> {
        self.0.get(key)
    }
}

impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let members = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self(
            members
                .into_iter()
                .filter_map(|(name, value)| ExtensionKey::from_member(&name).map(|k| (k, value)))
                .collect(),
        ))
    }
}
