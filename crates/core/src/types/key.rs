//! Gift key type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An opaque credential representing a pre-funded sending account.
///
/// Keys are presented verbatim to the external API and never interpreted
/// locally. `Debug` is implemented manually so keys cannot leak into logs
/// or error reports.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GiftKey(String);

impl GiftKey {
    /// Create a new key from user input.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for GiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GiftKey([REDACTED])")
    }
}
