use serde::{Deserialize, Serialize};

/// Raw text of a watch target at one point in time
///
/// Only the literal text is kept; two snapshots are the same version iff
/// their text is byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSnapshot(String);

impl ContentSnapshot {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for ContentSnapshot {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ContentSnapshot {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for ContentSnapshot {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
