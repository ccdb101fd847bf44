use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ViewerError, ViewerResult};

/// User-chosen identifier of a stored scene document.
///
/// Always non-empty and free of control characters. Any other character is
/// allowed; URL construction percent-encodes the id as one path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> ViewerResult<Self> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(ViewerError::ValidationFailed("model id is empty".to_string()));
        }
        if id.chars().any(char::is_control) {
            return Err(ViewerError::ValidationFailed(format!(
                "model id {:?} contains control characters",
                id
            )));
        }

        Ok(Self(id))
    }

    /// Parse text typed into the id field; surrounding whitespace is dropped
    pub fn from_input(input: &str) -> ViewerResult<Self> {
        Self::new(input.trim())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModelId {
    type Error = ViewerError;

    fn try_from(value: String) -> ViewerResult<Self> {
        Self::new(value)
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
