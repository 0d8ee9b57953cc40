use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a slot in the paste store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the slot id from a paste-creation response such as
    /// `https://pastebin.com/AbCd1234`.
    ///
    /// The id is the trailing path segment; a trailing `/`, query string or
    /// fragment is ignored.
    pub fn from_response_url(body: &str) -> Result<Self, StoreError> {
        let trimmed = body.trim();
        let without_suffix = trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        let path = without_suffix
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(without_suffix);

        match path.split_once('/') {
            Some((_host, tail)) => match tail.rsplit('/').next() {
                Some(id) if !id.is_empty() => Ok(Self::new(id)),
                _ => Err(StoreError::MissingSlot(trimmed.to_string())),
            },
            None => Err(StoreError::MissingSlot(trimmed.to_string())),
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
