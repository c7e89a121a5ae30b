//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of one posting line.
///
/// Assigned by the engine (UUIDv7, time-ordered) when the caller does not
/// supply one. Prefer passing IDs explicitly in tests for determinism.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingLineId(Uuid);

impl PostingLineId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PostingLineId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PostingLineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for PostingLineId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<PostingLineId> for Uuid {
    fn from(value: PostingLineId) -> Self {
        value.0
    }
}

impl FromStr for PostingLineId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("PostingLineId: {e}")))?;
        Ok(Self(uuid))
    }
}
