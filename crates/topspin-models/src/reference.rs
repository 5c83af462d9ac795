//! Reference corpus entry types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sample::StrokeSample;

/// Identifier of one reference corpus entry (the player directory name,
/// e.g. `roger_federer`). Entries are iterated in lexicographic id order so
/// tie-breaking during matching is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ReferenceId(pub String);

impl ReferenceId {
    /// Create from an existing string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One loaded corpus entry: the reference id plus its stroke sample for the
/// requested stroke type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceEntry {
    /// Entry identifier.
    pub id: ReferenceId,
    /// The entry's per-phase poses. Phases may be absent; entries missing
    /// any phase are excluded from matching.
    pub sample: StrokeSample,
}

impl ReferenceEntry {
    /// Create an entry.
    pub fn new(id: ReferenceId, sample: StrokeSample) -> Self {
        Self { id, sample }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_id_ordering() {
        let mut ids = vec![
            ReferenceId::new("serena_williams"),
            ReferenceId::new("rafael_nadal"),
            ReferenceId::new("roger_federer"),
        ];
        ids.sort();
        assert_eq!(ids[0].as_str(), "rafael_nadal");
        assert_eq!(ids[2].as_str(), "serena_williams");
    }

    #[test]
    fn test_reference_id_transparent_serde() {
        let id = ReferenceId::new("roger_federer");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"roger_federer\"");
    }
}
