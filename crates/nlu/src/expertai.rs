use serde::{Deserialize, Serialize};

use crate::error::{NluError, Result};

/// Body of an expert.ai relations analysis response. Only the relation list
/// is consumed; other analysis sections are ignored on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationsResponse {
    #[serde(default)]
    pub data: RelationsData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationsData {
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// One verb-centred relation: the governing verb plus its related phrases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub verb: RelationItem,
    #[serde(default)]
    pub related: Vec<RelationItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationItem {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub lemma: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

impl RelationsResponse {
    /// Parse a raw provider body. Failure is a structured shape error, never a
    /// panic.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(NluError::shape("expertai"))
    }

    #[must_use]
    pub fn into_relations(self) -> Vec<Relation> {
        self.data.relations
    }
}

/// Serialize each relation back to JSON, one block per relation separated by
/// blank lines.
pub fn render_relations(relations: &[Relation]) -> Result<String> {
    let blocks = relations
        .iter()
        .map(|r| serde_json::to_string_pretty(r).map_err(NluError::shape("expertai")))
        .collect::<Result<Vec<_>>>()?;
    Ok(blocks.join("\n\n"))
}
