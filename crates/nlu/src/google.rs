use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::{NluError, Result};

/// Typed body of a Healthcare NLP `analyzeEntities` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub entity_mentions: Vec<EntityMention>,
    #[serde(default)]
    pub entities: Vec<KnowledgeEntity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// One span of the input text recognized as a medical concept.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMention {
    pub mention_id: i64,
    #[serde(rename = "type")]
    pub mention_type: String,
    pub text: TextSpan,
    #[serde(default)]
    pub linked_entities: Vec<LinkedEntity>,
    #[serde(default)]
    pub temporal_assessment: Option<CertaintyAssessment>,
    #[serde(default)]
    pub certainty_assessment: Option<CertaintyAssessment>,
    #[serde(default)]
    pub subject: Option<CertaintyAssessment>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    pub content: String,
    #[serde(default)]
    pub begin_offset: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedEntity {
    pub entity_id: String,
}

/// Qualifier attached to a mention: when it happened, how certain it is, or
/// whom it is about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertaintyAssessment {
    pub value: String,
    pub confidence: f64,
}

/// Dictionary entry a mention may link to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeEntity {
    pub entity_id: String,
    #[serde(default)]
    pub preferred_term: Option<String>,
    #[serde(default)]
    pub vocabulary_codes: Vec<String>,
}

/// Directed edge between two mentions, by mention id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub subject_id: i64,
    pub object_id: i64,
    pub confidence: f64,
}

impl fmt::Display for EntityMention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] {} ({}) at {}",
            self.mention_id, self.text.content, self.mention_type, self.text.begin_offset
        )?;
        writeln!(f, "  confidence: {}", self.confidence)?;
        writeln!(f, "  temporal: {}", assessment(&self.temporal_assessment))?;
        writeln!(f, "  certainty: {}", assessment(&self.certainty_assessment))?;
        write!(f, "  subject: {}", assessment(&self.subject))
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (confidence {})",
            self.subject_id, self.object_id, self.confidence
        )
    }
}

fn assessment(slot: &Option<CertaintyAssessment>) -> String {
    match slot {
        Some(a) => format!("{} ({})", a.value, a.confidence),
        None => "none".to_string(),
    }
}

impl AnalyzeResponse {
    /// Parse a raw provider body. Failure is a structured shape error, never a
    /// panic.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(NluError::shape("google"))
    }

    /// Human-readable report: one block per mention, then one per
    /// relationship, separated by blank lines. Mentions linked to a known
    /// dictionary entry include its preferred term; dangling links render
    /// the raw id.
    #[must_use]
    pub fn render(&self) -> String {
        let terms: HashMap<&str, &KnowledgeEntity> = self
            .entities
            .iter()
            .map(|e| (e.entity_id.as_str(), e))
            .collect();

        let mut blocks: Vec<String> = Vec::new();
        for mention in &self.entity_mentions {
            let mut block = mention.to_string();
            for link in &mention.linked_entities {
                match terms.get(link.entity_id.as_str()) {
                    Some(entity) => {
                        let term = entity.preferred_term.as_deref().unwrap_or("none");
                        block.push_str(&format!("\n  linked: {} ({})", link.entity_id, term));
                    }
                    None => block.push_str(&format!("\n  linked: {}", link.entity_id)),
                }
            }
            blocks.push(block);
        }
        for relationship in &self.relationships {
            blocks.push(relationship.to_string());
        }
        blocks.join("\n\n")
    }
}
