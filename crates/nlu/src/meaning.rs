use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{NluError, Result};

/// Canonical meaning of one utterance as reported by the Wit-style provider.
///
/// Deserialized once per query and never mutated afterwards. Entity-group keys
/// are unique; each group preserves the provider-reported candidate order.
#[derive(Debug, Clone, Deserialize)]
pub struct Meaning {
    pub text: String,
    #[serde(default)]
    pub intents: Vec<Intent>,
    #[serde(default)]
    pub entities: BTreeMap<String, Vec<EntityRecord>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Intent {
    pub name: String,
    pub confidence: f64,
}

/// Tolerant wire shape for one entity candidate. Providers omit fields on
/// malformed or partial candidates; canonicalization decides per record
/// whether enough is present to use it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Structured resolution side payload; carried opaquely, never required.
    #[serde(default)]
    pub resolved: Option<serde_json::Value>,
}

/// Canonical entity: the checked form of an [`EntityRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub role: Option<String>,
    pub value: String,
    pub confidence: f64,
}

impl EntityRecord {
    /// Canonicalize against the group key it was found under. Records missing
    /// a value or confidence are treated as malformed input for that single
    /// entity and yield `None`; the rest of the response is unaffected.
    #[must_use]
    pub fn canonicalize(&self, group_key: &str) -> Option<Entity> {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| group_key.split(':').next().unwrap_or(group_key).to_string());
        let value = match self.value.as_ref()? {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Some(Entity {
            name,
            role: self.role.clone(),
            value,
            confidence: self.confidence?,
        })
    }
}

impl Meaning {
    /// Parse a raw provider body. Failure is a structured shape error, never a
    /// panic.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(NluError::shape("wit"))
    }

    /// Top-ranked intent as reported by the provider (first in sequence).
    #[must_use]
    pub fn top_intent(&self) -> Option<&Intent> {
        self.intents.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "text": "find a doctor named Park",
        "intents": [{"name": "query", "confidence": 0.9957}],
        "entities": {
            "wit$contact:contact": [
                {"name": "wit$contact", "role": "contact", "value": "Park", "confidence": 0.91}
            ]
        }
    }"#;

    #[test]
    fn parses_a_full_response() {
        let meaning = Meaning::from_json(SAMPLE).expect("valid body");
        assert_eq!(meaning.text, "find a doctor named Park");
        assert_eq!(meaning.top_intent().map(|i| i.name.as_str()), Some("query"));
        let group = &meaning.entities["wit$contact:contact"];
        assert_eq!(group.len(), 1);
        let entity = group[0].canonicalize("wit$contact:contact").expect("complete");
        assert_eq!(
            entity,
            Entity {
                name: "wit$contact".into(),
                role: Some("contact".into()),
                value: "Park".into(),
                confidence: 0.91,
            }
        );
    }

    #[test]
    fn unparseable_body_is_a_shape_error() {
        let err = Meaning::from_json("{not json").expect_err("broken body");
        assert!(matches!(err, NluError::UnexpectedShape { provider: "wit", .. }));
    }

    #[test]
    fn record_without_value_is_skipped() {
        let record = EntityRecord {
            confidence: Some(0.5),
            ..EntityRecord::default()
        };
        assert!(record.canonicalize("wit$contact:contact").is_none());
    }

    #[test]
    fn record_without_confidence_is_skipped() {
        let record = EntityRecord {
            value: Some(serde_json::json!("Park")),
            ..EntityRecord::default()
        };
        assert!(record.canonicalize("wit$contact:contact").is_none());
    }

    #[test]
    fn missing_name_falls_back_to_the_group_key() {
        let record = EntityRecord {
            value: Some(serde_json::json!("Park")),
            confidence: Some(0.8),
            ..EntityRecord::default()
        };
        let entity = record.canonicalize("wit$contact:contact").expect("usable");
        assert_eq!(entity.name, "wit$contact");
    }

    #[test]
    fn numeric_values_are_stringified() {
        let record = EntityRecord {
            name: Some("wit$number".into()),
            value: Some(serde_json::json!(3)),
            confidence: Some(1.0),
            ..EntityRecord::default()
        };
        let entity = record.canonicalize("wit$number:number").expect("usable");
        assert_eq!(entity.value, "3");
    }
}
