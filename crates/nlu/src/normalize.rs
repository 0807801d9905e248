use log::debug;

use crate::meaning::{Entity, Meaning};

/// One normalized observation extracted from a provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub label: &'static str,
    pub value: String,
    pub confidence: f64,
}

/// Extract the facts a search query can be built from.
///
/// Only responses whose top intent is `query` carry usable facts; anything
/// else yields an empty set. Within each entity group, only the first
/// candidate is inspected. Groups whose first record is malformed are
/// skipped without affecting the rest.
#[must_use]
pub fn facts(meaning: &Meaning) -> Vec<Fact> {
    match meaning.top_intent() {
        Some(intent) if intent.name == "query" => {}
        other => {
            debug!(
                "no query intent (got {:?}), skipping fact extraction",
                other.map(|i| i.name.as_str())
            );
            return Vec::new();
        }
    }

    meaning
        .entities
        .iter()
        .filter_map(|(group_key, records)| {
            let entity = records.first()?.canonicalize(group_key)?;
            classify(&entity)
        })
        .collect()
}

/// Map one canonical entity onto its fact label.
fn classify(entity: &Entity) -> Option<Fact> {
    let role = entity.role.as_deref();
    let label = match (entity.name.as_str(), role) {
        ("wit$local_search_query", Some("query_resource")) => "query resource",
        ("wit$local_search_query", _) => return None,
        ("wit$contact", Some("name")) => "contact name",
        ("wit$contact", Some("family_name")) => "contact family name",
        ("wit$contact", _) => "contact",
        // Numbers arrive with search requests (ages, limits) but carry no
        // search meaning on their own.
        ("wit$number", _) => return None,
        (name, role) => {
            debug!("unclassified entity {name} (role {role:?})");
            return None;
        }
    };
    Some(Fact {
        label,
        value: entity.value.clone(),
        confidence: entity.confidence,
    })
}
