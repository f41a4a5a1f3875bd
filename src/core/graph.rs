//! Graph - Core data structure
//!
//! The knowledge graph is a single document holding every entity and every
//! relation. It is always read and written whole.
//!
//! # Key Properties
//! - **Append-only**: creating an entity or relation never merges with or
//!   replaces an existing one. Duplicate names are valid state.
//! - **No referential integrity**: a relation may name entities that do not
//!   exist (yet).
//! - **Tagged records**: every stored entity carries `"type": "entity"` and every
//!   relation `"type": "relation"`.
//! - **Lenient decode**: other writers share the document, so a stored record
//!   missing a field (or holding `null`) decodes with an empty value instead
//!   of failing the whole document. Fields this crate does not know are kept.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Missing and `null` both decode to the default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Discriminator stored on every entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EntityTag {
    #[default]
    #[serde(rename = "entity")]
    Entity,
}

/// Discriminator stored on every relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RelationTag {
    #[default]
    #[serde(rename = "relation")]
    Relation,
}

/// A named node with a type and ordered free-text observations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(rename = "type", default)]
    pub tag: EntityTag,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub observations: Vec<String>,
    /// Per-record fields from other writers (`created_by`, `created_at`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    pub fn new(
        name: impl Into<String>,
        entity_type: impl Into<String>,
        observations: Vec<String>,
    ) -> Self {
        Self {
            tag: EntityTag::Entity,
            name: name.into(),
            entity_type: entity_type.into(),
            observations,
            extra: Map::new(),
        }
    }

    /// Whether `needle` (already lowercased) occurs in the name, the type or
    /// any observation
    fn contains_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.entity_type.to_lowercase().contains(needle)
            || self
                .observations
                .iter()
                .any(|obs| obs.to_lowercase().contains(needle))
    }
}

/// A directed, typed edge between two entity names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    #[serde(rename = "type", default)]
    pub tag: RelationTag,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relation_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Relation {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            tag: RelationTag::Relation,
            from: from.into(),
            to: to.into(),
            relation_type: relation_type.into(),
            extra: Map::new(),
        }
    }
}

/// The whole persisted document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Vec<Entity>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub relations: Vec<Relation>,

    /// Top-level fields written by other clients of the same object
    /// (e.g. `last_updated`). Carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of `search_nodes`: matching entities only, relations are not filtered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub entities: Vec<Entity>,
}

impl Graph {
    /// `{entities: [], relations: []}`
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append every entity verbatim and return the appended ones
    pub fn create_entities(&mut self, new_entities: Vec<Entity>) -> Vec<Entity> {
        self.entities.extend(new_entities.iter().cloned());
        new_entities
    }

    /// Append every relation verbatim and return the appended ones
    pub fn create_relations(&mut self, new_relations: Vec<Relation>) -> Vec<Relation> {
        self.relations.extend(new_relations.iter().cloned());
        new_relations
    }

    /// Case-insensitive substring search over name, entity type and
    /// observations. An empty query matches every entity.
    pub fn search_nodes(&self, query: &str) -> SearchResult {
        let needle = query.to_lowercase();
        SearchResult {
            entities: self
                .entities
                .iter()
                .filter(|entity| entity.contains_lowercase(&needle))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn redis() -> Entity {
        Entity::new("Redis", "cache", vec!["in-memory store".to_string()])
    }

    #[test]
    fn test_entity_serializes_with_tag() {
        let value = serde_json::to_value(redis()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "entity",
                "name": "Redis",
                "entityType": "cache",
                "observations": ["in-memory store"]
            })
        );
    }

    #[test]
    fn test_relation_serializes_with_tag() {
        let value = serde_json::to_value(Relation::new("A", "B", "uses")).unwrap();
        assert_eq!(
            value,
            json!({"type": "relation", "from": "A", "to": "B", "relationType": "uses"})
        );
    }

    #[test]
    fn test_untagged_input_gets_tag() {
        let entity: Entity = serde_json::from_value(json!({
            "name": "A",
            "entityType": "t",
            "observations": []
        }))
        .unwrap();
        assert_eq!(entity.tag, EntityTag::Entity);
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let graph: Graph = serde_json::from_str("{}").unwrap();
        assert_eq!(graph, Graph::empty());
    }

    #[test]
    fn test_unknown_top_level_fields_survive() {
        let raw = json!({
            "entities": [],
            "relations": [],
            "last_updated": "2024-01-01T00:00:00",
            "updated_by": "agent-zero"
        });
        let graph: Graph = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(graph.extra.len(), 2);
        assert_eq!(serde_json::to_value(&graph).unwrap(), raw);
    }

    #[test]
    fn test_partial_records_decode_with_empty_fields() {
        let graph: Graph = serde_json::from_value(json!({
            "entities": [
                {"type": "entity", "name": "Keep", "entityType": "t", "observations": ["o"]},
                {"name": "Legacy", "observations": null},
                {"entityType": "orphan"}
            ],
            "relations": [{"from": "Keep", "to": "Legacy"}]
        }))
        .unwrap();

        assert_eq!(graph.entities.len(), 3);
        assert_eq!(graph.entities[1].entity_type, "");
        assert!(graph.entities[1].observations.is_empty());
        assert_eq!(graph.entities[2].name, "");
        assert_eq!(graph.relations[0].relation_type, "");
    }

    #[test]
    fn test_null_arrays_decode_as_empty() {
        let graph: Graph =
            serde_json::from_str(r#"{"entities": null, "relations": null}"#).unwrap();
        assert_eq!(graph, Graph::empty());
    }

    #[test]
    fn test_record_fields_from_other_writers_survive() {
        let raw = json!({
            "entities": [{
                "type": "entity",
                "name": "Redis",
                "entityType": "cache",
                "observations": [],
                "created_by": "agent-zero",
                "created_at": "2024-01-01T00:00:00"
            }],
            "relations": [{
                "type": "relation",
                "from": "App",
                "to": "Redis",
                "relationType": "uses",
                "created_by": "agent-zero"
            }]
        });

        let mut graph: Graph = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(graph.entities[0].extra["created_by"], "agent-zero");
        assert_eq!(serde_json::to_value(&graph).unwrap(), raw);

        graph.create_entities(vec![redis()]);
        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(value["entities"][0]["created_at"], "2024-01-01T00:00:00");
        assert_eq!(value["relations"][0]["created_by"], "agent-zero");
        assert!(value["entities"][1].get("created_by").is_none());
    }

    #[test]
    fn test_create_entities_keeps_duplicates() {
        let mut graph = Graph::empty();
        graph.create_entities(vec![Entity::new("A", "t", vec!["o1".to_string()])]);
        let echoed = graph.create_entities(vec![Entity::new("A", "t", vec![])]);

        assert_eq!(echoed.len(), 1);
        assert_eq!(graph.entities.len(), 2);
        assert!(graph.entities.iter().all(|e| e.name == "A"));
    }

    #[test]
    fn test_create_entities_preserves_order() {
        let mut graph = Graph::empty();
        graph.create_entities(vec![Entity::new("A", "t", vec!["o1".to_string()])]);
        graph.create_entities(vec![Entity::new("B", "t", vec![])]);

        let names: Vec<_> = graph.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_dangling_relation_is_accepted() {
        let mut graph = Graph::empty();
        let echoed = graph.create_relations(vec![Relation::new("ghost", "nobody", "knows")]);

        assert_eq!(echoed, graph.relations);
        assert!(graph.entities.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut graph = Graph::empty();
        graph.create_entities(vec![redis(), Entity::new("Postgres", "database", vec![])]);

        for query in ["redis", "CACHE", "memory"] {
            let result = graph.search_nodes(query);
            assert_eq!(result.entities.len(), 1, "query {query:?}");
            assert_eq!(result.entities[0].name, "Redis");
        }

        let result = graph.search_nodes("postgres");
        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].name, "Postgres");
    }

    #[test]
    fn test_search_misses() {
        let mut graph = Graph::empty();
        graph.create_entities(vec![redis()]);
        assert!(graph.search_nodes("postgres").entities.is_empty());
    }

    #[test]
    fn test_search_does_not_return_relations() {
        let mut graph = Graph::empty();
        graph.create_entities(vec![redis()]);
        graph.create_relations(vec![Relation::new("Redis", "App", "backs")]);

        let value = serde_json::to_value(graph.search_nodes("redis")).unwrap();
        assert!(value.get("relations").is_none());
        assert_eq!(value["entities"].as_array().unwrap().len(), 1);
    }
}
