//! Cypher statements used by the Neo4j store.
//!
//! The layout follows Graphiti's Neo4j schema (`Episodic` and `Entity` nodes,
//! `MENTIONS` and `RELATES_TO` relationships, the same index names), so graphs
//! written here can be read by Graphiti tooling.

/// Schema statements, each safe to re-run.
pub const SCHEMA: &[&str] = &[
    "CREATE CONSTRAINT entity_uuid IF NOT EXISTS FOR (n:Entity) REQUIRE n.uuid IS UNIQUE",
    "CREATE CONSTRAINT episode_uuid IF NOT EXISTS FOR (n:Episodic) REQUIRE n.uuid IS UNIQUE",
    "CREATE INDEX relation_uuid IF NOT EXISTS FOR ()-[e:RELATES_TO]-() ON (e.uuid)",
    "CREATE INDEX mention_uuid IF NOT EXISTS FOR ()-[e:MENTIONS]-() ON (e.uuid)",
    "CREATE INDEX entity_group_id IF NOT EXISTS FOR (n:Entity) ON (n.group_id)",
    "CREATE INDEX episode_group_id IF NOT EXISTS FOR (n:Episodic) ON (n.group_id)",
    "CREATE INDEX relation_group_id IF NOT EXISTS FOR ()-[e:RELATES_TO]-() ON (e.group_id)",
    "CREATE INDEX name_entity_index IF NOT EXISTS FOR (n:Entity) ON (n.name)",
    "CREATE INDEX valid_at_episodic_index IF NOT EXISTS FOR (n:Episodic) ON (n.valid_at)",
    "CREATE INDEX valid_at_edge_index IF NOT EXISTS FOR ()-[e:RELATES_TO]-() ON (e.valid_at)",
    "CREATE FULLTEXT INDEX episode_content IF NOT EXISTS \
     FOR (e:Episodic) ON EACH [e.content, e.source, e.source_description, e.group_id]",
    "CREATE FULLTEXT INDEX node_name_and_summary IF NOT EXISTS \
     FOR (n:Entity) ON EACH [n.name, n.summary, n.group_id]",
    "CREATE FULLTEXT INDEX edge_name_and_fact IF NOT EXISTS \
     FOR ()-[e:RELATES_TO]-() ON EACH [e.name, e.fact, e.group_id]",
];

pub const CREATE_EPISODE: &str = "\
CREATE (e:Episodic {
    uuid: $uuid,
    name: $name,
    group_id: $group_id,
    source: $source,
    source_description: $source_description,
    content: $content,
    created_at: datetime($created_at),
    valid_at: datetime($valid_at),
    entity_edges: []
})";

/// Merge an entity by name within the group and link the episode to it.
pub const MERGE_ENTITY: &str = "\
MERGE (n:Entity {name: $name, group_id: $group_id})
ON CREATE SET n.uuid = $uuid, n.created_at = datetime($created_at)
SET n.entity_type = $entity_type, n.singular = $singular, n.summary = $summary
WITH n
MATCH (e:Episodic {uuid: $episode_uuid})
MERGE (e)-[m:MENTIONS]->(n)
ON CREATE SET m.uuid = $mention_uuid, m.group_id = $group_id, m.created_at = datetime($created_at)";

/// Create a fact edge; endpoints absent from the entity list are merged bare.
pub const CREATE_RELATES_TO: &str = "\
MERGE (s:Entity {name: $source_name, group_id: $group_id})
ON CREATE SET s.uuid = $source_uuid, s.created_at = datetime($created_at), s.summary = ''
MERGE (t:Entity {name: $target_name, group_id: $group_id})
ON CREATE SET t.uuid = $target_uuid, t.created_at = datetime($created_at), t.summary = ''
CREATE (s)-[r:RELATES_TO {
    uuid: $uuid,
    group_id: $group_id,
    name: $name,
    fact: $fact,
    fact_embedding: $fact_embedding,
    episodes: [$episode_uuid],
    created_at: datetime($created_at),
    valid_at: datetime($valid_at)
}]->(t)
WITH r
MATCH (e:Episodic {uuid: $episode_uuid})
SET e.entity_edges = e.entity_edges + r.uuid";

/// Full-text fact search. The limit is applied only after the group filter,
/// so other groups' higher-scoring facts cannot crowd out this group's hits.
pub const SEARCH_FACTS: &str = "\
CALL db.index.fulltext.queryRelationships('edge_name_and_fact', $query)
YIELD relationship AS r, score
WHERE r.group_id = $group_id
RETURN r.uuid AS uuid,
       r.fact AS fact,
       toString(r.valid_at) AS valid_at,
       toString(r.invalid_at) AS invalid_at
ORDER BY score DESC
LIMIT $limit";
