//! End-to-end tests for extraction, ingestion and search against test doubles.

mod helpers;

use chrono::{TimeZone, Utc};
use episode_graph::extraction::ExtractionResult;
use episode_graph::nodes::episodic::EpisodeType;
use episode_graph::pipeline::DEFAULT_SOURCE_DESCRIPTION;
use episode_graph::prompts::FORMAT_INSTRUCTIONS;
use episode_graph::utils::strip_code_fence;
use episode_graph::{ingest, query, EpisodeGraphError, Extractor, SearchResult};
use helpers::{Call, RecordingStore, ScriptedModel, CURIE_REPLY, CURIE_TEXT};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn extract_sends_prompt_with_text_and_schema() {
    let model = ScriptedModel::new(CURIE_REPLY);
    let extractor = Extractor::new(&model);

    extractor.extract("Ada Lovelace met Charles Babbage.").await.expect("extract");

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1, "exactly one model call");
    assert!(prompts[0].contains("Ada Lovelace met Charles Babbage."));
    assert!(prompts[0].contains(FORMAT_INSTRUCTIONS));
}

#[tokio::test]
async fn extract_rejects_invalid_replies() {
    for reply in ["", "{\"content\": {\"entities\": [", "{\"type\": \"json\"}", "```json\n```"] {
        let model = ScriptedModel::new(reply);
        let err = Extractor::new(&model)
            .extract(CURIE_TEXT)
            .await
            .expect_err("invalid reply must fail");
        match err {
            EpisodeGraphError::ExtractionParse { raw, .. } => assert_eq!(raw, reply),
            other => panic!("expected ExtractionParse for {reply:?}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn extract_accepts_unfenced_reply() {
    let unfenced = CURIE_REPLY
        .trim_start_matches("```json")
        .trim_end_matches("```")
        .to_string();
    let model = ScriptedModel::new(unfenced);
    let envelope = Extractor::new(&model).extract(CURIE_TEXT).await.expect("extract");
    assert_eq!(envelope.content.entities.len(), 4);
}

#[test]
fn fence_stripping_is_idempotent() {
    for raw in [CURIE_REPLY, "```\n{}\n```", "  {\"content\": {}}  ", "", "```json"] {
        let once = strip_code_fence(raw);
        assert_eq!(strip_code_fence(once), once, "not idempotent for {raw:?}");
    }
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ingest_orders_calls_and_closes_once() {
    let store = RecordingStore::new();
    let result = ExtractionResult::default();

    ingest(&store, "episode", &result, "desc").await.expect("ingest");

    let calls = store.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], Call::EnsureSchema);
    assert!(matches!(calls[1], Call::WriteEpisode(_)));
    assert_eq!(calls[2], Call::Close);
}

#[tokio::test]
async fn ingest_closes_when_write_fails() {
    let store = RecordingStore {
        fail_write: true,
        ..RecordingStore::new()
    };

    let err = ingest(&store, "episode", &ExtractionResult::default(), "desc")
        .await
        .expect_err("write failure must propagate");

    assert!(matches!(err, EpisodeGraphError::StoreWrite(_)));
    assert_eq!(store.close_count(), 1);
    assert_eq!(store.calls().last(), Some(&Call::Close));
}

#[tokio::test]
async fn ingest_closes_when_schema_fails_and_skips_write() {
    let store = RecordingStore {
        fail_schema: true,
        ..RecordingStore::new()
    };

    let err = ingest(&store, "episode", &ExtractionResult::default(), "desc")
        .await
        .expect_err("schema failure must propagate");

    assert!(matches!(err, EpisodeGraphError::StoreConnection(_)));
    assert_eq!(store.calls(), vec![Call::EnsureSchema, Call::Close]);
}

#[tokio::test]
async fn ingest_prefers_write_error_over_close_error() {
    let store = RecordingStore {
        fail_write: true,
        fail_close: true,
        ..RecordingStore::new()
    };

    let err = ingest(&store, "episode", &ExtractionResult::default(), "desc")
        .await
        .expect_err("should fail");
    assert!(matches!(err, EpisodeGraphError::StoreWrite(_)));
    assert_eq!(store.close_count(), 1);
}

#[tokio::test]
async fn ingest_reports_close_error_after_successful_write() {
    let store = RecordingStore {
        fail_close: true,
        ..RecordingStore::new()
    };

    let err = ingest(&store, "episode", &ExtractionResult::default(), "desc")
        .await
        .expect_err("close failure must surface");
    assert!(matches!(err, EpisodeGraphError::StoreConnection(_)));
}

#[tokio::test]
async fn ingest_writes_json_episode_with_metadata() {
    let store = RecordingStore::new();
    let before = Utc::now();

    ingest(&store, "lab notes", &ExtractionResult::default(), "  ")
        .await
        .expect("ingest");

    let episodes = store.episodes();
    assert_eq!(episodes.len(), 1);
    let episode = &episodes[0];
    assert_eq!(episode.name, "lab notes");
    assert_eq!(episode.source, EpisodeType::Json);
    assert_eq!(episode.source_description, DEFAULT_SOURCE_DESCRIPTION);
    assert!(episode.reference_time >= before && episode.reference_time <= Utc::now());

    let body: ExtractionResult = serde_json::from_str(&episode.body).expect("body is JSON");
    assert!(body.is_empty());
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

fn fact(text: &str, valid_at: Option<&str>, invalid_at: Option<&str>) -> SearchResult {
    SearchResult::from_store_row(&Uuid::new_v4().to_string(), text.to_string(), valid_at, invalid_at)
        .expect("valid row")
}

#[tokio::test]
async fn query_passes_through_results_and_closes() {
    let store = RecordingStore {
        results: vec![
            fact("Marie Curie discovered radium.", Some("1898-12-26T00:00:00Z"), None),
            fact("Marie Curie worked at Sorbonne University.", None, Some("not a date")),
        ],
        ..RecordingStore::new()
    };

    let results = query(&store, "marie curie", 10).await.expect("query");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].fact, "Marie Curie discovered radium.");
    assert_eq!(results[0].valid_at, Some(Utc.with_ymd_and_hms(1898, 12, 26, 0, 0, 0).unwrap()));
    assert!(results[1].invalid_at.is_none(), "malformed timestamps are dropped");

    assert_eq!(
        store.calls(),
        vec![
            Call::EnsureSchema,
            Call::Search {
                query: "marie curie".to_string(),
                limit: 10
            },
            Call::Close,
        ]
    );
}

#[tokio::test]
async fn query_closes_when_search_fails() {
    let store = RecordingStore {
        fail_search: true,
        ..RecordingStore::new()
    };

    let err = query(&store, "radium", 5).await.expect_err("should fail");
    assert!(matches!(err, EpisodeGraphError::StoreQuery(_)));
    assert_eq!(store.close_count(), 1);
}

#[tokio::test]
async fn query_closes_when_schema_fails() {
    let store = RecordingStore {
        fail_schema: true,
        ..RecordingStore::new()
    };

    query(&store, "radium", 5).await.expect_err("should fail");
    assert_eq!(store.calls(), vec![Call::EnsureSchema, Call::Close]);
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn marie_curie_end_to_end() {
    let model = ScriptedModel::new(CURIE_REPLY);
    let envelope = Extractor::new(&model).extract(CURIE_TEXT).await.expect("extract");
    let content = &envelope.content;

    let curie = content.entity("marie curie").expect("marie curie extracted");
    assert!(curie.singular);
    assert!(content.entity("radium").is_some());
    assert!(content.relationships.iter().any(|r| r.entity_1 == "marie curie"
        && r.entity_2 == "radium"
        && r.relationship_type == "discovered"));

    let store = RecordingStore::new();
    ingest(&store, "Freakonomics Radio", content, &envelope.description)
        .await
        .expect("ingest");

    let episodes = store.episodes();
    assert_eq!(episodes.len(), 1, "exactly one episode write");
    let body: serde_json::Value = serde_json::from_str(&episodes[0].body).expect("body is JSON");
    let names: Vec<&str> = body["entities"]
        .as_array()
        .expect("entities array")
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert!(names.contains(&"marie curie"));
    assert!(names.contains(&"radium"));
    assert_eq!(episodes[0].source_description, "structured knowledge extraction from text");
    assert_eq!(store.close_count(), 1);
}
