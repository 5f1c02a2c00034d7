#![allow(dead_code)]

use std::sync::Mutex;

use episode_graph::driver::GraphStore;
use episode_graph::llm_client::LanguageModel;
use episode_graph::nodes::episodic::EpisodeRecord;
use episode_graph::{EpisodeGraphError, Result, SearchResult};
use uuid::Uuid;

/// A language model that always answers with the same reply and records prompts.
pub struct ScriptedModel {
    reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// One call made against [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    EnsureSchema,
    WriteEpisode(EpisodeRecord),
    Search { query: String, limit: usize },
    Close,
}

/// In-memory [`GraphStore`] that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    pub calls: Mutex<Vec<Call>>,
    pub fail_schema: bool,
    pub fail_write: bool,
    pub fail_search: bool,
    pub fail_close: bool,
    pub results: Vec<SearchResult>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Close)).count()
    }

    pub fn episodes(&self) -> Vec<EpisodeRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::WriteEpisode(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl GraphStore for RecordingStore {
    async fn ensure_schema(&self) -> Result<()> {
        self.record(Call::EnsureSchema);
        if self.fail_schema {
            return Err(EpisodeGraphError::StoreConnection("connection refused".to_string()));
        }
        Ok(())
    }

    async fn write_episode(&self, episode: &EpisodeRecord) -> Result<Uuid> {
        self.record(Call::WriteEpisode(episode.clone()));
        if self.fail_write {
            return Err(EpisodeGraphError::StoreWrite("constraint violation".to_string()));
        }
        Ok(Uuid::new_v4())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.record(Call::Search {
            query: query.to_string(),
            limit,
        });
        if self.fail_search {
            return Err(EpisodeGraphError::StoreQuery("index offline".to_string()));
        }
        Ok(self.results.iter().take(limit).cloned().collect())
    }

    async fn close(&self) -> Result<()> {
        self.record(Call::Close);
        if self.fail_close {
            return Err(EpisodeGraphError::StoreConnection("socket already gone".to_string()));
        }
        Ok(())
    }
}

/// What a well-behaved model returns for the Marie Curie sentence.
pub const CURIE_REPLY: &str = r#"```json
{
  "content": {
    "entities": [
      {"name": "marie curie", "entity_type": "scientist", "singular": true,
       "description": "Marie Curie is introduced as the person who \"discovered radium\"."},
      {"name": "radium", "entity_type": "chemical_element", "singular": true,
       "description": "Radium is what Marie Curie \"discovered\"."},
      {"name": "sorbonne university", "entity_type": "university", "singular": true,
       "description": "Marie Curie \"worked at Sorbonne University\"."},
      {"name": "paris", "entity_type": "city", "singular": true,
       "description": "Sorbonne University is \"in Paris\"."}
    ],
    "relationships": [
      {"entity_1": "marie curie", "entity_2": "radium", "relationship_type": "discovered",
       "description": "\"Marie Curie discovered radium\""},
      {"entity_1": "marie curie", "entity_2": "sorbonne university", "relationship_type": "worked_at",
       "description": "\"worked at Sorbonne University\""},
      {"entity_1": "sorbonne university", "entity_2": "paris", "relationship_type": "located_in",
       "description": "\"Sorbonne University in Paris\""}
    ]
  },
  "type": "json",
  "description": "structured knowledge extraction from text"
}
```"#;

pub const CURIE_TEXT: &str =
    "Marie Curie discovered radium and worked at Sorbonne University in Paris.";
