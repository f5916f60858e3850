// Integration tests for ragkit
use async_trait::async_trait;
use ragkit::lessons::{first_app, rag, smart_json};
use ragkit::prelude::*;
use ragkit_core::ChunkId;
use ragkit_llm::Result;
use serde_json::{json, Value};
use std::sync::Mutex;

const VOCABULARY: [&str; 11] = [
    "remote", "work", "performance", "review", "q2", "security", "marketing", "support", "budget",
    "vpn", "roadmap",
];

/// Keyword-count embeddings with a constant bias dimension
struct KeywordEmbedder;

fn keyword_vector(text: &str) -> Vector {
    let mut data = vec![0.0f32; VOCABULARY.len() + 1];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .map(|w| w.to_lowercase())
    {
        if let Some(i) = VOCABULARY.iter().position(|v| *v == word) {
            data[i] += 1.0;
        }
    }
    data[VOCABULARY.len()] = 1.0;
    Vector::new(data)
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| keyword_vector(t)).collect())
    }
}

/// Records prompts and streams a fixed answer
struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
    json: Value,
}

impl RecordingGenerator {
    fn new(json: Value) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            json,
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.prompts.lock().unwrap().push(messages[0].content.clone());
        Ok("answer".to_string())
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        sink: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String> {
        let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        self.prompts.lock().unwrap().push(last);
        sink("Grounded ");
        sink("answer.");
        Ok("Grounded answer.".to_string())
    }

    async fn complete_json(&self, messages: &[ChatMessage], _schema: &OutputSchema) -> Result<Value> {
        self.prompts.lock().unwrap().push(messages[0].content.clone());
        Ok(self.json.clone())
    }
}

#[tokio::test]
async fn test_knowledge_base_from_sample_documents() {
    let kb = rag::build_knowledge_base(&KeywordEmbedder, rag::sample_chunks())
        .await
        .unwrap();

    assert_eq!(kb.len(), 6);
    assert_eq!(kb.embedded_count(), 6);
    assert_eq!(kb.dimension(), Some(VOCABULARY.len() + 1));
}

#[tokio::test]
async fn test_retrieval_ranks_relevant_document_first() {
    let kb = rag::build_knowledge_base(&KeywordEmbedder, rag::sample_chunks())
        .await
        .unwrap();

    let results = rag::retrieve(&KeywordEmbedder, &kb, "What is our remote work policy?", rag::TOP_K)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].chunk.id(), &ChunkId::from(1u64));
    assert_eq!(results[1].chunk.id(), &ChunkId::from(6u64));
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn test_category_filter_restricts_retrieval() {
    let kb = rag::build_knowledge_base(&KeywordEmbedder, rag::sample_chunks())
        .await
        .unwrap();
    let query = keyword_vector("security requirements for remote work");
    let hr = MetadataFilter::new(FilterCondition::equals("category", "HR"));

    let results = kb.search_filtered(&query, 5, &hr).unwrap();

    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| r.chunk.meta("category").and_then(|v| v.as_str()) == Some("HR")));
}

#[tokio::test]
async fn test_rag_lesson_end_to_end() {
    let generator = RecordingGenerator::new(Value::Null);
    let mut out = Vec::<u8>::new();

    rag::run(&generator, &KeywordEmbedder, &mut out).await.unwrap();

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), rag::QUERIES.len());
    assert!(prompts[0].contains("\"What is our remote work policy?\""));
    assert!(prompts[0].contains(rag::DOCUMENTS[0].content));

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed.matches("🔍 Searching for:").count(), 4);
    assert_eq!(printed.matches("Grounded answer.").count(), 4);
    assert!(printed.contains("Category: HR"));
}

#[tokio::test]
async fn test_first_app_reports_length() {
    let generator = RecordingGenerator::new(Value::Null);
    let mut out = Vec::<u8>::new();

    let response = first_app::run(&generator, &mut out).await.unwrap();

    assert_eq!(response, "Grounded answer.");
    assert_eq!(generator.prompts(), vec![first_app::PROMPT.to_string()]);
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Generated 16 characters"));
}

#[tokio::test]
async fn test_smart_json_lesson() {
    let generator = RecordingGenerator::new(json!({
        "sentiment": "neutral",
        "priority": "medium",
        "category": "complaint",
        "summary": "Course is fine; instructor needs work.",
        "action_items": ["Review instructor"],
        "customer_name": "Unknown"
    }));
    let mut out = Vec::<u8>::new();

    let analysis = smart_json::run(&generator, &mut out).await.unwrap();

    assert_eq!(analysis.priority, smart_json::Priority::Medium);
    assert!(generator.prompts()[0].contains(smart_json::CUSTOMER_EMAIL));
    assert!(String::from_utf8(out).unwrap().contains("1. Review instructor"));
}

#[tokio::test]
async fn test_smart_json_rejects_invalid_reply() {
    let generator = RecordingGenerator::new(json!({ "sentiment": "furious" }));

    let err = smart_json::run(&generator, &mut Vec::<u8>::new()).await.unwrap_err();

    match err {
        ragkit_llm::Error::Validation(errors) => {
            assert!(errors.paths().contains(&"$.sentiment"));
            assert!(errors.paths().contains(&"$.customer_name"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_search_across_crates() {
    let candidates = vec![
        DocumentChunk::with_id(1u64, "a").with_embedding(Vector::new(vec![1.0, 0.0])),
        DocumentChunk::with_id(2u64, "b").with_embedding(Vector::new(vec![0.0, 1.0])),
        DocumentChunk::with_id(3u64, "c").with_embedding(Vector::new(vec![0.9, 0.1])),
    ];

    let results = search(&Vector::new(vec![1.0, 0.0]), &candidates, 2).unwrap();

    assert_eq!(results[0].chunk.id(), &ChunkId::from(1u64));
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert_eq!(results[1].chunk.id(), &ChunkId::from(3u64));
    assert!((results[1].score - 0.9939).abs() < 1e-3);
}
