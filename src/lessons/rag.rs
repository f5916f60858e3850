//! Lesson 4: retrieval-augmented generation over a small document set.
//!
//! Documents are embedded once into a [`KnowledgeBase`]. Each question is
//! embedded, the closest chunks are retrieved by cosine similarity, and the
//! retrieved text becomes the context of a grounded prompt.

use super::{preview, rule};
use ragkit_core::{DocumentChunk, KnowledgeBase, KnowledgeBaseConfig, ScoredResult};
use ragkit_llm::{embed_chunks, stream_response, EmbeddingProvider, Result, TextGenerator};
use std::io::Write;
use tracing::info;

pub const TOP_K: usize = 3;
pub const PREVIEW_CHARS: usize = 100;

/// One entry of the sample company handbook
#[derive(Debug, Clone, Copy)]
pub struct SampleDocument {
    pub content: &'static str,
    pub category: &'static str,
    pub topic: &'static str,
}

pub const DOCUMENTS: [SampleDocument; 6] = [
    SampleDocument {
        content: "Our company offers flexible remote work policies. Employees can work from home up to 3 days per week. \
We provide a $500 home office stipend and require at least 2 days in the office for collaboration.",
        category: "HR",
        topic: "remote-work",
    },
    SampleDocument {
        content: "The annual performance review process starts in January. Employees set goals with their managers, \
receive 360-degree feedback, and are evaluated on both technical skills and cultural values.",
        category: "HR",
        topic: "performance",
    },
    SampleDocument {
        content: "Our product roadmap for Q2 includes launching the mobile app, implementing real-time notifications, \
and adding multi-language support. The engineering team is prioritizing performance optimizations.",
        category: "Product",
        topic: "roadmap",
    },
    SampleDocument {
        content: "For customer support, we use a tiered system. Level 1 handles basic inquiries, Level 2 manages technical \
issues, and Level 3 escalates to engineering. Average response time is 4 hours.",
        category: "Support",
        topic: "process",
    },
    SampleDocument {
        content: "The marketing budget for Q2 is allocated as follows: 40% digital advertising, 30% content marketing, \
20% events and webinars, 10% influencer partnerships.",
        category: "Marketing",
        topic: "budget",
    },
    SampleDocument {
        content: "Security protocols require all employees to use 2FA, update passwords quarterly, and complete security \
training annually. VPN access is mandatory for remote work.",
        category: "IT",
        topic: "security",
    },
];

pub const QUERIES: [&str; 4] = [
    "What is our remote work policy?",
    "How does performance review work?",
    "What's planned for Q2?",
    "Tell me about our security requirements",
];

/// Un-embedded chunks for [`DOCUMENTS`], ids `1..=6`
pub fn sample_chunks() -> Vec<DocumentChunk> {
    DOCUMENTS
        .iter()
        .zip(1u64..)
        .map(|(doc, id)| {
            DocumentChunk::with_id(id, doc.content)
                .with_meta("category", doc.category)
                .with_meta("topic", doc.topic)
        })
        .collect()
}

/// Embed `chunks` and load them into a new knowledge base
pub async fn build_knowledge_base<P>(embedder: &P, chunks: Vec<DocumentChunk>) -> Result<KnowledgeBase>
where
    P: EmbeddingProvider + ?Sized,
{
    let embedded = embed_chunks(embedder, chunks).await?;
    let kb = KnowledgeBase::new(KnowledgeBaseConfig::new("company-handbook"));
    kb.insert_many(embedded)?;
    info!(
        "knowledge base '{}' holds {} chunks ({:?} dimensions)",
        kb.name(),
        kb.len(),
        kb.dimension()
    );
    Ok(kb)
}

/// The `limit` chunks closest to `query`
pub async fn retrieve<P>(embedder: &P, kb: &KnowledgeBase, query: &str, limit: usize) -> Result<Vec<ScoredResult>>
where
    P: EmbeddingProvider + ?Sized,
{
    let query_embedding = embedder.embed_one(query).await?;
    Ok(kb.search(&query_embedding, limit)?)
}

/// Prompt that asks for an answer from the retrieved context only
pub fn grounded_prompt(query: &str, results: &[ScoredResult]) -> String {
    let context: Vec<&str> = results.iter().map(|r| r.chunk.content()).collect();
    format!(
        "Based on the following company information, answer this question: \"{}\"\n\n\
         Company Information:\n{}\n\n\
         Please provide a helpful answer based only on the information provided above.",
        query,
        context.join("\n\n")
    )
}

pub fn render_results(results: &[ScoredResult], out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "📊 Search Results:")?;
    for (i, result) in results.iter().enumerate() {
        let category = result
            .chunk
            .meta("category")
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "\n{}. Similarity: {:.1}%", i + 1, result.percent())?;
        writeln!(out, "   Category: {}", category)?;
        writeln!(out, "   Content: {}", preview(result.chunk.content(), PREVIEW_CHARS))?;
    }
    Ok(())
}

/// Retrieve, show the matches, then stream a grounded answer
pub async fn search_and_answer<G, P>(
    generator: &G,
    embedder: &P,
    kb: &KnowledgeBase,
    query: &str,
    out: &mut (dyn Write + Send),
) -> Result<String>
where
    G: TextGenerator + ?Sized,
    P: EmbeddingProvider + ?Sized,
{
    writeln!(out, "🔍 Searching for: \"{}\"\n", query)?;
    let results = retrieve(embedder, kb, query, TOP_K).await?;
    render_results(&results, out)?;

    writeln!(out, "\n🤖 AI Answer based on search results:\n")?;
    let answer = stream_response(generator, &grounded_prompt(query, &results), out).await?;
    writeln!(out, "{}\n", rule('=', 60))?;
    Ok(answer)
}

pub async fn run<G, P>(generator: &G, embedder: &P, out: &mut (dyn Write + Send)) -> Result<()>
where
    G: TextGenerator + ?Sized,
    P: EmbeddingProvider + ?Sized,
{
    writeln!(out, "🚀 Lesson 4: RAG - search your documents\n")?;
    writeln!(out, "🔄 Building knowledge base with embeddings...")?;
    writeln!(out, "📄 Processing {} documents...", DOCUMENTS.len())?;
    let kb = build_knowledge_base(embedder, sample_chunks()).await?;
    writeln!(out, "✅ Embeddings created successfully!\n")?;

    for query in QUERIES {
        search_and_answer(generator, embedder, &kb, query, out).await?;
    }

    writeln!(out, "🎉 RAG demo complete!")?;
    writeln!(out, "\n💡 What you learned:")?;
    writeln!(out, "- Created embeddings for document search")?;
    writeln!(out, "- Ranked documents by cosine similarity")?;
    writeln!(out, "- Grounded the model's answer in retrieved context")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragkit_core::{ChunkId, Vector};

    fn scored(id: u64, content: &str, category: &str, score: f32) -> ScoredResult {
        ScoredResult {
            chunk: DocumentChunk::with_id(id, content).with_meta("category", category),
            score,
        }
    }

    #[test]
    fn test_sample_chunks() {
        let chunks = sample_chunks();
        assert_eq!(chunks.len(), 6);
        assert_eq!(chunks[0].id(), &ChunkId::from(1u64));
        assert_eq!(chunks[5].meta("category").and_then(|v| v.as_str()), Some("IT"));
        assert!(chunks.iter().all(|c| !c.has_embedding()));
    }

    #[test]
    fn test_grounded_prompt_contains_context_in_rank_order() {
        let results = vec![
            scored(1, "Remote work up to 3 days.", "HR", 0.9),
            scored(6, "VPN is mandatory.", "IT", 0.7),
        ];
        let prompt = grounded_prompt("What is our remote work policy?", &results);

        assert!(prompt.starts_with(
            "Based on the following company information, answer this question: \"What is our remote work policy?\""
        ));
        assert!(prompt.contains("Company Information:\nRemote work up to 3 days.\n\nVPN is mandatory."));
        assert!(prompt.ends_with("based only on the information provided above."));
    }

    #[test]
    fn test_render_results() {
        let long = "x".repeat(150);
        let results = vec![scored(1, &long, "HR", 0.87349), scored(2, "short", "IT", 0.5)];
        let mut out = Vec::<u8>::new();
        render_results(&results, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("1. Similarity: 87.3%"));
        assert!(printed.contains("   Category: HR"));
        assert!(printed.contains(&format!("   Content: {}...", "x".repeat(100))));
        assert!(printed.contains("2. Similarity: 50.0%"));
    }

    #[test]
    fn test_chunks_keep_metadata_after_embedding() {
        let chunk = sample_chunks().remove(0).with_embedding(Vector::new(vec![1.0, 0.0]));
        assert_eq!(chunk.meta("topic").and_then(|v| v.as_str()), Some("remote-work"));
    }
}
