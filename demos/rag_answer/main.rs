//! # RAG Answer Example
//!
//! Demonstrates retrieval and grounded answering end to end with
//! `InMemoryVectorStore` and deterministic local providers, so it runs with
//! **zero API keys**.
//!
//! Run: `cargo run -p mmrag-demos --example rag_answer -- "What is the capital of France?"`

use std::sync::Arc;

use clap::Parser;
use mmrag::{
    Answerer, DocumentChunk, EmbeddingProvider, GenerationProvider, InMemoryVectorStore, Modality,
    RagConfig, ServiceError, VectorStore,
};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// HashingEmbeddingProvider — bag-of-words embeddings for demos
// ---------------------------------------------------------------------------

struct HashingEmbeddingProvider {
    dimensions: usize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError> {
        let mut emb = vec![0.0f32; self.dimensions];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let hash = word
                .to_lowercase()
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            emb[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ---------------------------------------------------------------------------
// ExtractiveGenerator — answers with the first context entry
// ---------------------------------------------------------------------------

struct ExtractiveGenerator;

#[async_trait::async_trait]
impl GenerationProvider for ExtractiveGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let best = prompt
            .split("Context:\n")
            .nth(1)
            .and_then(|rest| rest.lines().next())
            .filter(|line| !line.trim().is_empty());
        Ok(match best {
            Some(line) => format!("Based on the context: {line}"),
            None => "The context does not contain an answer.".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(about = "Answer a question from a small in-memory knowledge base")]
struct Args {
    /// The question to answer
    #[arg(default_value = "What is the capital of France?")]
    query: String,

    /// Number of chunks to retrieve
    #[arg(short, long, default_value_t = mmrag::DEFAULT_TOP_K)]
    k: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let embedder = Arc::new(HashingEmbeddingProvider { dimensions: 128 });
    let store = Arc::new(InMemoryVectorStore::new());

    // -- 1. Populate the store --------------------------------------------
    // The image entry stands in for a caption produced by a vision model.
    let corpus = [
        ("geo.txt", "Paris is the capital of France.", Modality::Text),
        ("geo.txt", "Berlin is the capital of Germany.", Modality::Text),
        ("rust.md", "Rust achieves memory safety without a garbage collector.", Modality::Text),
        (
            "tower.png",
            "The Eiffel Tower in Paris lit up at night against a dark sky.",
            Modality::Image,
        ),
        ("kitchen.txt", "Simmer the tomato sauce for ten minutes before serving.", Modality::Text),
    ];
    let texts: Vec<&str> = corpus.iter().map(|(_, text, _)| *text).collect();
    let embeddings = embedder.embed_batch(&texts).await?;
    let chunks: Vec<DocumentChunk> = corpus
        .iter()
        .zip(embeddings)
        .map(|((source, text, modality), embedding)| {
            DocumentChunk::new(*source, *text, *modality, embedding)
        })
        .collect();
    store.insert(&chunks).await?;
    println!("Stored {} chunks.", chunks.len());

    // -- 2. Build the answerer ---------------------------------------------
    let answerer = Answerer::builder()
        .config(RagConfig::builder().top_k(args.k).build()?)
        .embedding_provider(embedder)
        .vector_store(store)
        .generation_provider(Arc::new(ExtractiveGenerator))
        .build()?;

    // -- 3. Ask -------------------------------------------------------------
    println!("\nQuery: \"{}\"", args.query);
    let answer = answerer.answer(&args.query).await?;

    println!("\nSupporting chunks:");
    if answer.supporting.is_empty() {
        println!("  (none)");
    }
    for (i, result) in answer.supporting.iter().enumerate() {
        println!(
            "  {}. [score={:.4}] [{}] {} | {}",
            i + 1,
            result.score,
            result.modality,
            result.source,
            result.chunk
        );
    }
    println!("\nAnswer: {}", answer.text);

    Ok(())
}
