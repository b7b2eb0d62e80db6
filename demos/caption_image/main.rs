//! # Caption Image Example
//!
//! Captions an image with an OpenAI vision model. With `--index`, the
//! caption is embedded and stored in pgvector as an `image` chunk so it
//! becomes searchable text.
//!
//! Requires: `OPENAI_API_KEY` (and `DATABASE_URL` for `--index`).
//!
//! Run: `cargo run -p mmrag-demos --example caption_image -- photo.jpg --index`

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mmrag::openai::{OpenAICaptionProvider, OpenAIConfig, OpenAIEmbeddingProvider};
use mmrag::pgvector::{DEFAULT_TABLE, PgVectorStore};
use mmrag::{DocumentChunk, EmbeddingProvider, Modality, VectorStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Caption an image, optionally indexing the caption")]
struct Args {
    /// Path to a PNG, JPEG, GIF or WebP image
    image: PathBuf,

    /// Embed the caption and insert it into pgvector
    #[arg(long)]
    index: bool,

    /// Table holding the chunks
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let openai = OpenAIConfig::from_env()?;

    let captioner = OpenAICaptionProvider::from_config(&openai)?;
    let caption = captioner.caption_file(&args.image).await?;
    println!("{caption}");

    if args.index {
        let embedder = OpenAIEmbeddingProvider::from_config(&openai)?;
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let store = PgVectorStore::connect(&database_url).await?.with_table(&args.table)?;
        store.ensure_schema(embedder.dimensions()).await?;

        let embedding = embedder.embed(&caption).await?;
        let source = args.image.display().to_string();
        let chunk = DocumentChunk::new(source.clone(), caption, Modality::Image, embedding);
        store.insert(&[chunk]).await?;
        println!("\nIndexed {source} into '{}'.", args.table);
    }

    Ok(())
}
