//! Data types for stored chunks, retrieval results and answers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of content a [`DocumentChunk`] was produced from.
///
/// Stored and serialized as lowercase (`"text"`, `"image"`). The
/// [`Display`](fmt::Display) form is the uppercase label used in prompt
/// context blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Plain text content.
    Text,
    /// A generated caption describing an image.
    Image,
}

impl Modality {
    /// The tag persisted in the vector store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("TEXT"),
            Self::Image => f.write_str("IMAGE"),
        }
    }
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            other => Err(format!("unknown modality '{other}'")),
        }
    }
}

/// A stored record: a piece of content and its embedding.
///
/// Every chunk in one store must have been embedded by the same model, with
/// the same dimensionality, as the queries run against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentChunk {
    /// Where the content came from (file name, URL, ...).
    pub source: String,
    /// The text content, or the caption for an image.
    pub chunk: String,
    /// What kind of content `chunk` describes.
    pub modality: Modality,
    /// The vector embedding of `chunk`.
    pub embedding: Vec<f32>,
}

impl DocumentChunk {
    /// Create a new chunk.
    pub fn new(
        source: impl Into<String>,
        chunk: impl Into<String>,
        modality: Modality,
        embedding: Vec<f32>,
    ) -> Self {
        Self { source: source.into(), chunk: chunk.into(), modality, embedding }
    }
}

/// A chunk returned by a nearest-neighbour query, with its similarity score.
///
/// `score` is `1 - distance` between the query embedding and the chunk's
/// embedding, so `1.0` is a perfect match. Lists of results are always
/// ordered by descending score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedResult {
    /// Where the content came from.
    pub source: String,
    /// The retrieved text content.
    pub chunk: String,
    /// What kind of content `chunk` describes.
    pub modality: Modality,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

impl RetrievedResult {
    /// Build a result from a stored chunk and its distance to the query.
    pub fn from_distance(chunk: &DocumentChunk, distance: f32) -> Self {
        Self {
            source: chunk.source.clone(),
            chunk: chunk.chunk.clone(),
            modality: chunk.modality,
            score: crate::distance::score_from_distance(distance),
        }
    }
}

/// A generated answer and the results used to ground it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    /// The text produced by the language model.
    pub text: String,
    /// The retrieved results, in ranking order, that formed the context.
    pub supporting: Vec<RetrievedResult>,
}
