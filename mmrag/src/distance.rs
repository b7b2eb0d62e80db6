//! Distance metrics and score normalization.
//!
//! A [`DistanceMetric`] decides how stores rank rows against a query vector.
//! Stores that compute distances natively (pgvector) use
//! [`pgvector_operator`](DistanceMetric::pgvector_operator); in-process
//! stores use [`distance`](DistanceMetric::distance), which follows the same
//! definitions so both rank identically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The distance function used to rank stored embeddings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// `1 - cos(a, b)`, in `[0, 2]`.
    #[default]
    Cosine,
    /// L2 distance, in `[0, inf)`.
    Euclidean,
    /// Negated dot product, as returned by pgvector's `<#>`.
    InnerProduct,
}

impl DistanceMetric {
    /// The pgvector operator that computes this distance.
    pub fn pgvector_operator(&self) -> &'static str {
        match self {
            Self::Cosine => "<=>",
            Self::Euclidean => "<->",
            Self::InnerProduct => "<#>",
        }
    }

    /// Compute the distance between two vectors of equal length.
    ///
    /// A zero-magnitude vector has cosine distance `1.0` to everything.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => 1.0 - cosine_similarity(a, b),
            Self::Euclidean => {
                a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
            }
            Self::InnerProduct => -dot(a, b),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cosine => f.write_str("cosine"),
            Self::Euclidean => f.write_str("euclidean"),
            Self::InnerProduct => f.write_str("inner_product"),
        }
    }
}

/// Convert a raw distance into a similarity score: `1 - distance`.
///
/// Under cosine distance, identical directions score `1.0`, orthogonal
/// vectors `0.0` and opposite vectors `-1.0`.
pub fn score_from_distance(distance: f32) -> f32 {
    1.0 - distance
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}
