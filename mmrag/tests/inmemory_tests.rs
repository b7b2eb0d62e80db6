//! Property tests for in-memory vector store ranking.

use std::collections::HashMap;

use mmrag::distance::DistanceMetric;
use mmrag::document::{DocumentChunk, Modality};
use mmrag::inmemory::InMemoryVectorStore;
use mmrag::vectorstore::VectorStore;
use proptest::prelude::*;

const DIM: usize = 16;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-3 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

/// Generate chunks with unique sources and normalized embeddings.
fn arb_chunks(dim: usize) -> impl Strategy<Value = Vec<DocumentChunk>> {
    proptest::collection::vec(("[a-z ]{5,30}", any::<bool>(), arb_normalized_embedding(dim)), 1..20)
        .prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (text, is_image, embedding))| {
                    let modality = if is_image { Modality::Image } else { Modality::Text };
                    DocumentChunk::new(format!("doc_{i}"), text, modality, embedding)
                })
                .collect()
        })
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Runtime::new().unwrap().block_on(future)
}

/// *For any* set of stored chunks, a search returns at most `k` results
/// ordered by non-increasing score, and each score is `1 - cosine distance`
/// to the stored embedding.
mod prop_nearest_ordering {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_bounded_and_scored(
            chunks in arb_chunks(DIM),
            query in arb_normalized_embedding(DIM),
            k in 1usize..25,
        ) {
            let results = block_on(async {
                let store = InMemoryVectorStore::new();
                store.insert(&chunks).await.unwrap();
                store.nearest(&query, k).await.unwrap()
            });

            prop_assert!(results.len() <= k);
            prop_assert_eq!(results.len(), k.min(chunks.len()));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }

            let by_source: HashMap<&str, &DocumentChunk> =
                chunks.iter().map(|c| (c.source.as_str(), c)).collect();
            for result in &results {
                let stored = by_source[result.source.as_str()];
                let distance = DistanceMetric::Cosine.distance(&query, &stored.embedding);
                prop_assert!((result.score - (1.0 - distance)).abs() < 1e-6);
                prop_assert_eq!(&result.chunk, &stored.chunk);
                prop_assert_eq!(result.modality, stored.modality);
            }
        }

        #[test]
        fn identical_embedding_scores_one(
            chunks in arb_chunks(DIM),
            pick in any::<prop::sample::Index>(),
        ) {
            let target = &chunks[pick.index(chunks.len())];
            let results = block_on(async {
                let store = InMemoryVectorStore::new();
                store.insert(&chunks).await.unwrap();
                store.nearest(&target.embedding, chunks.len()).await.unwrap()
            });

            let hit = results.iter().find(|r| r.source == target.source).unwrap();
            prop_assert!((hit.score - 1.0).abs() < 1e-5, "score was {}", hit.score);
            prop_assert!((results[0].score - 1.0).abs() < 1e-5);
        }

        #[test]
        fn repeated_queries_are_identical(
            chunks in arb_chunks(DIM),
            query in arb_normalized_embedding(DIM),
            k in 1usize..10,
        ) {
            let (first, second) = block_on(async {
                let store = InMemoryVectorStore::new();
                store.insert(&chunks).await.unwrap();
                let first = store.nearest(&query, k).await.unwrap();
                let second = store.nearest(&query, k).await.unwrap();
                (first, second)
            });
            prop_assert_eq!(first, second);
        }
    }
}

#[tokio::test]
async fn duplicate_embeddings_keep_insertion_order() {
    let store = InMemoryVectorStore::new();
    let embedding = vec![0.6, 0.8];
    store
        .insert(&[
            DocumentChunk::new("second.txt", "b", Modality::Text, embedding.clone()),
            DocumentChunk::new("first.txt", "a", Modality::Text, embedding.clone()),
            DocumentChunk::new("third.png", "c", Modality::Image, embedding.clone()),
        ])
        .await
        .unwrap();

    let results = store.nearest(&embedding, 3).await.unwrap();
    let sources: Vec<_> = results.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(sources, ["second.txt", "first.txt", "third.png"]);
}
