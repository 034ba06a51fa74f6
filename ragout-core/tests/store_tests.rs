//! In-memory vector store tests: search ordering, namespace isolation,
//! idempotent upserts, and dimensionality enforcement.

use proptest::prelude::*;
use ragout_core::document::{Chunk, EmbeddedChunk};
use ragout_core::inmemory::InMemoryVectorStore;
use ragout_core::vectorstore::VectorStore;
use ragout_core::RagError;

fn embedded(source_id: &str, seq_index: usize, embedding: Vec<f32>) -> EmbeddedChunk {
    EmbeddedChunk {
        chunk: Chunk {
            source_id: source_id.to_string(),
            seq_index,
            text: format!("{source_id}#{seq_index}"),
        },
        embedding,
    }
}

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Search results come back in descending similarity order and the
        /// result count never exceeds `k` or the number of stored entries.
        #[test]
        fn results_ordered_descending_and_bounded_by_k(
            embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, stored) = rt.block_on(async {
                let store = InMemoryVectorStore::new();
                let chunks: Vec<EmbeddedChunk> = embeddings
                    .iter()
                    .enumerate()
                    .map(|(i, e)| embedded("doc.txt", i, e.clone()))
                    .collect();
                store.upsert("alice", &chunks).await.unwrap();
                let results = store.search("alice", &query, k).await.unwrap();
                (results, chunks.len())
            });

            prop_assert!(results.len() <= k);
            prop_assert!(results.len() <= stored);
            if k >= stored {
                prop_assert_eq!(results.len(), stored);
            }
            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}

#[tokio::test]
async fn namespaces_never_leak_into_each_other() {
    let store = InMemoryVectorStore::new();
    store.upsert("alice", &[embedded("hers.txt", 0, vec![1.0, 0.0])]).await.unwrap();
    store.upsert("bob", &[embedded("his.txt", 0, vec![1.0, 0.0])]).await.unwrap();

    let results = store.search("alice", &[1.0, 0.0], 10).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.source_id, "hers.txt");
}

#[tokio::test]
async fn search_in_unknown_namespace_is_empty_not_an_error() {
    let store = InMemoryVectorStore::new();

    let results = store.search("nobody", &[1.0, 0.0], 5).await.unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn reingesting_a_document_replaces_instead_of_duplicating() {
    let store = InMemoryVectorStore::new();
    let chunks = vec![
        embedded("doc.txt", 0, vec![1.0, 0.0]),
        embedded("doc.txt", 1, vec![0.0, 1.0]),
    ];

    store.upsert("alice", &chunks).await.unwrap();
    store.upsert("alice", &chunks).await.unwrap();

    let results = store.search("alice", &[1.0, 1.0], 10).await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn equal_scores_break_ties_by_ingestion_order() {
    let store = InMemoryVectorStore::new();
    // Identical embeddings, ingested across two upserts.
    store.upsert("alice", &[embedded("first.txt", 0, vec![1.0, 0.0])]).await.unwrap();
    store.upsert("alice", &[embedded("second.txt", 0, vec![1.0, 0.0])]).await.unwrap();

    let results = store.search("alice", &[1.0, 0.0], 2).await.unwrap();

    assert_eq!(results[0].chunk.source_id, "first.txt");
    assert_eq!(results[1].chunk.source_id, "second.txt");
}

#[tokio::test]
async fn replacement_keeps_the_original_ingestion_position() {
    let store = InMemoryVectorStore::new();
    store.upsert("alice", &[embedded("first.txt", 0, vec![1.0, 0.0])]).await.unwrap();
    store.upsert("alice", &[embedded("second.txt", 0, vec![1.0, 0.0])]).await.unwrap();
    // Re-ingest the first document; it should still win the tie.
    store.upsert("alice", &[embedded("first.txt", 0, vec![1.0, 0.0])]).await.unwrap();

    let results = store.search("alice", &[1.0, 0.0], 2).await.unwrap();

    assert_eq!(results[0].chunk.source_id, "first.txt");
}

#[tokio::test]
async fn upsert_with_mismatched_dimensions_is_rejected() {
    let store = InMemoryVectorStore::new();
    store.upsert("alice", &[embedded("doc.txt", 0, vec![1.0, 0.0])]).await.unwrap();

    let result = store.upsert("alice", &[embedded("doc.txt", 1, vec![1.0, 0.0, 0.5])]).await;

    assert!(matches!(
        result,
        Err(RagError::DimensionMismatch { expected: 2, actual: 3, .. })
    ));
}

#[tokio::test]
async fn query_with_mismatched_dimensions_is_rejected() {
    let store = InMemoryVectorStore::new();
    store.upsert("alice", &[embedded("doc.txt", 0, vec![1.0, 0.0])]).await.unwrap();

    let result = store.search("alice", &[1.0, 0.0, 0.0], 5).await;

    assert!(matches!(result, Err(RagError::DimensionMismatch { .. })));
}

#[tokio::test]
async fn each_namespace_establishes_its_own_dimensionality() {
    let store = InMemoryVectorStore::new();
    store.upsert("alice", &[embedded("a.txt", 0, vec![1.0, 0.0])]).await.unwrap();
    store.upsert("bob", &[embedded("b.txt", 0, vec![1.0, 0.0, 0.0])]).await.unwrap();

    assert_eq!(store.search("alice", &[1.0, 0.0], 1).await.unwrap().len(), 1);
    assert_eq!(store.search("bob", &[1.0, 0.0, 0.0], 1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_namespace_removes_everything_and_is_idempotent() {
    let store = InMemoryVectorStore::new();
    store.upsert("alice", &[embedded("doc.txt", 0, vec![1.0, 0.0])]).await.unwrap();

    store.delete_namespace("alice").await.unwrap();
    store.delete_namespace("alice").await.unwrap();

    let results = store.search("alice", &[1.0, 0.0], 5).await.unwrap();
    assert!(results.is_empty());
}
