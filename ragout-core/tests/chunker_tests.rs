//! Property tests for chunk reconstruction and ordering.

use proptest::prelude::*;
use ragout_core::{Chunker, Document, FixedSizeChunker};

/// Drop the first `n` characters of `text`.
fn skip_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((offset, _)) => &text[offset..],
        None => "",
    }
}

proptest! {
    /// Concatenating the chunks, minus the shared overlap of every chunk
    /// after the first, recovers the original text exactly.
    #[test]
    fn chunks_reconstruct_the_original_text(
        text in ".{0,400}",
        (max_size, overlap) in (1usize..60).prop_flat_map(|m| (Just(m), 0usize..m)),
    ) {
        let chunker = FixedSizeChunker::new(max_size, overlap).unwrap();
        let chunks = chunker.chunk(&Document::new("doc.txt", text.as_str())).unwrap();

        let mut reconstructed = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.seq_index, i);
            prop_assert!(chunk.text.chars().count() <= max_size);
            if i == 0 {
                reconstructed.push_str(&chunk.text);
            } else {
                reconstructed.push_str(skip_chars(&chunk.text, overlap));
            }
        }

        prop_assert_eq!(reconstructed, text.clone());
        prop_assert_eq!(chunks.is_empty(), text.is_empty());
    }
}

#[test]
fn five_thousand_chars_with_overlap_yield_six_chunks() {
    let chunker = FixedSizeChunker::new(1000, 100).unwrap();
    let text = "A".repeat(5000);

    let chunks = chunker.chunk(&Document::new("big.txt", text)).unwrap();

    // Windows advance by 900 characters: 0, 900, ..., 4500.
    assert_eq!(chunks.len(), 6);
    assert!(chunks.iter().all(|chunk| chunk.text.chars().count() <= 1000));
    assert_eq!(chunks[5].text.len(), 500);
}

#[test]
fn sequence_indices_are_contiguous_from_zero() {
    let chunker = FixedSizeChunker::new(10, 3).unwrap();
    let text = "the quick brown fox jumps over the lazy dog";

    let chunks = chunker.chunk(&Document::new("fox.txt", text)).unwrap();

    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.seq_index, i);
        assert_eq!(chunk.source_id, "fox.txt");
    }
}
