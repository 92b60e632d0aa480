//! Page-wise text segmentation.
//!
//! Splits ordered page texts into fixed-size overlapping [`Chunk`]s.
//! Window sizes count characters, not bytes, so multibyte text segments
//! cleanly.

use crate::document::Chunk;

/// Split page texts into overlapping fixed-size chunks.
///
/// Pages whose trimmed text is empty are skipped. Each remaining page is
/// walked in a sliding window of `chunk_size` characters, advancing by
/// `chunk_size - overlap` per step. A tail smaller than `chunk_size / 3`
/// is space-joined onto the previous chunk when that chunk came from the
/// same page, after which the page is done.
///
/// Output order is stable: increasing by (page, position). No produced
/// chunk has empty text. Degenerate input (no pages, or all blank) yields
/// an empty `Vec`; callers treat that as a fatal ingestion condition.
///
/// `overlap` must be less than `chunk_size`; the walk never revisits a
/// window start, so progress is guaranteed.
pub fn segment(pages: &[String], chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();

    for (page_index, page_text) in pages.iter().enumerate() {
        if page_text.trim().is_empty() {
            continue;
        }
        let page_number = (page_index + 1) as u32;

        // Byte offset of every char boundary, so windows slice by chars.
        let mut bounds: Vec<usize> = page_text.char_indices().map(|(offset, _)| offset).collect();
        bounds.push(page_text.len());
        let page_len = bounds.len() - 1;

        let mut start = 0usize;
        while start < page_len {
            let end = (start + chunk_size).min(page_len);
            let window = page_text[bounds[start]..bounds[end]].trim();

            // Small tail folds into the previous chunk from the same page.
            if end - start < chunk_size / 3 {
                if let Some(prev) = chunks.last_mut() {
                    if prev.page_number == page_number {
                        if !window.is_empty() {
                            prev.text.push(' ');
                            prev.text.push_str(window);
                        }
                        break;
                    }
                }
            }

            if !window.is_empty() {
                chunks.push(Chunk { text: window.to_string(), page_number });
            }

            let next = end.saturating_sub(overlap);
            if next <= start {
                break;
            }
            start = next;
        }
    }

    chunks
}
