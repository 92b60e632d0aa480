//! Exact nearest-neighbor index over embedding vectors.
//!
//! Per-document corpora are small (tens to low thousands of chunks), so
//! the index is a brute-force scan under squared Euclidean distance —
//! exact results, no approximation tunables. Build once, query many
//! times; rebuilding means constructing a fresh index.

use crate::error::{RagError, Result};

/// A neighbor returned by [`VectorIndex::search`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the matched vector in build order.
    pub position: usize,
    /// Squared L2 distance to the query (lower is closer).
    pub distance: f32,
}

/// Convert a squared L2 distance into a similarity score.
///
/// `1 / (1 + d)`: monotonically decreasing in distance, bounded in
/// `(0, 1]`, never zero or negative.
pub fn similarity_score(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

/// An immutable exact k-NN index under squared L2 distance.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_rag::index::VectorIndex;
///
/// let index = VectorIndex::build(embeddings)?;
/// let neighbors = index.search(&query, 5)?;
/// ```
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Build an index from embedding vectors.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Index`] if the vectors do not all share one
    /// dimensionality. An empty input builds an empty index.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimensions = vectors.first().map(|v| v.len()).unwrap_or(0);
        for (position, vector) in vectors.iter().enumerate() {
            if vector.len() != dimensions {
                return Err(RagError::Index(format!(
                    "vector {position} has dimension {}, expected {dimensions}",
                    vector.len()
                )));
            }
        }
        Ok(Self { dimensions, vectors })
    }

    /// Number of indexed vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimensionality shared by all indexed vectors (0 when empty).
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Find the `k` nearest vectors to `query`.
    ///
    /// `k` is clamped to the index size; an empty index returns an empty
    /// result set. Neighbors are ordered ascending by distance, ties
    /// broken by insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Index`] if the query dimensionality does not
    /// match the index.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(RagError::Index(format!(
                "query has dimension {}, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| Neighbor {
                position,
                distance: squared_l2(query, vector),
            })
            .collect();

        // Stable sort keeps insertion order for equal distances.
        neighbors
            .sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
        neighbors.truncate(k.min(self.vectors.len()));
        Ok(neighbors)
    }
}

/// Squared Euclidean distance between two equal-length vectors.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
