//! Nearest-neighbour indexes over chunk embeddings
//!
//! Vectors are addressed by their insertion position, which the store keeps
//! aligned with chunk positions.

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};

use super::hnsw::HnswIndex;

/// A search hit: vector position and its Euclidean distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the vector in the index
    pub id: usize,
    /// L2 distance to the query
    pub distance: f32,
}

/// Read-only similarity index built once per document
pub trait VectorIndex: Send + Sync {
    /// Number of stored vectors
    fn len(&self) -> usize;

    /// Whether the index holds no vectors
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension every stored vector has
    fn dimensions(&self) -> usize;

    /// Up to `k` nearest vectors by L2 distance, nearest first.
    /// Returns every vector when `k` exceeds `len()`.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Index backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Exact brute-force L2 search
    #[default]
    Flat,
    /// Approximate HNSW search
    Hnsw,
}

/// Build the configured index over `vectors`
pub fn build_index(config: &RetrievalConfig, vectors: Vec<Vec<f32>>) -> Result<Box<dyn VectorIndex>> {
    let index: Box<dyn VectorIndex> = match config.index {
        IndexKind::Flat => Box::new(FlatL2Index::build(vectors)?),
        IndexKind::Hnsw => Box::new(HnswIndex::build(
            vectors,
            config.hnsw_m,
            config.hnsw_ef_construction,
            config.hnsw_ef_search,
        )?),
    };
    Ok(index)
}

/// Check that `vectors` is non-empty, rectangular and finite; returns the dimension
pub(crate) fn validate_vectors(vectors: &[Vec<f32>]) -> Result<usize> {
    let dimensions = vectors
        .first()
        .map(Vec::len)
        .ok_or_else(|| Error::vector_index("Cannot build an index from zero vectors"))?;

    if dimensions == 0 {
        return Err(Error::vector_index("Vectors have zero dimensions"));
    }

    for (i, vector) in vectors.iter().enumerate() {
        if vector.len() != dimensions {
            return Err(Error::vector_index(format!(
                "Vector {} has wrong dimensions: expected {}, got {}",
                i,
                dimensions,
                vector.len()
            )));
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(Error::vector_index(format!(
                "Vector {} contains NaN or Infinity values",
                i
            )));
        }
    }

    Ok(dimensions)
}

/// Order hits by distance, then position, and keep the first `k`
pub(crate) fn rank(mut hits: Vec<Neighbor>, k: usize) -> Vec<Neighbor> {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
    hits.truncate(k);
    hits
}

/// Exact L2 index over a dense row-major matrix
pub struct FlatL2Index {
    /// One row per vector
    vectors: Array2<f32>,
}

impl FlatL2Index {
    /// Build from one vector per chunk
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimensions = validate_vectors(&vectors)?;
        let rows = vectors.len();
        let flat: Vec<f32> = vectors.into_iter().flatten().collect();

        let vectors = Array2::from_shape_vec((rows, dimensions), flat)
            .map_err(|e| Error::vector_index(e.to_string()))?;

        Ok(Self { vectors })
    }
}

impl VectorIndex for FlatL2Index {
    fn len(&self) -> usize {
        self.vectors.nrows()
    }

    fn dimensions(&self) -> usize {
        self.vectors.ncols()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimensions() {
            return Err(Error::vector_index(format!(
                "Query has {} dimensions, index has {}",
                query.len(),
                self.dimensions()
            )));
        }

        let query = ArrayView1::from(query);
        let squared = (&self.vectors - &query)
            .mapv(|x| x * x)
            .sum_axis(Axis(1));

        let hits = squared
            .iter()
            .enumerate()
            .map(|(id, d)| Neighbor {
                id,
                distance: d.sqrt(),
            })
            .collect();

        Ok(rank(hits, k))
    }

    fn name(&self) -> &str {
        "flat-l2"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![3.0, 4.0],
            vec![1.0, 0.0],
            vec![0.0, 2.0],
        ]
    }

    #[test]
    fn test_nearest_first() {
        let index = FlatL2Index::build(grid()).unwrap();
        let hits = index.search(&[0.0, 0.0], 3).unwrap();

        let ids: Vec<usize> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[1].distance, 1.0);
        assert_eq!(hits[2].distance, 2.0);
    }

    #[test]
    fn test_k_larger_than_len_returns_all() {
        let index = FlatL2Index::build(grid()).unwrap();
        let hits = index.search(&[3.0, 4.0], 10).unwrap();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].id, 1);
        assert_eq!(hits[0].distance, 0.0);
    }

    #[test]
    fn test_ties_break_by_position() {
        let index = FlatL2Index::build(vec![vec![1.0], vec![-1.0], vec![1.0]]).unwrap();
        let ids: Vec<usize> = index.search(&[0.0], 3).unwrap().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let index = FlatL2Index::build(grid()).unwrap();
        assert!(matches!(
            index.search(&[1.0, 2.0, 3.0], 1),
            Err(Error::VectorIndex(_))
        ));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(FlatL2Index::build(Vec::new()).is_err());
        assert!(FlatL2Index::build(vec![vec![]]).is_err());
        assert!(FlatL2Index::build(vec![vec![1.0, 2.0], vec![1.0]]).is_err());
        assert!(FlatL2Index::build(vec![vec![f32::NAN]]).is_err());
    }

    #[test]
    fn test_build_index_by_kind() {
        let mut config = RetrievalConfig::default();
        let flat = build_index(&config, grid()).unwrap();
        assert_eq!(flat.name(), "flat-l2");
        assert_eq!(flat.len(), 4);

        config.index = IndexKind::Hnsw;
        let hnsw = build_index(&config, grid()).unwrap();
        assert_eq!(hnsw.name(), "hnsw");
        assert_eq!(hnsw.dimensions(), 2);
    }
}
