//! Approximate nearest-neighbour index backed by `hnsw_rs`
//!
//! Worth enabling for long documents; the flat index is exact and fast enough
//! for a few thousand chunks.

use hnsw_rs::hnsw::{Hnsw, Neighbour};
use hnsw_rs::prelude::*;

use crate::error::{Error, Result};

use super::index::{rank, validate_vectors, Neighbor, VectorIndex};

/// Upper bound on graph layers accepted by `hnsw_rs`
const MAX_LAYERS: usize = 16;

/// HNSW graph over L2 distance
pub struct HnswIndex {
    hnsw: Hnsw<'static, f32, DistL2>,
    len: usize,
    dimensions: usize,
    ef_search: usize,
}

impl HnswIndex {
    /// Build the graph from one vector per chunk
    pub fn build(
        vectors: Vec<Vec<f32>>,
        max_nb_connection: usize,
        ef_construction: usize,
        ef_search: usize,
    ) -> Result<Self> {
        let dimensions = validate_vectors(&vectors)?;
        let len = vectors.len();

        let nb_layer = if len > 1 {
            ((len as f32).log2().ceil() as usize).clamp(4, MAX_LAYERS)
        } else {
            4
        };

        let mut hnsw: Hnsw<'static, f32, DistL2> = Hnsw::new(
            max_nb_connection.max(2),
            len,
            nb_layer,
            ef_construction.max(1),
            DistL2 {},
        );

        for (id, vector) in vectors.iter().enumerate() {
            hnsw.insert((vector.as_slice(), id));
        }
        hnsw.set_searching_mode(true);

        tracing::debug!(
            "Built HNSW index: {} vectors, {} dimensions, {} layers",
            len,
            dimensions,
            nb_layer
        );

        Ok(Self {
            hnsw,
            len,
            dimensions,
            ef_search,
        })
    }
}

impl VectorIndex for HnswIndex {
    fn len(&self) -> usize {
        self.len
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimensions {
            return Err(Error::vector_index(format!(
                "Query has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let k = k.min(self.len);
        if k == 0 {
            return Ok(Vec::new());
        }

        let ef = self.ef_search.max(k);
        let neighbours: Vec<Neighbour> = self.hnsw.search(query, k, ef);

        let hits = neighbours
            .into_iter()
            .map(|n| Neighbor {
                id: n.d_id,
                distance: n.distance,
            })
            .collect();

        Ok(rank(hits, k))
    }

    fn name(&self) -> &str {
        "hnsw"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_exact_match() {
        let vectors: Vec<Vec<f32>> = (0..50)
            .map(|i| vec![i as f32, (i * 2) as f32, 1.0])
            .collect();
        let index = HnswIndex::build(vectors, 16, 200, 64).unwrap();

        let hits = index.search(&[10.0, 20.0, 1.0], 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, 10);
        assert!(hits[0].distance < 1e-3);
        assert!(hits[0].distance <= hits[1].distance);
    }

    #[test]
    fn test_k_is_capped_at_len() {
        let index = HnswIndex::build(vec![vec![0.0, 1.0], vec![1.0, 0.0]], 16, 200, 64).unwrap();
        assert_eq!(index.search(&[0.0, 1.0], 10).unwrap().len(), 2);
        assert!(index.search(&[0.0, 1.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = HnswIndex::build(vec![vec![0.0, 1.0]], 16, 200, 64).unwrap();
        assert!(index.search(&[0.0], 1).is_err());
    }
}
