use crate::{Error, Result, Vector};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::BinaryHeap;

/// A single k-NN hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Slot in the index, equal to the record's position in the dataset
    pub position: usize,
    /// Euclidean distance to the query
    pub distance: f32,
}

/// Exact (brute force) L2 nearest-neighbour index.
///
/// Vectors keep the order they were built with; slot `i` always refers to
/// the `i`-th record. There is no insert or delete after [`FlatIndex::build`].
#[derive(Debug, Clone)]
pub struct FlatIndex {
    vectors: Vec<Vector>,
    dim: usize,
}

impl FlatIndex {
    /// Bulk-build the index. All vectors must share one dimension.
    pub fn build(vectors: Vec<Vector>) -> Result<Self> {
        let dim = vectors.first().map(Vector::dim).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.dim() != dim) {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: bad.dim(),
            });
        }
        tracing::debug!("Built flat L2 index with {} vectors of dim {}", vectors.len(), dim);
        Ok(Self { vectors, dim })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The `k` nearest vectors to `query`, ascending by distance.
    ///
    /// Ties are broken by position, so results are fully deterministic.
    /// Returns fewer than `k` hits when the index holds fewer vectors.
    pub fn query(&self, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {
        if self.vectors.is_empty() {
            return Err(Error::IndexEmpty);
        }
        if query.dim() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: query.dim(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        // Max-heap on (distance, position): the root is the current worst hit.
        let mut heap: BinaryHeap<(OrderedFloat<f32>, usize)> = BinaryHeap::with_capacity(k + 1);
        for (position, vector) in self.vectors.iter().enumerate() {
            let candidate = (OrderedFloat(vector.l2_distance(query)), position);
            if heap.len() < k {
                heap.push(candidate);
            } else if let Some(worst) = heap.peek() {
                if candidate < *worst {
                    heap.pop();
                    heap.push(candidate);
                }
            }
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|(distance, position)| Neighbor {
                position,
                distance: distance.into_inner(),
            })
            .collect())
    }
}
