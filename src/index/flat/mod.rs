
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{Result, ReviewError};

/// Exhaustive L2 index over fixed-dimension vectors stored row-major.
///
/// Positions are assigned in insertion order and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<f32>,
}

/// A stored vector's position and its squared distance to a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub position: usize,
    pub distance: f32,
}

impl FlatIndex {
    #[inline]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.vectors.len() / self.dimension
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Stored vector at `position`
    #[inline]
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.vectors.get(start..end)
    }

    /// Append vectors. Either every vector is inserted or, on a dimension
    /// mismatch, none is.
    #[inline]
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(ReviewError::DimensionMismatch {
                expected: self.dimension,
                found: bad.len(),
            });
        }

        self.vectors.reserve(vectors.len() * self.dimension);
        for vector in vectors {
            self.vectors.extend_from_slice(vector);
        }
        Ok(())
    }

    /// The `k` nearest stored vectors, nearest first. Ties keep insertion order.
    /// Returns fewer than `k` neighbours when fewer vectors are stored.
    #[inline]
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbour>> {
        if query.len() != self.dimension {
            return Err(ReviewError::DimensionMismatch {
                expected: self.dimension,
                found: query.len(),
            });
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut neighbours: Vec<Neighbour> = self
            .vectors
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(position, stored)| Neighbour {
                position,
                distance: squared_l2(query, stored),
            })
            .collect();

        if k < neighbours.len() {
            neighbours.select_nth_unstable_by(k - 1, compare_neighbours);
            neighbours.truncate(k);
        }
        neighbours.sort_unstable_by(compare_neighbours);

        Ok(neighbours)
    }

    /// Check the structural invariants of a deserialized index
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(ReviewError::Persistence(
                "index dimension must be positive".to_string(),
            ));
        }
        if self.vectors.len() % self.dimension != 0 {
            return Err(ReviewError::Persistence(format!(
                "vector buffer of {} floats is not a multiple of dimension {}",
                self.vectors.len(),
                self.dimension
            )));
        }
        Ok(())
    }
}

fn compare_neighbours(a: &Neighbour, b: &Neighbour) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then(a.position.cmp(&b.position))
}

#[inline]
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
