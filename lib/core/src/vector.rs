use serde::{Deserialize, Serialize};

/// A dense embedding vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self { data: vec![0.0; dim] }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Compute L2 (Euclidean) distance
    ///
    /// Two accumulators keep the loop pipelined for the 384-wide vectors
    /// sentence models produce.
    #[inline]
    pub fn l2_distance(&self, other: &Vector) -> f32 {
        if self.dim() != other.dim() {
            return f32::INFINITY;
        }

        let mut sum0 = 0.0f32;
        let mut sum1 = 0.0f32;
        let mut a = self.data.chunks_exact(2);
        let mut b = other.data.chunks_exact(2);
        for (x, y) in (&mut a).zip(&mut b) {
            let d0 = x[0] - y[0];
            let d1 = x[1] - y[1];
            sum0 += d0 * d0;
            sum1 += d1 * d1;
        }
        for (x, y) in a.remainder().iter().zip(b.remainder()) {
            let d = x - y;
            sum0 += d * d;
        }

        (sum0 + sum1).sqrt()
    }

    /// Normalize the vector to unit length. Zero vectors are left untouched.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}
