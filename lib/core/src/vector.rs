use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// An embedding: a fixed-length vector of `f32` components
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
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
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
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

    /// Euclidean norm.
    ///
    /// Falls back to a rescaled computation when squaring the components
    /// overflows or underflows `f32`.
    #[inline]
    pub fn norm(&self) -> f32 {
        let norm = crate::simd::norm(&self.data);
        if norm.is_finite() && norm > 0.0 {
            return norm;
        }
        match Rescaled::of(&self.data) {
            Some(r) => r.max * crate::simd::norm(&r.data),
            None => norm,
        }
    }

    /// Dot product with another vector of the same dimension
    pub fn dot(&self, other: &Vector) -> Result<f32> {
        self.check_dim(other)?;
        Ok(crate::simd::dot(&self.data, &other.data))
    }

    /// Cosine similarity with another vector.
    ///
    /// Fails on a dimension mismatch and on zero or non-finite norms instead
    /// of returning NaN. Components too large or too small to square in
    /// `f32` are handled by rescaling both operands first.
    pub fn cosine_similarity(&self, other: &Vector) -> Result<f32> {
        self.check_dim(other)?;

        if let Some(cosine) = cosine(&self.data, &other.data) {
            return Ok(cosine);
        }

        let a = Rescaled::of(&self.data).ok_or_else(|| degenerate("left", &self.data))?;
        let b = Rescaled::of(&other.data).ok_or_else(|| degenerate("right", &other.data))?;
        cosine(&a.data, &b.data).ok_or_else(|| degenerate("left", &self.data))
    }

    /// Copy scaled to unit length; zero vectors are returned unchanged
    #[must_use]
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv = 1.0 / norm;
            Self::new(self.data.iter().map(|x| x * inv).collect())
        } else {
            self.clone()
        }
    }

    fn check_dim(&self, other: &Vector) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(Error::InvalidDimension {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(())
    }
}

/// `None` unless both norms and the dot product are finite and non-zero
fn cosine(a: &[f32], b: &[f32]) -> Option<f32> {
    let norm_a = crate::simd::norm(a);
    let norm_b = crate::simd::norm(b);
    let denom = norm_a * norm_b;
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let dot_product = crate::simd::dot(a, b);
    if !dot_product.is_finite() {
        return None;
    }
    // Rounding can push parallel vectors a hair past 1.0
    Some((dot_product / denom).clamp(-1.0, 1.0))
}

fn degenerate(which: &str, data: &[f32]) -> Error {
    Error::DegenerateVector(format!("{which} operand has norm {}", crate::simd::norm(data)))
}

/// Components divided by the largest magnitude, so every entry is in [-1, 1]
struct Rescaled {
    max: f32,
    data: Vec<f32>,
}

impl Rescaled {
    /// `None` for zero vectors and vectors holding NaN or infinity
    fn of(data: &[f32]) -> Option<Self> {
        let max = data.iter().try_fold(0.0f32, |max, x| {
            x.is_finite().then(|| max.max(x.abs()))
        })?;
        if max == 0.0 {
            return None;
        }
        Some(Self {
            max,
            data: data.iter().map(|x| x / max).collect(),
        })
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl AsRef<[f32]> for Vector {
    fn as_ref(&self) -> &[f32] {
        &self.data
    }
}
