//! Momentum vectors and the momentum-transfer observable
//!
//! The transport engine hands this core a pre-step and a post-step momentum
//! per step record. The classification observable is the absolute difference
//! of squared magnitudes:
//!
//! ```text
//! Δ = | |p_post|² − |p_pre|² |
//! ```
//!
//! A step whose Δ exceeds the configured threshold counts as a significant
//! momentum-transfer interaction.

use serde::{Deserialize, Serialize};

/// A 3-momentum vector in the engine's momentum units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Momentum3 {
    /// Momentum x-component
    pub px: f64,
    /// Momentum y-component
    pub py: f64,
    /// Momentum z-component
    pub pz: f64,
}

impl Momentum3 {
    /// Create a new momentum vector
    pub fn new(px: f64, py: f64, pz: f64) -> Self {
        Self { px, py, pz }
    }

    /// The zero vector (particle at rest)
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Squared magnitude: |p|² = p_x² + p_y² + p_z²
    #[inline]
    pub fn mag2(&self) -> f64 {
        self.px * self.px + self.py * self.py + self.pz * self.pz
    }

    /// Magnitude: |p| = √(p_x² + p_y² + p_z²)
    #[inline]
    pub fn mag(&self) -> f64 {
        self.mag2().sqrt()
    }

    /// Dot product: p · q
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.px * other.px + self.py * other.py + self.pz * other.pz
    }

    /// Scale by a constant factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.px * factor, self.py * factor, self.pz * factor)
    }
}

impl std::ops::Add for Momentum3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.px + other.px, self.py + other.py, self.pz + other.pz)
    }
}

impl std::ops::Sub for Momentum3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.px - other.px, self.py - other.py, self.pz - other.pz)
    }
}

impl std::ops::Neg for Momentum3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.px, -self.py, -self.pz)
    }
}

/// Momentum transfer between a pre-step and a post-step momentum
///
/// Computed as the absolute squared-magnitude difference, in momentum-squared
/// units (matching the configured threshold).
#[inline]
pub fn momentum_transfer(pre: &Momentum3, post: &Momentum3) -> f64 {
    (post.mag2() - pre.mag2()).abs()
}
