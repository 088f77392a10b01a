//! Scalar 2-D geometry helpers for posture classification.
//!
//! All angle math clamps the cosine argument to [-1, 1] before the inverse
//! cosine, and treats zero-norm operands as angle/ratio 0 instead of
//! propagating NaN. Floating-point overshoot on collinear vectors would
//! otherwise leave the valid `acos` domain.

/// A 2-D vector in image pixel space, y increasing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// The image "up" direction (y grows downward in image coordinates).
    pub const UP: Self = Self { x: 0.0, y: -1.0 };

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Euclidean distance between two points.
#[must_use]
pub fn euclidean_distance(a: Vec2, b: Vec2) -> f32 {
    a.sub(&b).norm()
}

/// Angle between two vectors in degrees.
///
/// Returns 0.0 when either vector has zero norm; the cosine argument is
/// clamped to [-1, 1] so the result is never NaN.
#[must_use]
pub fn angle_between_deg(a: Vec2, b: Vec2) -> f32 {
    let norms = a.norm() * b.norm();
    if norms <= f32::EPSILON {
        return 0.0;
    }
    let cos = (a.dot(&b) / norms).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}
