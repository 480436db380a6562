//! Fundamental geometric types for anchor modelling.

use nalgebra::{DVector, Vector2};
use serde::{Deserialize, Serialize};

/// Planar translation of the anchor point in metres.
///
/// The `y` axis is the direction the external load acts along; `x` is
/// perpendicular to it in the plane of the anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    /// Displacement component along the X axis.
    pub x: f64,
    /// Displacement component along the Y (load) axis.
    pub y: f64,
}

impl Displacement {
    /// Create a [`Displacement`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the displacement into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean magnitude of the displacement.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.to_vector().norm()
    }
}

impl From<Vector2<f64>> for Displacement {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Displacement> for Vector2<f64> {
    fn from(value: Displacement) -> Self {
        value.to_vector()
    }
}

impl From<Displacement> for DVector<f64> {
    fn from(value: Displacement) -> Self {
        DVector::from_column_slice(&[value.x, value.y])
    }
}

/// An elastic tension member running from the anchor point to a fixed attachment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unstretched rest length in metres.
    pub length: f64,
    /// Initial direction from the anchor point to the far end, in radians.
    pub angle: f64,
}

impl Member {
    /// Create a [`Member`] with explicit rest length and angle.
    #[must_use]
    pub const fn new(length: f64, angle: f64) -> Self {
        Self { length, angle }
    }

    /// Vector from the far end to the anchor point after the anchor moves by `displacement`.
    ///
    /// The first component is the sine-like axis and the second the cosine-like
    /// axis, so an angle of zero points straight along the load.
    #[must_use]
    pub fn span(&self, displacement: Displacement) -> Vector2<f64> {
        let (sin, cos) = self.angle.sin_cos();
        Vector2::new(
            self.length * sin + displacement.x,
            self.length * cos + displacement.y,
        )
    }

    /// Change in length when the anchor moves by `displacement`.
    ///
    /// Positive when the member is stretched beyond its rest length.
    #[must_use]
    pub fn elongation(&self, displacement: Displacement) -> f64 {
        self.span(displacement).norm() - self.length
    }

    /// Direction of the member after the anchor moves by `displacement`.
    #[must_use]
    pub fn angle_after(&self, displacement: Displacement) -> f64 {
        let span = self.span(displacement);
        span.x.atan2(span.y)
    }
}

/// Convenience helper for creating [`Displacement`] instances.
///
/// # Examples
/// ```
/// use anchorx::displacement;
///
/// let delta = displacement(0.0, 0.01);
/// assert_eq!(delta.y, 0.01);
/// ```
#[must_use]
pub const fn displacement(x: f64, y: f64) -> Displacement {
    Displacement::new(x, y)
}

/// Convenience helper for creating [`Member`] instances.
///
/// # Examples
/// ```
/// use anchorx::member;
///
/// let sling = member(0.5, std::f64::consts::FRAC_PI_6);
/// assert_eq!(sling.length, 0.5);
/// ```
#[must_use]
pub const fn member(length: f64, angle: f64) -> Member {
    Member::new(length, angle)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn displacement_from_vector() {
        let vector = Vector2::new(0.1, -0.2);
        let displacement = Displacement::from(vector);
        assert_eq!(displacement, Displacement::new(0.1, -0.2));
        let back: Vector2<f64> = displacement.into();
        assert_eq!(back, vector);
    }

    #[test]
    fn displacement_defaults_to_zero() {
        assert_eq!(Displacement::default(), displacement(0.0, 0.0));
        assert_relative_eq!(displacement(3.0, 4.0).magnitude(), 5.0);
    }

    #[test]
    fn member_is_unstretched_at_rest() {
        let sling = member(0.8, -FRAC_PI_4);
        assert_relative_eq!(sling.elongation(Displacement::default()), 0.0, epsilon = 1.0e-15);
        assert_relative_eq!(sling.angle_after(Displacement::default()), -FRAC_PI_4);
    }

    #[test]
    fn displacement_along_member_stretches_it() {
        let vertical = member(1.0, 0.0);
        assert_relative_eq!(vertical.elongation(displacement(0.0, 0.25)), 0.25);
        assert_relative_eq!(vertical.elongation(displacement(0.0, -0.25)), -0.25);
        assert_relative_eq!(vertical.angle_after(displacement(0.0, 0.25)), 0.0);
    }

    #[test]
    fn sideways_displacement_rotates_member() {
        let vertical = member(1.0, 0.0);
        let moved = displacement(1.0, -1.0);
        assert_relative_eq!(vertical.angle_after(moved), FRAC_PI_2);
        assert_relative_eq!(vertical.elongation(moved), 0.0);
    }
}
