//! Rays, the query type handed to an [`Intersector`](crate::scene::Intersector).

use crate::math::{FreePoint, FreeVector};

/// A ray; a half-infinite line segment (sometimes used as finite by way of a
/// separate maximum-distance argument).
///
/// Immutable once constructed; spawning a reflected or transmitted ray always
/// builds a fresh value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The sole endpoint of the ray.
    pub origin: FreePoint,

    /// The direction in which the ray extends.
    ///
    /// Not required to be pre-normalized; consumers that need a unit vector
    /// normalize it themselves.
    pub direction: FreeVector,
}

impl Ray {
    /// Constructs a [`Ray`] from convertible types (e.g. tuples or 3-element arrays).
    /// Other than the use of [`Into`], this is equivalent to a struct literal.
    ///
    /// ```
    /// use whitted::euclid::{point3, vec3};
    /// use whitted::raycast::Ray;
    ///
    /// assert_eq!(
    ///     Ray::new([1., 2., 3.], [4., 5., 6.]),
    ///     Ray {
    ///         origin: point3(1., 2., 3.),
    ///         direction: vec3(4., 5., 6.),
    ///     }
    /// );
    /// ```
    pub fn new(origin: impl Into<FreePoint>, direction: impl Into<FreeVector>) -> Self {
        Self {
            origin: origin.into(),
            direction: direction.into(),
        }
    }

    /// Moves the ray's origin by `offset` without changing its direction.
    #[must_use]
    #[inline]
    pub fn translate(self, offset: FreeVector) -> Self {
        Self {
            origin: self.origin + offset,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::vec3;

    #[test]
    fn translate_moves_origin_only() {
        let ray = Ray::new([0., 0., 0.], [0., 0., -1.]);
        let moved = ray.translate(vec3(1., 2., 3.));
        assert_eq!(moved, Ray::new([1., 2., 3.], [0., 0., -1.]));
    }
}
