//! Shadow-ray occlusion probing.

use crate::math::{FreeCoordinate, FreePoint, FreeVector};
use crate::raycast::Ray;
use crate::scene::Intersector;

/// Returns whether any surface blocks `direction` from `origin` within
/// `max_distance`.
///
/// A pure boolean probe: no recursion and no material inspection. `origin`
/// must already be offset away from the surface the probe starts at (see
/// [`TracerOptions::epsilon_bias`](super::TracerOptions::epsilon_bias)), or
/// the surface may shadow itself.
#[inline]
pub fn is_occluded<I: Intersector + ?Sized>(
    intersector: &I,
    origin: FreePoint,
    direction: FreeVector,
    max_distance: FreeCoordinate,
) -> bool {
    intersector.cast(Ray::new(origin, direction), max_distance).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{HitRecord, SurfaceMaterial};
    use euclid::{point3, vec3};

    #[test]
    fn occlusion_is_a_plain_hit_test() {
        fn wall(ray: Ray, max_distance: FreeCoordinate) -> Option<HitRecord> {
            // Wall at x = 3, hit by +X rays within range.
            let t = 3.0 - ray.origin.x;
            (ray.direction.x > 0.0 && t <= max_distance).then(|| HitRecord {
                point: point3(3.0, ray.origin.y, ray.origin.z),
                normal: vec3(-1.0, 0.0, 0.0),
                material: SurfaceMaterial::default(),
                uv: None,
            })
        }

        let origin = point3(0.0, 0.0, 0.0);
        assert!(is_occluded(&wall, origin, vec3(1.0, 0.0, 0.0), 100.0));
        assert!(!is_occluded(&wall, origin, vec3(-1.0, 0.0, 0.0), 100.0));
        // The distance bound is passed through to the intersector.
        assert!(!is_occluded(&wall, origin, vec3(1.0, 0.0, 0.0), 2.0));
    }
}
