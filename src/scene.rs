//! Scene-facing data model and collaborator interfaces.
//!
//! The tracer core does not own scene construction; it reads materials and
//! lights through the value types here and performs geometry and texture
//! queries through the [`Intersector`], [`SurfaceSampler`], and [`Camera`]
//! traits, which a scene representation implements.

use crate::math::{FreeCoordinate, FreePoint, FreeVector, Rgb, UvPoint};
use crate::raycast::Ray;

// -------------------------------------------------------------------------------------------------

/// Identifies a texture held by a [`SurfaceSampler`].
///
/// The meaning of the contained value is up to the sampler implementation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TextureId(pub u32);

/// Shading coefficients and base color attached to a surface.
///
/// Coefficients must be ≥ 0; no upper bound is enforced, so callers may
/// deliberately exceed 1 for energy-boosting effects. Read-only during a
/// trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceMaterial {
    /// Flat color used when the surface has no texture (or the hit carries
    /// no texture coordinate).
    pub base_color: Rgb,
    /// Texture to sample for the base color instead of `base_color`.
    pub texture: Option<TextureId>,
    /// Diffuse (Lambertian) coefficient.
    pub lambert: f32,
    /// Mirror-reflection coefficient; > 0 spawns a reflected child ray and
    /// enables the specular terms.
    pub reflective: f32,
    /// Straight-transmission coefficient; > 0 spawns a transmitted child ray.
    pub transparent: f32,
    /// Phong specular coefficient.
    pub phong_coeff: f32,
    /// Phong specular exponent (“shininess”).
    pub phong_power: f32,
    /// Blinn-Phong specular coefficient.
    pub blinn_coeff: f32,
    /// Blinn-Phong specular exponent.
    pub blinn_power: f32,
}

impl Default for SurfaceMaterial {
    /// A black, non-reflective, non-transparent material with all shading
    /// coefficients zero and specular exponents of 1.
    fn default() -> Self {
        Self {
            base_color: Rgb::ZERO,
            texture: None,
            lambert: 0.0,
            reflective: 0.0,
            transparent: 0.0,
            phong_coeff: 0.0,
            phong_power: 1.0,
            blinn_coeff: 0.0,
            blinn_power: 1.0,
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Result of a nearest-hit intersection query; see [`Intersector::cast()`].
///
/// Produced fresh by each query and owned by the caller for the duration of
/// one recursion frame; the tracer never mutates or retains it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRecord {
    /// The point where the ray intersected the surface.
    pub point: FreePoint,
    /// Outward-facing unit surface normal at `point`.
    pub normal: FreeVector,
    /// The intersected surface's material, by value, so that shading never
    /// reaches back into a scene-graph object.
    pub material: SurfaceMaterial,
    /// Texture coordinate at `point`, if the surface is parameterized.
    pub uv: Option<UvPoint>,
}

// -------------------------------------------------------------------------------------------------

/// A single light in the scene.
///
/// The collection of these is scene-wide and read-only for the duration of a
/// frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSource {
    /// Kind-specific geometry of the light.
    pub kind: LightKind,
    /// Color of the emitted light.
    pub color: Rgb,
    /// Scalar brightness multiplier.
    pub intensity: f32,
    /// Disabled lights contribute nothing.
    pub enabled: bool,
}

/// The geometric variants of [`LightSource`].
///
/// Future kinds belong here; shading treats any kind it does not understand
/// as contributing zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Illuminates along a constant direction from infinitely far away;
    /// the light arrives travelling along `forward`.
    Directional {
        /// Direction the light points, away from its (infinitely distant) source.
        forward: FreeVector,
    },
    /// A positional light restricted to a cone, with a hard range cutoff and
    /// no distance falloff within it.
    Spot {
        /// Location of the light.
        position: FreePoint,
        /// Direction the cone points.
        forward: FreeVector,
        /// Points farther away than this receive nothing.
        range: FreeCoordinate,
        /// Half-angle of the cone, in degrees.
        cone_half_angle_deg: f32,
    },
}

// -------------------------------------------------------------------------------------------------

/// Nearest-hit ray-vs-geometry query, implemented by the scene representation.
///
/// How the hit is found (brute force, BVH, whatever) is entirely the
/// implementor's business; the tracer only consumes [`HitRecord`]s.
pub trait Intersector {
    /// Returns the nearest surface intersected by `ray` within `max_distance`
    /// of its origin, or [`None`] if the ray escapes.
    ///
    /// Must be safe to call concurrently; the tracer issues queries from
    /// multiple pixel tasks through `&self`.
    fn cast(&self, ray: Ray, max_distance: FreeCoordinate) -> Option<HitRecord>;
}

/// Any compatible function is an [`Intersector`]; convenient for tests and
/// analytic scenes.
impl<F> Intersector for F
where
    F: Fn(Ray, FreeCoordinate) -> Option<HitRecord>,
{
    fn cast(&self, ray: Ray, max_distance: FreeCoordinate) -> Option<HitRecord> {
        self(ray, max_distance)
    }
}

/// Texture lookup, implemented by whatever owns the image data.
pub trait SurfaceSampler {
    /// Samples the identified texture at `uv` (components nominally in
    /// the range 0 to 1) with bilinear filtering.
    fn sample_bilinear(&self, texture: TextureId, uv: UvPoint) -> Rgb;
}

/// A [`SurfaceSampler`] for scenes whose materials carry no texture handles.
///
/// Returns black for every lookup; it should never actually be consulted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NoTextures;

impl SurfaceSampler for NoTextures {
    fn sample_bilinear(&self, _texture: TextureId, _uv: UvPoint) -> Rgb {
        Rgb::ZERO
    }
}

/// Maps framebuffer pixels to world-space rays.
pub trait Camera {
    /// Returns the primary ray for the pixel at `(x, y)`.
    ///
    /// `(0, 0)` is the top-left pixel of the image; the projection model is
    /// the implementor's choice.
    fn pixel_to_ray(&self, x: u32, y: u32) -> Ray;
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::point2;

    #[test]
    fn closure_intersector() {
        fn always_miss(_: Ray, _: FreeCoordinate) -> Option<HitRecord> {
            None
        }
        assert_eq!(always_miss.cast(Ray::new([0., 0., 0.], [0., 0., -1.]), 10.0), None);
    }

    #[test]
    fn no_textures_sampler_is_black() {
        assert_eq!(
            NoTextures.sample_bilinear(TextureId(7), point2(0.5, 0.5)),
            Rgb::ZERO
        );
    }
}
