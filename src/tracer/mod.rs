//! The recursive ray-color resolution core: [`SceneTracer`] and its
//! configuration.

use crate::math::{self, FreeCoordinate, Rgb};
use crate::raycast::Ray;
use crate::scene::{Intersector, LightSource, SurfaceSampler};
use crate::ConfigError;

mod lighting;
pub use lighting::light_contribution;

mod shadow;
pub use shadow::is_occluded;

// -------------------------------------------------------------------------------------------------

/// Configuration for a [`SceneTracer`].
///
/// All parameters are caller-supplied; none are hidden inside the core.
/// Invalid values are rejected by [`SceneTracer::new()`] rather than clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TracerOptions {
    /// Bound on reflection/transparency bounce count per pixel.
    /// A value of 0 disables tracing entirely (every resolution returns its
    /// input accumulator).
    pub max_depth: usize,

    /// Distance bound applied to every intersection and shadow query.
    /// Must be finite and greater than zero.
    pub max_raycast_distance: FreeCoordinate,

    /// Offset along the surface normal applied to secondary-ray origins so
    /// that they cannot re-hit the surface they started from (“shadow acne”).
    /// Must be finite and greater than zero.
    pub epsilon_bias: FreeCoordinate,

    /// Base illumination added once per shaded point, before any
    /// per-light contributions.
    pub ambient: Rgb,

    /// Color of rays that escape the scene; used by the frame renderer as the
    /// initial accumulator value for each primary ray.
    pub background: Rgb,
}

impl Default for TracerOptions {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_raycast_distance: 100.0,
            epsilon_bias: 1e-4,
            ambient: Rgb::ZERO,
            background: Rgb::ZERO,
        }
    }
}

impl TracerOptions {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_raycast_distance.is_finite() && self.max_raycast_distance > 0.0) {
            return Err(ConfigError::MaxRaycastDistance(self.max_raycast_distance));
        }
        if !(self.epsilon_bias.is_finite() && self.epsilon_bias > 0.0) {
            return Err(ConfigError::EpsilonBias(self.epsilon_bias));
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------

/// Performance counters from resolving one or more rays.
///
/// The [`Default`] value is the zero value; counters from separate pixels may
/// be summed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct TraceInfo {
    /// Number of nearest-hit queries issued to the [`Intersector`].
    pub intersection_queries: usize,
    /// Number of boolean occlusion probes issued for shadowing.
    pub shadow_queries: usize,
}

impl core::ops::Add for TraceInfo {
    type Output = Self;
    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}
impl core::ops::AddAssign for TraceInfo {
    fn add_assign(&mut self, other: Self) {
        self.intersection_queries += other.intersection_queries;
        self.shadow_queries += other.shadow_queries;
    }
}
impl core::iter::Sum for TraceInfo {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Self>,
    {
        let mut sum = Self::default();
        for part in iter {
            sum += part;
        }
        sum
    }
}

// -------------------------------------------------------------------------------------------------

/// Resolves the terminal color of rays cast into a scene, combining local
/// surface shading with recursively traced reflected and transmitted rays.
///
/// Borrows its collaborators and light list for the duration of a frame; the
/// scene must not be mutated while a tracer exists, which the borrows enforce.
/// Resolution is a pure function of its inputs, so one tracer may be shared
/// across threads freely (given `Sync` collaborators).
pub struct SceneTracer<'a, I, S> {
    intersector: &'a I,
    sampler: &'a S,
    lights: &'a [LightSource],
    options: TracerOptions,
}

// Non-derived implementations for no `I: Clone`/`S: Clone` bounds.
impl<I, S> Copy for SceneTracer<'_, I, S> {}
impl<I, S> Clone for SceneTracer<'_, I, S> {
    fn clone(&self) -> Self {
        *self
    }
}

// manual impl avoids `I: Debug`/`S: Debug` bounds and skips the collaborators
impl<I, S> core::fmt::Debug for SceneTracer<'_, I, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SceneTracer")
            .field("lights.len", &self.lights.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a, I, S> SceneTracer<'a, I, S>
where
    I: Intersector,
    S: SurfaceSampler,
{
    /// Validates `options` and constructs a tracer over the given collaborators.
    pub fn new(
        intersector: &'a I,
        sampler: &'a S,
        lights: &'a [LightSource],
        options: TracerOptions,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            intersector,
            sampler,
            lights,
            options,
        })
    }

    /// The configuration this tracer was constructed with.
    pub fn options(&self) -> &TracerOptions {
        &self.options
    }

    /// Determines the color of `ray`, given the color `accumulated` so far by
    /// the caller.
    ///
    /// The contract is additive accumulation: the caller passes its running
    /// total (for a primary ray, the background color) and the return value
    /// supersedes it. When `depth` has reached
    /// [`max_depth`](TracerOptions::max_depth), or the ray hits nothing,
    /// `accumulated` is returned unchanged.
    ///
    /// Each hit may spawn up to two child rays (reflected, transmitted), each
    /// resolved at `depth + 1`. A child resolution receives the *current*
    /// running total rather than zero, and its result is then scaled by the
    /// respective material coefficient and added on top; this deliberately
    /// double-counts earlier contributions into deeper recursion levels, for
    /// compatibility with established output.
    #[inline]
    pub fn resolve(&self, ray: Ray, accumulated: Rgb, depth: usize) -> Rgb {
        self.resolve_impl(ray, accumulated, depth, &mut TraceInfo::default())
    }

    /// As [`Self::resolve()`], but also reports performance counters.
    pub fn resolve_with_info(&self, ray: Ray, accumulated: Rgb, depth: usize) -> (Rgb, TraceInfo) {
        let mut info = TraceInfo::default();
        let color = self.resolve_impl(ray, accumulated, depth, &mut info);
        (color, info)
    }

    fn resolve_impl(
        &self,
        ray: Ray,
        mut accumulated: Rgb,
        depth: usize,
        info: &mut TraceInfo,
    ) -> Rgb {
        if depth >= self.options.max_depth {
            // Sole guarantee against unbounded recursion; deliberately placed
            // before the intersection query.
            return accumulated;
        }

        info.intersection_queries += 1;
        let Some(hit) = self
            .intersector
            .cast(ray, self.options.max_raycast_distance)
        else {
            return accumulated;
        };
        let material = &hit.material;

        // Base surface color, textured or flat.
        accumulated += match (material.texture, hit.uv) {
            (Some(texture), Some(uv)) => self.sampler.sample_bilinear(texture, uv),
            _ => material.base_color,
        };

        let incoming = ray.direction.normalize();
        let biased_point = hit.point + hit.normal * self.options.epsilon_bias;

        accumulated += lighting::aggregate_lights(
            self.intersector,
            self.lights,
            &self.options,
            material,
            biased_point,
            hit.normal,
            incoming,
            info,
        );

        if material.reflective > 0.0 {
            let reflected = Ray::new(biased_point, math::reflect(incoming, hit.normal));
            let branch = self.resolve_impl(reflected, accumulated, depth + 1, info);
            accumulated += branch * material.reflective;
        }

        if material.transparent > 0.0 {
            // Straight transmission: offset *against* the normal, direction unchanged.
            let transmitted = Ray::new(
                hit.point - hit.normal * self.options.epsilon_bias,
                incoming,
            );
            let branch = self.resolve_impl(transmitted, accumulated, depth + 1, info);
            accumulated += branch * material.transparent;
        }

        accumulated
    }
}

// -------------------------------------------------------------------------------------------------
