//! Recursive [Whitted-style] ray tracer core.
//!
//! This crate contains the shading recursion of a classic ray tracer and
//! nothing else: geometry, cameras, and texture storage are supplied by the
//! caller through the [`scene::Intersector`], [`scene::Camera`], and
//! [`scene::SurfaceSampler`] traits. Given those, [`tracer::SceneTracer`]
//! resolves a single ray to a color (with reflection, transmission, and
//! direct lighting from directional and spot lights), and
//! [`renderer::render_frame()`] turns a whole camera frame into a
//! [`renderer::Rendering`].
//!
//! All color math is done in linear RGB with `f32` components and is not
//! clamped until the final sRGB conversion, so bright scenes accumulate
//! HDR values freely.
//!
//! [Whitted-style]: https://en.wikipedia.org/wiki/Ray_tracing_(graphics)#Recursive_ray_tracing_algorithm
//!
//! ## Package features
//!
//! * `"auto-threads"`: Use [`rayon`] to trace frame rows in parallel.
//!   This feature does not affect the result, only the time taken.

#![forbid(unsafe_code)]

// -------------------------------------------------------------------------------------------------
// Re-exports

/// Re-export the version of the `euclid` crate we're using, since its types
/// appear throughout our public API.
pub use euclid;

// -------------------------------------------------------------------------------------------------
// Modules

pub mod math;
pub mod raycast;
pub mod renderer;
pub mod scene;
pub mod tracer;

// -------------------------------------------------------------------------------------------------
// Errors

/// Error from constructing a [`tracer::SceneTracer`] with unusable options.
#[derive(Clone, Copy, Debug, PartialEq, displaydoc::Display)]
#[non_exhaustive]
pub enum ConfigError {
    /// `max_raycast_distance` must be finite and greater than zero, but was {0}
    MaxRaycastDistance(math::FreeCoordinate),
    /// `epsilon_bias` must be finite and greater than zero, but was {0}
    EpsilonBias(math::FreeCoordinate),
}

impl std::error::Error for ConfigError {}

/// Error from [`renderer::render_frame()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, displaydoc::Display)]
#[non_exhaustive]
pub enum RenderError {
    /// frame rendering was cancelled
    Cancelled,
}

impl std::error::Error for RenderError {}
