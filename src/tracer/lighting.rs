//! Per-light direct illumination: Lambertian, Phong, and Blinn-Phong terms
//! with hard shadowing.

use crate::math::{self, FreePoint, FreeVector, Rgb};
use crate::scene::{Intersector, LightKind, LightSource, SurfaceMaterial};

use super::shadow;
use super::{TraceInfo, TracerOptions};

/// Sums the contributions of all enabled lights at a shaded point, on top of
/// the configured ambient base.
///
/// `hit_point` must already carry the epsilon bias away from the surface, so
/// that shadow rays cast from it cannot re-hit it.
#[allow(clippy::too_many_arguments)]
pub(crate) fn aggregate_lights<I: Intersector + ?Sized>(
    intersector: &I,
    lights: &[LightSource],
    options: &TracerOptions,
    material: &SurfaceMaterial,
    hit_point: FreePoint,
    normal: FreeVector,
    incoming_dir: FreeVector,
    info: &mut TraceInfo,
) -> Rgb {
    let mut sum = options.ambient;
    for light in lights.iter().filter(|light| light.enabled) {
        sum += light_contribution(
            intersector,
            options,
            material,
            light,
            hit_point,
            normal,
            incoming_dir,
            info,
        );
    }
    sum
}

/// Computes the color contribution of a single light source at a shaded point.
///
/// Every zero-contribution condition (the light facing away, the point out of
/// a spot light's range or cone, occlusion by another surface) is a zero
/// return value, never an error. `hit_point` must already carry the epsilon
/// bias away from the surface (see [`TracerOptions::epsilon_bias`]).
#[allow(clippy::too_many_arguments)]
pub fn light_contribution<I: Intersector + ?Sized>(
    intersector: &I,
    options: &TracerOptions,
    material: &SurfaceMaterial,
    light: &LightSource,
    hit_point: FreePoint,
    normal: FreeVector,
    incoming_dir: FreeVector,
    info: &mut TraceInfo,
) -> Rgb {
    match light.kind {
        LightKind::Directional { forward } => {
            let forward = forward.normalize();
            let light_dir = -forward;
            let cos_theta = light_dir.dot(normal) as f32;
            if cos_theta <= 0.0 {
                return Rgb::ZERO;
            }

            info.shadow_queries += 1;
            if shadow::is_occluded(intersector, hit_point, light_dir, options.max_raycast_distance)
            {
                // Fully shadowed; no attenuation or softening.
                return Rgb::ZERO;
            }

            light.color * (light.intensity * light_term(material, cos_theta, forward, normal, incoming_dir))
        }

        LightKind::Spot {
            position,
            forward,
            range,
            cone_half_angle_deg,
        } => {
            let to_light = position - hit_point;
            let distance = to_light.length();
            // Hard range cutoff; no distance falloff inside it.
            if !(distance > 0.0 && distance < range) {
                return Rgb::ZERO;
            }
            let light_dir = to_light / distance;
            let cos_theta = light_dir.dot(normal) as f32;
            if cos_theta <= 0.0 {
                return Rgb::ZERO;
            }

            let forward = forward.normalize();
            let cos_cone = incoming_dir.dot(-forward) as f32;
            if cos_cone <= 1.0 - cone_half_angle_deg / 180.0 {
                return Rgb::ZERO;
            }

            info.shadow_queries += 1;
            if shadow::is_occluded(intersector, hit_point, light_dir, options.max_raycast_distance)
            {
                return Rgb::ZERO;
            }

            light.color * (light.intensity * light_term(material, cos_theta, forward, normal, incoming_dir))
        }
    }
}

/// The scalar surface response to one light: Lambert plus, for reflective
/// materials, the Phong and Blinn-Phong specular terms.
fn light_term(
    material: &SurfaceMaterial,
    cos_theta: f32,
    light_forward: FreeVector,
    normal: FreeVector,
    incoming_dir: FreeVector,
) -> f32 {
    let mut term = 0.0;

    if material.lambert > 0.0 {
        term += material.lambert * cos_theta;
    }

    if material.reflective > 0.0 {
        if material.phong_coeff > 0.0 {
            let phong_dir = math::reflect(incoming_dir, normal);
            let t = phong_dir.dot(incoming_dir).max(0.0) as f32;
            term += material.reflective * t.powf(material.phong_power) * material.phong_coeff;
        }

        if material.blinn_coeff > 0.0 {
            let half = -light_forward - incoming_dir;
            let half_length = half.length();
            // A zero-length half-vector (light exactly opposite the view
            // direction) contributes nothing.
            if half_length > 0.0 {
                let t = (half / half_length).dot(normal).max(0.0) as f32;
                term += material.reflective * t.powf(material.blinn_power) * material.blinn_coeff;
            }
        }
    }

    term
}

// -------------------------------------------------------------------------------------------------
