//! Basic vector math and color arithmetic: coordinate type aliases, the [`Rgb`]
//! accumulation color, and the mirror-reflection helper used by shading and
//! ray spawning alike.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use euclid::{Point2D, Point3D, Size2D, Vector3D, vec3};

// -------------------------------------------------------------------------------------------------

/// Unit-of-measure type for scene (world) space coordinates.
#[derive(Debug, Eq, PartialEq)]
pub enum World {}

/// Unit-of-measure type for vectors that contain color channels.
#[derive(Debug, Eq, PartialEq)]
pub enum Intensity {}

/// Unit-of-measure type for texture coordinates.
#[derive(Debug, Eq, PartialEq)]
pub enum Uv {}

/// Unit-of-measure type for image (framebuffer) pixels.
#[derive(Debug, Eq, PartialEq)]
pub enum ImagePixel {}

/// Scalar type used for scene-space geometry.
pub type FreeCoordinate = f64;

/// A point in scene space.
pub type FreePoint = Point3D<FreeCoordinate, World>;

/// A vector in scene space.
pub type FreeVector = Vector3D<FreeCoordinate, World>;

/// A texture coordinate; components are nominally in the range 0 to 1.
pub type UvPoint = Point2D<f32, Uv>;

/// Width and height of an image in pixels.
pub type ImageSize = Size2D<u32, ImagePixel>;

// -------------------------------------------------------------------------------------------------

/// Reflects `direction` about the plane whose normal is `normal`;
/// that is, computes `d − 2(d·n)n`.
///
/// `normal` must be a unit vector for the result to be the mirror direction.
/// The magnitude of `direction` is preserved.
#[inline]
#[must_use]
pub fn reflect(direction: FreeVector, normal: FreeVector) -> FreeVector {
    direction - normal * (2.0 * direction.dot(normal))
}

// -------------------------------------------------------------------------------------------------

/// A floating-point linear RGB color value.
///
/// * Components are unclamped during accumulation; they may exceed 1 and the
///   consumer is responsible for tone mapping or clamping on output
///   (see [`Rgb::to_srgb8()`]).
/// * Color components are linear (gamma = 1), but use the same RGB primaries as
///   sRGB (Rec. 709).
///
/// Note: NaN components are representable but never produced by this crate's
/// own arithmetic on non-NaN inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(Vector3D<f32, Intensity>);

impl Rgb {
    /// Black; the constant equal to `Rgb::new(0., 0., 0.)`.
    pub const ZERO: Rgb = Rgb(vec3(0.0, 0.0, 0.0));
    /// Nominal white; the constant equal to `Rgb::new(1., 1., 1.)`.
    ///
    /// Note that brighter values may exist; the color system “supports HDR”.
    pub const ONE: Rgb = Rgb(vec3(1.0, 1.0, 1.0));

    /// Constructs a color from components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self(vec3(r, g, b))
    }

    /// Constructs a shade of gray (components all equal).
    #[inline]
    pub const fn from_luminance(luminance: f32) -> Self {
        Self::new(luminance, luminance, luminance)
    }

    /// Returns the red color component.
    #[inline]
    pub const fn red(self) -> f32 {
        self.0.x
    }
    /// Returns the green color component.
    #[inline]
    pub const fn green(self) -> f32 {
        self.0.y
    }
    /// Returns the blue color component.
    #[inline]
    pub const fn blue(self) -> f32 {
        self.0.z
    }

    /// Converts this color lossily to sRGB 8-bits-per-component color,
    /// clamping out-of-range components.
    #[inline]
    pub fn to_srgb8(self) -> [u8; 3] {
        [
            component_to_srgb8(self.0.x),
            component_to_srgb8(self.0.y),
            component_to_srgb8(self.0.z),
        ]
    }
}

impl Default for Rgb {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f32; 3]> for Rgb {
    #[inline]
    fn from(value: [f32; 3]) -> Self {
        Self(value.into())
    }
}
impl From<Rgb> for [f32; 3] {
    #[inline]
    fn from(value: Rgb) -> Self {
        value.0.into()
    }
}

impl Add for Rgb {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}
impl AddAssign for Rgb {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}
impl Sub for Rgb {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}
impl Mul<f32> for Rgb {
    type Output = Self;
    /// Multiplies this color value by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self(self.0 * scalar)
    }
}
impl Mul<Rgb> for Rgb {
    type Output = Self;
    /// Multiplies this color value by another in componentwise fashion.
    #[inline]
    fn mul(self, other: Rgb) -> Self {
        Self(self.0.component_mul(other.0))
    }
}
impl Sum for Rgb {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[inline]
fn component_to_srgb(c: f32) -> f32 {
    // Source: <https://en.wikipedia.org/wiki/SRGB#The_forward_transformation_(CIE_XYZ_to_sRGB)>
    if c <= 0.0031308 {
        c * (323. / 25.)
    } else {
        (211. * c.powf(5. / 12.) - 11.) / 200.
    }
}

#[inline]
fn component_to_srgb8(c: f32) -> u8 {
    // out of range values will be clamped by `as u8`
    (component_to_srgb(c) * 255.).round() as u8
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::vec3;

    #[test]
    fn reflect_at_forty_five_degrees() {
        let d: FreeVector = vec3(1.0, -1.0, 0.0);
        let n: FreeVector = vec3(0.0, 1.0, 0.0);
        assert_eq!(reflect(d, n), vec3(1.0, 1.0, 0.0));
    }

    #[test]
    fn reflect_preserves_grazing_direction() {
        let d: FreeVector = vec3(1.0, 0.0, 0.0);
        let n: FreeVector = vec3(0.0, 1.0, 0.0);
        assert_eq!(reflect(d, n), d);
    }

    #[test]
    fn color_arithmetic() {
        let a = Rgb::new(0.25, 0.5, 1.0);
        let b = Rgb::new(0.75, 0.5, 1.0);
        assert_eq!(a + b, Rgb::new(1.0, 1.0, 2.0));
        assert_eq!(a * 2.0, Rgb::new(0.5, 1.0, 2.0));
        assert_eq!(a * Rgb::new(0.0, 1.0, 0.5), Rgb::new(0.0, 0.5, 0.5));
        assert_eq!((a + b) - b, a);
        assert_eq!([a, b].into_iter().sum::<Rgb>(), a + b);
    }

    #[test]
    fn srgb8_endpoints() {
        assert_eq!(Rgb::ZERO.to_srgb8(), [0, 0, 0]);
        assert_eq!(Rgb::ONE.to_srgb8(), [255, 255, 255]);
        // Unclamped HDR values saturate rather than wrap.
        assert_eq!(Rgb::new(7.5, 7.5, 7.5).to_srgb8(), [255, 255, 255]);
    }

    #[test]
    fn srgb8_midpoint() {
        assert_eq!(Rgb::from_luminance(0.5).to_srgb8(), [188, 188, 188]);
    }
}
