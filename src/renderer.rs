//! Whole-frame rendering on top of [`SceneTracer`]: pixel iteration, parallel
//! fan-out, and the output buffer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::math::{ImageSize, Rgb};
use crate::scene::{Camera, Intersector, SurfaceSampler};
use crate::tracer::{SceneTracer, TraceInfo};
use crate::RenderError;

// -------------------------------------------------------------------------------------------------

/// Cooperative cancellation flag for an in-flight frame.
///
/// Clone the token, hand one copy to [`render_frame()`], and call
/// [`cancel()`](Self::cancel) from anywhere (e.g. when a newer frame request
/// supersedes the running one). Cancellation is checked between rows, so a
/// cancelled render returns promptly without corrupting anything.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that renders holding this token stop at the next opportunity.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns whether [`cancel()`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// -------------------------------------------------------------------------------------------------

/// Image produced by [`render_frame()`].
#[derive(Clone, Debug, PartialEq)]
pub struct Rendering {
    /// Width and height of the image.
    pub size: ImageSize,
    /// Pixel colors in left-right then top-bottom raster order;
    /// linear and unclamped.
    pub data: Vec<Rgb>,
}

impl Rendering {
    /// Encodes the image as sRGB with 8 bits per component, clamping
    /// out-of-range (HDR) values.
    pub fn to_srgb8(&self) -> imgref::ImgVec<[u8; 3]> {
        imgref::Img::new(
            self.data.iter().map(|pixel| pixel.to_srgb8()).collect(),
            self.size.width as usize,
            self.size.height as usize,
        )
    }
}

impl From<Rendering> for imgref::ImgVec<Rgb> {
    fn from(value: Rendering) -> Self {
        imgref::Img::new(
            value.data,
            value.size.width as usize,
            value.size.height as usize,
        )
    }
}
impl<'a> From<&'a Rendering> for imgref::ImgRef<'a, Rgb> {
    fn from(value: &'a Rendering) -> Self {
        imgref::Img::new(
            value.data.as_slice(),
            value.size.width as usize,
            value.size.height as usize,
        )
    }
}

// -------------------------------------------------------------------------------------------------

/// Renders one frame: converts every pixel of `size` to a ray via `camera`,
/// resolves it against `tracer`'s scene, and writes the result once to its
/// slot in the output.
///
/// Each primary ray's accumulator is seeded with the configured
/// [`background`](crate::tracer::TracerOptions::background) color, so pixels
/// whose rays escape the scene are exactly that color.
///
/// With the `auto-threads` feature enabled, rows are traced in parallel on
/// [`rayon`]'s global thread pool; otherwise a single thread iterates them in
/// order. Either way the result is identical and deterministic.
pub fn render_frame<I, S, C>(
    tracer: &SceneTracer<'_, I, S>,
    camera: &C,
    size: ImageSize,
    cancel: &CancelToken,
) -> Result<(Rendering, TraceInfo), RenderError>
where
    I: Intersector + Sync,
    S: SurfaceSampler + Sync,
    C: Camera + Sync,
{
    let start = Instant::now();
    let (data, info) = render_impl(tracer, camera, size, cancel)?;
    log::debug!(
        "traced {w}×{h} frame in {elapsed:?} ({iq} intersection queries, {sq} shadow queries)",
        w = size.width,
        h = size.height,
        elapsed = start.elapsed(),
        iq = info.intersection_queries,
        sq = info.shadow_queries,
    );
    Ok((Rendering { size, data }, info))
}

#[cfg(feature = "auto-threads")]
fn render_impl<I, S, C>(
    tracer: &SceneTracer<'_, I, S>,
    camera: &C,
    size: ImageSize,
    cancel: &CancelToken,
) -> Result<(Vec<Rgb>, TraceInfo), RenderError>
where
    I: Intersector + Sync,
    S: SurfaceSampler + Sync,
    C: Camera + Sync,
{
    use rayon::iter::{IndexedParallelIterator as _, ParallelIterator as _};
    use rayon::slice::ParallelSliceMut as _;

    let width = size.width as usize;
    let background = tracer.options().background;
    let mut data = vec![Rgb::ZERO; width * size.height as usize];

    // width.max(1) is zero-sized-frame protection; the chunk size will be
    // wrong, but there will be zero chunks anyway.
    let info = data
        .par_chunks_mut(width.max(1))
        .enumerate()
        .map(|(y, raster_row)| {
            if cancel.is_cancelled() {
                return Err(RenderError::Cancelled);
            }
            let mut row_info = TraceInfo::default();
            for (x, pixel_out) in raster_row.iter_mut().enumerate() {
                let ray = camera.pixel_to_ray(x as u32, y as u32);
                let (pixel, pixel_info) = tracer.resolve_with_info(ray, background, 0);
                *pixel_out = pixel;
                row_info += pixel_info;
            }
            Ok(row_info)
        })
        .try_reduce(TraceInfo::default, |a, b| Ok(a + b))?;

    Ok((data, info))
}

#[cfg(not(feature = "auto-threads"))]
fn render_impl<I, S, C>(
    tracer: &SceneTracer<'_, I, S>,
    camera: &C,
    size: ImageSize,
    cancel: &CancelToken,
) -> Result<(Vec<Rgb>, TraceInfo), RenderError>
where
    I: Intersector + Sync,
    S: SurfaceSampler + Sync,
    C: Camera + Sync,
{
    let width = size.width as usize;
    let background = tracer.options().background;
    let mut data = vec![Rgb::ZERO; width * size.height as usize];
    let mut info = TraceInfo::default();

    for y in 0..size.height {
        if cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        for x in 0..size.width {
            let ray = camera.pixel_to_ray(x, y);
            let (pixel, pixel_info) = tracer.resolve_with_info(ray, background, 0);
            data[y as usize * width + x as usize] = pixel;
            info += pixel_info;
        }
    }

    Ok((data, info))
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FreeCoordinate;
    use crate::raycast::Ray;
    use crate::scene::{HitRecord, NoTextures, SurfaceMaterial};
    use crate::tracer::TracerOptions;
    use euclid::{point3, size2, vec3};
    use pretty_assertions::assert_eq;

    /// Orthographic straight-down camera encoding the pixel in the ray origin.
    struct PixelEncodingCamera;
    impl Camera for PixelEncodingCamera {
        fn pixel_to_ray(&self, x: u32, y: u32) -> Ray {
            Ray::new(
                point3(f64::from(x), f64::from(y), 1.0),
                vec3(0.0, 0.0, -1.0),
            )
        }
    }

    fn miss(_: Ray, _: FreeCoordinate) -> Option<HitRecord> {
        None
    }

    #[test]
    fn pixels_land_in_raster_order() {
        // Every ray hits a surface whose color encodes the ray's origin, so
        // the output directly shows which pixel got which trace.
        fn position_color(ray: Ray, _: FreeCoordinate) -> Option<HitRecord> {
            Some(HitRecord {
                point: point3(ray.origin.x, ray.origin.y, 0.0),
                normal: vec3(0.0, 0.0, 1.0),
                material: SurfaceMaterial {
                    base_color: Rgb::new(ray.origin.x as f32, ray.origin.y as f32, 0.0),
                    ..SurfaceMaterial::default()
                },
                uv: None,
            })
        }

        let intersector = position_color;
        let tracer =
            SceneTracer::new(&intersector, &NoTextures, &[], TracerOptions::default()).unwrap();

        let (rendering, info) = render_frame(
            &tracer,
            &PixelEncodingCamera,
            size2(2, 2),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(
            rendering.data,
            vec![
                Rgb::new(0.0, 0.0, 0.0),
                Rgb::new(1.0, 0.0, 0.0),
                Rgb::new(0.0, 1.0, 0.0),
                Rgb::new(1.0, 1.0, 0.0),
            ]
        );
        assert_eq!(info.intersection_queries, 4); // one primary ray per pixel, no branches
    }

    #[test]
    fn escaped_rays_are_background_colored() {
        let background = Rgb::new(0.0, 0.125, 0.25);
        let intersector = miss;
        let tracer = SceneTracer::new(
            &intersector,
            &NoTextures,
            &[],
            TracerOptions {
                background,
                ..TracerOptions::default()
            },
        )
        .unwrap();

        let (rendering, _) = render_frame(
            &tracer,
            &PixelEncodingCamera,
            size2(3, 1),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(rendering.data, vec![background; 3]);
    }

    #[test]
    fn cancelled_token_stops_the_frame() {
        let intersector = miss;
        let tracer =
            SceneTracer::new(&intersector, &NoTextures, &[], TracerOptions::default()).unwrap();

        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            render_frame(&tracer, &PixelEncodingCamera, size2(4, 4), &cancel).unwrap_err(),
            RenderError::Cancelled
        );
    }

    #[test]
    fn srgb8_encoding_and_imgref_views() {
        let rendering = Rendering {
            size: size2(2, 1),
            data: vec![Rgb::ZERO, Rgb::ONE],
        };

        let img = rendering.to_srgb8();
        assert_eq!((img.width(), img.height()), (2, 1));
        assert_eq!(img.buf(), &[[0, 0, 0], [255, 255, 255]]);

        let linear: imgref::ImgRef<'_, Rgb> = (&rendering).into();
        assert_eq!(linear[(1usize, 0usize)], Rgb::ONE);
    }
}
