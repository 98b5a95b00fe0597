//! Fused Sobel X, Y + magnitude preprocessing.
//!
//! One traversal of an 8-bit grayscale raster produces the horizontal
//! derivative, vertical derivative, and gradient magnitude as three packed
//! float rasters. Border pixels (first/last row, first/last column) are
//! forced to zero rather than one-sided differenced. Interior rows are
//! independent and are partitioned across worker threads; the inner loop
//! processes eight pixels at a time when the `simd` feature is enabled.

use crate::image::{GradientView, ImageView};
use crate::trace::trace_scope;
use crate::util::{EdgeMatchError, EdgeMatchResult};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "simd")]
use wide::f32x8;

#[cfg(feature = "simd")]
const LANES: usize = 8;

// Sobel 3x3 kernels:
// Kx = [-1 0 1; -2 0 2; -1 0 1]
// Ky = [-1 -2 -1; 0 0 0; 1 2 1]

/// Owned gradient rasters of one image.
pub struct GradientField {
    width: usize,
    height: usize,
    dx: Vec<f32>,
    dy: Vec<f32>,
    mag: Vec<f32>,
}

impl GradientField {
    /// Computes Sobel gradients and magnitude for an 8-bit grayscale image.
    ///
    /// Requires `width >= 3` and `height >= 3`; the source stride may exceed
    /// the width. Outputs are densely packed.
    pub fn compute(src: ImageView<'_>) -> EdgeMatchResult<Self> {
        let width = src.width();
        let height = src.height();
        let mut dx = vec![0.0f32; width * height];
        let mut dy = vec![0.0f32; width * height];
        let mut mag = vec![0.0f32; width * height];
        compute_gradient_into(src, &mut dx, &mut dy, &mut mag)?;
        Ok(Self {
            width,
            height,
            dx,
            dy,
            mag,
        })
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the packed horizontal-derivative raster.
    pub fn dx(&self) -> &[f32] {
        &self.dx
    }

    /// Returns the packed vertical-derivative raster.
    pub fn dy(&self) -> &[f32] {
        &self.dy
    }

    /// Returns the packed gradient-magnitude raster.
    pub fn mag(&self) -> &[f32] {
        &self.mag
    }

    /// Borrows all three rasters as a [`GradientView`] for the scoring
    /// kernels.
    pub fn as_view(&self) -> GradientView<'_> {
        GradientView::new(&self.dx, &self.dy, &self.mag, self.width, self.height)
            .expect("owned rasters are packed")
    }
}

/// Computes Sobel gradients into caller-owned packed rasters.
///
/// Each output slice must have length `width * height`. Every element of the
/// outputs is written: borders with zero, interior with the convolution
/// result, so the buffers need not be pre-cleared.
pub fn compute_gradient_into(
    src: ImageView<'_>,
    out_dx: &mut [f32],
    out_dy: &mut [f32],
    out_mag: &mut [f32],
) -> EdgeMatchResult<()> {
    let width = src.width();
    let height = src.height();
    if width < 3 || height < 3 {
        return Err(EdgeMatchError::InvalidDimensions { width, height });
    }
    let len = width * height;
    for (slice, context) in [
        (&*out_dx, "gradient dx output"),
        (&*out_dy, "gradient dy output"),
        (&*out_mag, "gradient magnitude output"),
    ] {
        if slice.len() != len {
            return Err(EdgeMatchError::LengthMismatch {
                expected: len,
                got: slice.len(),
                context,
            });
        }
    }

    let _span = trace_scope!("compute_gradient", width = width, height = height);

    // Border rows
    let last = (height - 1) * width;
    out_dx[..width].fill(0.0);
    out_dy[..width].fill(0.0);
    out_mag[..width].fill(0.0);
    out_dx[last..].fill(0.0);
    out_dy[last..].fill(0.0);
    out_mag[last..].fill(0.0);

    let interior_dx = &mut out_dx[width..last];
    let interior_dy = &mut out_dy[width..last];
    let interior_mag = &mut out_mag[width..last];

    #[cfg(feature = "rayon")]
    interior_dx
        .par_chunks_exact_mut(width)
        .zip(interior_dy.par_chunks_exact_mut(width))
        .zip(interior_mag.par_chunks_exact_mut(width))
        .enumerate()
        .for_each(|(i, ((dx_row, dy_row), mag_row))| {
            sobel_row(src, i + 1, dx_row, dy_row, mag_row);
        });

    #[cfg(not(feature = "rayon"))]
    interior_dx
        .chunks_exact_mut(width)
        .zip(interior_dy.chunks_exact_mut(width))
        .zip(interior_mag.chunks_exact_mut(width))
        .enumerate()
        .for_each(|(i, ((dx_row, dy_row), mag_row))| {
            sobel_row(src, i + 1, dx_row, dy_row, mag_row);
        });

    Ok(())
}

/// Convolves one interior row; `y` is in `1..height-1`.
fn sobel_row(
    src: ImageView<'_>,
    y: usize,
    dx_row: &mut [f32],
    dy_row: &mut [f32],
    mag_row: &mut [f32],
) {
    let width = src.width();
    let r0 = src.row(y - 1).expect("row above interior row");
    let r1 = src.row(y).expect("interior row");
    let r2 = src.row(y + 1).expect("row below interior row");

    // Border columns
    dx_row[0] = 0.0;
    dy_row[0] = 0.0;
    mag_row[0] = 0.0;
    dx_row[width - 1] = 0.0;
    dy_row[width - 1] = 0.0;
    mag_row[width - 1] = 0.0;

    let mut x = 1usize;

    #[cfg(feature = "simd")]
    {
        let two = f32x8::splat(2.0);
        while x + LANES < width - 1 {
            let r0_m1 = load_u8x8_as_f32x8(&r0[x - 1..]);
            let r0_0 = load_u8x8_as_f32x8(&r0[x..]);
            let r0_p1 = load_u8x8_as_f32x8(&r0[x + 1..]);
            let r1_m1 = load_u8x8_as_f32x8(&r1[x - 1..]);
            let r1_p1 = load_u8x8_as_f32x8(&r1[x + 1..]);
            let r2_m1 = load_u8x8_as_f32x8(&r2[x - 1..]);
            let r2_0 = load_u8x8_as_f32x8(&r2[x..]);
            let r2_p1 = load_u8x8_as_f32x8(&r2[x + 1..]);

            // Gx = -r0_m1 + r0_p1 - 2*r1_m1 + 2*r1_p1 - r2_m1 + r2_p1
            let gx = (r1_p1 - r1_m1).mul_add(two, (r0_p1 - r0_m1) + (r2_p1 - r2_m1));
            // Gy = -r0_m1 - 2*r0_0 - r0_p1 + r2_m1 + 2*r2_0 + r2_p1
            let gy = (r2_0 - r0_0).mul_add(two, (r2_m1 - r0_m1) + (r2_p1 - r0_p1));
            let mag = gx.mul_add(gx, gy * gy).sqrt();

            dx_row[x..x + LANES].copy_from_slice(&gx.to_array());
            dy_row[x..x + LANES].copy_from_slice(&gy.to_array());
            mag_row[x..x + LANES].copy_from_slice(&mag.to_array());
            x += LANES;
        }
    }

    // Scalar remainder (entire interior when SIMD is disabled)
    while x < width - 1 {
        let gx = -(r0[x - 1] as f32) + r0[x + 1] as f32 - 2.0 * r1[x - 1] as f32
            + 2.0 * r1[x + 1] as f32
            - r2[x - 1] as f32
            + r2[x + 1] as f32;
        let gy = -(r0[x - 1] as f32) - 2.0 * r0[x] as f32 - r0[x + 1] as f32
            + r2[x - 1] as f32
            + 2.0 * r2[x] as f32
            + r2[x + 1] as f32;
        dx_row[x] = gx;
        dy_row[x] = gy;
        mag_row[x] = (gx * gx + gy * gy).sqrt();
        x += 1;
    }
}

/// Load 8 u8 values and convert to f32x8.
#[cfg(feature = "simd")]
#[inline]
fn load_u8x8_as_f32x8(slice: &[u8]) -> f32x8 {
    f32x8::from([
        slice[0] as f32,
        slice[1] as f32,
        slice[2] as f32,
        slice[3] as f32,
        slice[4] as f32,
        slice[5] as f32,
        slice[6] as f32,
        slice[7] as f32,
    ])
}
