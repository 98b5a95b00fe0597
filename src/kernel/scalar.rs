//! Scalar reference scoring kernel.

use crate::image::GradientView;
use crate::kernel::{EvalParams, BLOCK};

/// Scores a packed-offset pose at linear base index `base`.
///
/// Accumulation runs in blocks of [`BLOCK`] points so the greedy early-out
/// fires at the same boundaries as the SIMD path: after each full block that
/// has reached `n/5` processed points (except the last), the partial sum
/// divided by the processed count is compared against
/// `thresh * (1 - greedy)` and the evaluation abandoned with 0.0 when below.
pub(crate) fn score_with_offsets(
    base: i32,
    offsets: &[i32],
    rdx: &[f32],
    rdy: &[f32],
    grad: &GradientView<'_>,
    params: &EvalParams,
) -> f64 {
    let n = rdx.len();
    if n == 0 {
        return 0.0;
    }
    let dx_img = grad.dx();
    let dy_img = grad.dy();
    let mag_img = grad.mag();

    let early_n = n / 5;
    let early_thresh = params.thresh * (1.0 - params.greedy);
    let vec_n = n & !(BLOCK - 1);

    let mut sum = 0.0f32;
    let mut i = 0usize;
    while i < vec_n {
        for lane in 0..BLOCK {
            let idx = (base + offsets[i + lane]) as usize;
            let m = mag_img[idx];
            if m > 0.001 {
                let contrib = (rdx[i + lane] * dx_img[idx] + rdy[i + lane] * dy_img[idx]) / m;
                sum += if params.contrast_invariant {
                    contrib.abs()
                } else {
                    contrib
                };
            }
        }
        i += BLOCK;

        if i >= early_n && i < vec_n && sum / (i as f32) < early_thresh {
            return 0.0;
        }
    }

    // Remainder past the last full block
    for j in vec_n..n {
        let idx = (base + offsets[j]) as usize;
        let m = mag_img[idx];
        if m > 0.001 {
            let contrib = (rdx[j] * dx_img[idx] + rdy[j] * dy_img[idx]) / m;
            sum += if params.contrast_invariant {
                contrib.abs()
            } else {
                contrib
            };
        }
    }

    sum as f64 / n as f64
}
