//! Lattice search for one pose.

use crate::image::GradientView;
use crate::kernel::{pack_offsets, score_with_offsets, EvalParams};
use crate::model::RotatedPose;

/// Best translation found on a refinement lattice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeBest {
    /// Best score, or 0.0 when no in-bounds candidate beat zero.
    pub score: f64,
    /// Horizontal offset of the best candidate from the base centre.
    pub dx: i32,
    /// Vertical offset of the best candidate from the base centre.
    pub dy: i32,
}

impl LatticeBest {
    pub(crate) fn none() -> Self {
        Self {
            score: 0.0,
            dx: 0,
            dy: 0,
        }
    }
}

/// Scores every centre `(base_cx + dx, base_cy + dy)` for `dx`, `dy` in
/// `[-ref_radius, +ref_radius]` and returns the best.
///
/// Candidates whose centre lies within `margin` of the image border are
/// rejected, which is also what keeps every rotated-point access in bounds;
/// the caller derives `margin` from the pose's extent. Ties keep the
/// earliest enumerated candidate, i.e. the smallest `(dy, dx)`.
pub fn refine_translation(
    base_cx: i32,
    base_cy: i32,
    ref_radius: i32,
    pose: &RotatedPose<'_>,
    margin: i32,
    grad: &GradientView<'_>,
    params: &EvalParams,
) -> LatticeBest {
    let mut offsets = Vec::new();
    pack_offsets(pose.rx(), pose.ry(), grad.width() as i32, &mut offsets);
    lattice_best(
        base_cx,
        base_cy,
        ref_radius,
        margin,
        &offsets,
        pose.rdx(),
        pose.rdy(),
        grad,
        params,
    )
}

/// Lattice loop over pre-packed offsets; shared with the pose-bank batch.
#[allow(clippy::too_many_arguments)]
pub(crate) fn lattice_best(
    base_cx: i32,
    base_cy: i32,
    ref_radius: i32,
    margin: i32,
    offsets: &[i32],
    rdx: &[f32],
    rdy: &[f32],
    grad: &GradientView<'_>,
    params: &EvalParams,
) -> LatticeBest {
    let img_w = grad.width() as i32;
    let img_h = grad.height() as i32;
    let mut best = LatticeBest::none();

    for dy in -ref_radius..=ref_radius {
        let py = base_cy + dy;
        if py < margin || py >= img_h - margin {
            continue;
        }
        for dx in -ref_radius..=ref_radius {
            let px = base_cx + dx;
            if px < margin || px >= img_w - margin {
                continue;
            }
            let score = score_with_offsets(py * img_w + px, offsets, rdx, rdy, grad, params);
            if score > best.score {
                best = LatticeBest { score, dx, dy };
            }
        }
    }

    best
}
