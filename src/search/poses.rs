//! Batch lattice search over a bank of pre-rotated poses.

use crate::image::GradientView;
use crate::kernel::{pack_offsets, EvalParams};
use crate::model::PoseBank;
use crate::search::lattice::{lattice_best, LatticeBest};
use crate::trace::{trace_count, trace_scope};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Globally best `(pose, offset)` over a pose bank.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseBest {
    /// Best score, or 0.0 when no candidate of any pose beat zero.
    pub score: f64,
    /// Horizontal offset of the best candidate from the base centre.
    pub dx: i32,
    /// Vertical offset of the best candidate from the base centre.
    pub dy: i32,
    /// Index of the winning pose in the bank.
    pub pose_idx: usize,
}

/// Runs the refinement lattice for every pose in the bank and returns the
/// globally best result.
///
/// Poses are distributed across worker threads; each worker reuses one
/// packed-offsets scratch buffer across its poses. Per-pose local bests are
/// collected in pose order and reduced serially with a strictly-better
/// comparison, so the result equals the serial `(pose_idx, dy, dx)`-ordered
/// argmax at any thread count.
pub fn refine_pose_bank(
    base_cx: i32,
    base_cy: i32,
    ref_radius: i32,
    bank: &PoseBank<'_>,
    grad: &GradientView<'_>,
    params: &EvalParams,
) -> PoseBest {
    let pose_count = bank.pose_count();
    let _span = trace_scope!("refine_pose_bank", poses = pose_count, radius = ref_radius);

    let img_w = grad.width() as i32;
    let run_pose = |offsets: &mut Vec<i32>, pose_idx: usize| -> LatticeBest {
        let pose = bank.pose(pose_idx);
        pack_offsets(pose.rx(), pose.ry(), img_w, offsets);
        lattice_best(
            base_cx,
            base_cy,
            ref_radius,
            bank.margin(pose_idx),
            offsets,
            pose.rdx(),
            pose.rdy(),
            grad,
            params,
        )
    };

    #[cfg(feature = "rayon")]
    let locals: Vec<LatticeBest> = (0..pose_count)
        .into_par_iter()
        .map_init(Vec::new, |offsets, pose_idx| run_pose(offsets, pose_idx))
        .collect();

    #[cfg(not(feature = "rayon"))]
    let locals: Vec<LatticeBest> = {
        let mut offsets = Vec::new();
        (0..pose_count)
            .map(|pose_idx| run_pose(&mut offsets, pose_idx))
            .collect()
    };

    let mut best = PoseBest {
        score: 0.0,
        dx: 0,
        dy: 0,
        pose_idx: 0,
    };
    for (pose_idx, local) in locals.iter().enumerate() {
        if local.score > best.score {
            best = PoseBest {
                score: local.score,
                dx: local.dx,
                dy: local.dy,
                pose_idx,
            };
        }
    }

    trace_count!("pose_bank_best", score = best.score, pose_idx = best.pose_idx);
    best
}
