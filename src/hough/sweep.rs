//! Coarse and fine voting sweeps.

use crate::candidate::topk::{CandidateList, VoteCandidate};
use crate::hough::accumulator::VoteGrid;
use crate::hough::{HoughMatch, SweepWindow, VoteParams};
use crate::model::{EdgeModel, SearchEdges};
use crate::trace::{trace_count, trace_scope};
use crate::util::math::{round_half_away, sin_cos_deg};
use crate::util::EdgeMatchResult;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Per-worker scratch bundle: the vote grid plus rotated-model buffers,
/// acquired once per worker and cleared per angle.
struct SweepScratch {
    grid: VoteGrid,
    rot_x: Vec<i32>,
    rot_y: Vec<i32>,
}

impl SweepScratch {
    fn new(params: &VoteParams, model_len: usize) -> Self {
        Self {
            grid: VoteGrid::new(params.vote_width, params.vote_height, params.bin_shift_bits),
            rot_x: vec![0; model_len],
            rot_y: vec![0; model_len],
        }
    }
}

/// Rotates the model, lets every search edge vote, and reports the
/// accumulator peak for one angle.
fn vote_at_angle(
    angle_deg: f64,
    model: &EdgeModel<'_>,
    edges: &SearchEdges<'_>,
    inv_scale: f64,
    scratch: &mut SweepScratch,
) -> VoteCandidate {
    let (sin_a, cos_a) = sin_cos_deg(angle_deg);
    let mx = model.x();
    let my = model.y();
    for i in 0..model.len() {
        let x = mx[i] as f64;
        let y = my[i] as f64;
        scratch.rot_x[i] = round_half_away((x * cos_a - y * sin_a) * inv_scale);
        scratch.rot_y[i] = round_half_away((x * sin_a + y * cos_a) * inv_scale);
    }

    scratch.grid.clear();

    let bins = model.bins();
    let num_bins = bins.num_bins() as i32;
    let bin_shift = round_half_away(angle_deg / bins.bin_width_deg());

    let ex = edges.x();
    let ey = edges.y();
    let eb = edges.bin();
    for si in 0..edges.len() {
        for db in -1..=1 {
            let model_bin = (eb[si] - bin_shift + db).rem_euclid(num_bins) as usize;
            for &j in bins.bin(model_bin) {
                let j = j as usize;
                scratch
                    .grid
                    .vote(ex[si] - scratch.rot_x[j], ey[si] - scratch.rot_y[j]);
            }
        }
    }

    let (votes, peak_idx) = scratch.grid.peak();
    let (cx, cy) = scratch.grid.cell_center(peak_idx);
    VoteCandidate {
        angle_deg,
        cx,
        cy,
        votes,
    }
}

/// Evaluates a set of sweep angles, one accumulator pass each.
///
/// Angles are distributed across worker threads; results come back in
/// sample order regardless of thread count, which is what downstream
/// tie-breaks rely on. `None` entries mark samples outside the window that
/// are recorded as zero-vote placeholders.
fn sweep_angles(
    angles: &[Option<f64>],
    model: &EdgeModel<'_>,
    edges: &SearchEdges<'_>,
    params: &VoteParams,
) -> Vec<VoteCandidate> {
    let run = |scratch: &mut SweepScratch, angle: Option<f64>| match angle {
        Some(angle_deg) => vote_at_angle(angle_deg, model, edges, params.inv_scale, scratch),
        None => VoteCandidate::default(),
    };

    #[cfg(feature = "rayon")]
    {
        angles
            .par_iter()
            .map_init(
                || SweepScratch::new(params, model.len()),
                |scratch, &angle| run(scratch, angle),
            )
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    {
        let mut scratch = SweepScratch::new(params, model.len());
        angles
            .iter()
            .map(|&angle| run(&mut scratch, angle))
            .collect()
    }
}

/// Finds the best (angle, centre) pose hypothesis for a binned edge model
/// against a set of oriented search edges.
///
/// A coarse sweep covers `[start, start + extent]` at the coarse step and
/// keeps the top-K peaks; a fine sweep resamples `+-coarse_step` around each
/// at the fine step. Equal vote counts resolve to the earliest sample in
/// sweep order, so the result does not depend on the worker count. A result
/// with `votes == 0` means nothing in the window ever agreed on a centre.
pub fn hough_vote(
    model: &EdgeModel<'_>,
    edges: &SearchEdges<'_>,
    window: &SweepWindow,
    params: &VoteParams,
) -> EdgeMatchResult<HoughMatch> {
    window.validate()?;
    params.validate()?;

    let num_coarse = ((window.extent_deg / window.coarse_step_deg) as i32 + 1).max(1);
    let _span = trace_scope!("hough_vote", coarse_angles = num_coarse, edges = edges.len());

    // Coarse pass
    let coarse_angles: Vec<Option<f64>> = (0..num_coarse)
        .map(|i| Some(window.start_deg + i as f64 * window.coarse_step_deg))
        .collect();
    let coarse = sweep_angles(&coarse_angles, model, edges, params);

    let mut top = CandidateList::new(params.top_k);
    for cand in coarse {
        top.offer(cand);
    }
    let valid_k = top.valid_len();
    trace_count!("coarse_candidates", count = valid_k, best = top.best().votes);

    // Fine pass around each surviving candidate; samples that stray outside
    // the original window keep a zero-vote slot so the flat layout stays
    // aligned with (candidate, sample) order.
    let num_fine = ((2.0 * window.coarse_step_deg / window.fine_step_deg) as i32 + 1) as usize;
    let window_end = window.start_deg + window.extent_deg;
    let mut fine_angles = Vec::with_capacity(valid_k * num_fine);
    for cand in &top.slots()[..valid_k] {
        let fine_start = cand.angle_deg - window.coarse_step_deg;
        for fi in 0..num_fine {
            let angle = fine_start + fi as f64 * window.fine_step_deg;
            if angle < window.start_deg || angle > window_end {
                fine_angles.push(None);
            } else {
                fine_angles.push(Some(angle));
            }
        }
    }
    let fine = sweep_angles(&fine_angles, model, edges, params);

    let mut best_idx = 0;
    for idx in 1..fine.len() {
        if fine[idx].votes > fine[best_idx].votes {
            best_idx = idx;
        }
    }

    let best = if fine[best_idx].votes > 0 {
        fine[best_idx]
    } else {
        top.best()
    };
    trace_count!("hough_best", votes = best.votes);

    Ok(HoughMatch {
        cx: best.cx,
        cy: best.cy,
        angle_deg: best.angle_deg,
        votes: best.votes,
    })
}
