//! Hough-style rotation/translation voting.
//!
//! A coarse angular sweep rotates the model at each sample angle, lets every
//! search edge vote for the centre translations its orientation bin allows
//! (with one bin of tolerance either side), and keeps the top-K accumulator
//! peaks. A fine sweep then resamples around each surviving candidate at the
//! fine step and the overall best sample wins, falling back to the best
//! coarse candidate when refinement finds nothing.

pub(crate) mod accumulator;
pub(crate) mod sweep;

pub use sweep::hough_vote;

use crate::util::{EdgeMatchError, EdgeMatchResult};

/// Angle window of a voting sweep, in degrees.
#[derive(Clone, Copy, Debug)]
pub struct SweepWindow {
    /// First angle of the window.
    pub start_deg: f64,
    /// Window length; samples run over `[start, start + extent]`.
    pub extent_deg: f64,
    /// Coarse sample step.
    pub coarse_step_deg: f64,
    /// Fine resample step used around coarse candidates.
    pub fine_step_deg: f64,
}

impl SweepWindow {
    pub(crate) fn validate(&self) -> EdgeMatchResult<()> {
        let all_finite = self.start_deg.is_finite()
            && self.extent_deg.is_finite()
            && self.coarse_step_deg.is_finite()
            && self.fine_step_deg.is_finite();
        if !all_finite {
            return Err(EdgeMatchError::InvalidSweep {
                reason: "non-finite sweep window",
            });
        }
        if self.coarse_step_deg <= 0.0 || self.fine_step_deg <= 0.0 {
            return Err(EdgeMatchError::InvalidSweep {
                reason: "angle steps must be positive",
            });
        }
        if self.extent_deg < 0.0 {
            return Err(EdgeMatchError::InvalidSweep {
                reason: "extent must be non-negative",
            });
        }
        Ok(())
    }
}

/// Vote-accumulator geometry and candidate capacity.
#[derive(Clone, Copy, Debug)]
pub struct VoteParams {
    /// Pixel width of the translation hypothesis space.
    pub vote_width: i32,
    /// Pixel height of the translation hypothesis space.
    pub vote_height: i32,
    /// Power-of-two accumulator cell size as a shift count.
    pub bin_shift_bits: u32,
    /// Model-to-image scale factor applied while rotating model points.
    pub inv_scale: f64,
    /// Candidates retained between the coarse and fine passes.
    pub top_k: usize,
}

impl VoteParams {
    pub(crate) fn validate(&self) -> EdgeMatchResult<()> {
        if self.vote_width <= 0 || self.vote_height <= 0 {
            return Err(EdgeMatchError::InvalidSweep {
                reason: "vote space must be positive",
            });
        }
        if self.top_k == 0 {
            return Err(EdgeMatchError::InvalidSweep {
                reason: "top_k must be at least one",
            });
        }
        if self.bin_shift_bits >= 31 {
            return Err(EdgeMatchError::InvalidSweep {
                reason: "bin shift exceeds the coordinate range",
            });
        }
        if !self.inv_scale.is_finite() {
            return Err(EdgeMatchError::InvalidSweep {
                reason: "non-finite scale factor",
            });
        }
        Ok(())
    }
}

/// Best pose hypothesis found by [`hough_vote`].
///
/// `votes == 0` means no (edge, model-point) pair ever agreed on a centre —
/// a legitimate "no match".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoughMatch {
    /// Centre x in image coordinates (accumulator cell centre).
    pub cx: f64,
    /// Centre y in image coordinates.
    pub cy: f64,
    /// Model rotation in degrees.
    pub angle_deg: f64,
    /// Vote count of the winning accumulator peak.
    pub votes: i32,
}
