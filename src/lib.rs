//! EdgeMatch is a CPU-first compute kernel for oriented-edge template matching.
//!
//! A caller holds a model of oriented edge points extracted from a template
//! and searches a target gradient image for the rigid pose (translation plus
//! in-plane rotation) that best aligns the model with image edges. The crate
//! provides the three numerical stages of that search:
//!
//! 1. [`gradient`] — fused Sobel X/Y + magnitude preprocessing of an 8-bit
//!    grayscale raster into three float rasters.
//! 2. [`hough_vote`] — coarse-to-fine rotation/translation voting that turns
//!    a binned edge model and a set of search edges into the best
//!    (angle, centre) hypothesis.
//! 3. [`score_pose`] / [`refine_translation`] / [`refine_pose_bank`] —
//!    normalized oriented-gradient scoring of candidate poses on a small
//!    translation lattice, with a greedy early-out.
//!
//! Model construction, edge extraction, and image I/O are left to callers;
//! all inputs are borrowed slices described by the types in [`model`] and
//! [`image`].

pub mod gradient;
pub mod image;
pub mod model;
pub mod util;

mod candidate;
mod hough;
mod kernel;
mod search;
mod trace;

pub mod lowlevel;

pub use gradient::{compute_gradient_into, GradientField};
pub use hough::{hough_vote, HoughMatch, SweepWindow, VoteParams};
pub use image::{GradientView, ImageView};
pub use kernel::{score_pose, score_pose_reference, EvalParams};
pub use model::{EdgeModel, OrientationBins, PoseBank, RotatedPose, SearchEdges};
pub use search::{refine_pose_bank, refine_translation, LatticeBest, PoseBest};
pub use util::{EdgeMatchError, EdgeMatchResult};
