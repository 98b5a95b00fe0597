//! Translation refinement around pose hypotheses.
//!
//! [`refine_translation`] scores one rotated pose on a square integer
//! lattice around a base centre; [`refine_pose_bank`] runs that lattice for
//! many pre-rotated poses in parallel and reduces to the single best
//! `(pose, offset)` with a thread-count-independent tie-break.

pub(crate) mod lattice;
pub(crate) mod poses;

pub use lattice::{refine_translation, LatticeBest};
pub use poses::{refine_pose_bank, PoseBest};
