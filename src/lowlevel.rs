//! Low-level building blocks for custom matching pipelines.
//!
//! These types expose the vote accumulator and candidate list for advanced
//! use cases such as custom sweep schedules or instrumented tests. Most
//! users should prefer the top-level [`hough_vote`](crate::hough_vote),
//! [`score_pose`](crate::score_pose), and refinement entry points.

pub use crate::candidate::topk::{CandidateList, VoteCandidate};
pub use crate::hough::accumulator::VoteGrid;
