//! Candidate tracking for the Hough voter.

pub(crate) mod topk;
