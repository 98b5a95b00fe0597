//! Borrowed model and search-edge descriptions.
//!
//! All model data is owned by the caller; these types validate slice-length
//! agreement once so the kernels can run without per-access checks. A model
//! is treated as a rigid body with origin (0,0). For Hough voting it is also
//! indexed by quantized gradient-orientation bin through a CSR-style table:
//! `bin_indices` holds model point indices partitioned by bin, addressed by
//! `bin_offsets[bin..bin + 1]`.

use crate::util::{EdgeMatchError, EdgeMatchResult};

/// A rotated model: integer pixel offsets plus unit gradient directions.
///
/// `rdx`/`rdy` are expected to be unit norm up to single-precision rounding;
/// the scoring kernels rely on that for their `[-1, 1]` score range.
#[derive(Copy, Clone)]
pub struct RotatedPose<'a> {
    rx: &'a [i32],
    ry: &'a [i32],
    rdx: &'a [f32],
    rdy: &'a [f32],
}

impl<'a> RotatedPose<'a> {
    /// Creates a pose over four equal-length slices.
    pub fn new(
        rx: &'a [i32],
        ry: &'a [i32],
        rdx: &'a [f32],
        rdy: &'a [f32],
    ) -> EdgeMatchResult<Self> {
        let n = rx.len();
        for (len, context) in [
            (ry.len(), "pose ry"),
            (rdx.len(), "pose rdx"),
            (rdy.len(), "pose rdy"),
        ] {
            if len != n {
                return Err(EdgeMatchError::LengthMismatch {
                    expected: n,
                    got: len,
                    context,
                });
            }
        }
        Ok(Self { rx, ry, rdx, rdy })
    }

    /// Returns the number of edge points.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Returns true if the pose has no points.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Returns the x offsets of the rotated points.
    pub fn rx(&self) -> &'a [i32] {
        self.rx
    }

    /// Returns the y offsets of the rotated points.
    pub fn ry(&self) -> &'a [i32] {
        self.ry
    }

    /// Returns the x components of the unit directions.
    pub fn rdx(&self) -> &'a [f32] {
        self.rdx
    }

    /// Returns the y components of the unit directions.
    pub fn rdy(&self) -> &'a [f32] {
        self.rdy
    }
}

/// Many pre-rotated copies of one model, laid out as contiguous per-pose
/// slices of `point_count` elements each, with a per-pose border margin.
pub struct PoseBank<'a> {
    rx: &'a [i32],
    ry: &'a [i32],
    rdx: &'a [f32],
    rdy: &'a [f32],
    margins: &'a [i32],
    point_count: usize,
}

impl<'a> PoseBank<'a> {
    /// Creates a bank of `margins.len()` poses of `point_count` points each.
    pub fn new(
        rx: &'a [i32],
        ry: &'a [i32],
        rdx: &'a [f32],
        rdy: &'a [f32],
        margins: &'a [i32],
        point_count: usize,
    ) -> EdgeMatchResult<Self> {
        let expected = margins
            .len()
            .checked_mul(point_count)
            .ok_or(EdgeMatchError::LengthMismatch {
                expected: usize::MAX,
                got: margins.len(),
                context: "pose bank size",
            })?;
        for (len, context) in [
            (rx.len(), "bank rx"),
            (ry.len(), "bank ry"),
            (rdx.len(), "bank rdx"),
            (rdy.len(), "bank rdy"),
        ] {
            if len != expected {
                return Err(EdgeMatchError::LengthMismatch {
                    expected,
                    got: len,
                    context,
                });
            }
        }
        Ok(Self {
            rx,
            ry,
            rdx,
            rdy,
            margins,
            point_count,
        })
    }

    /// Returns the number of poses.
    pub fn pose_count(&self) -> usize {
        self.margins.len()
    }

    /// Returns the number of points per pose.
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Returns the border margin for a pose.
    pub fn margin(&self, pose_idx: usize) -> i32 {
        self.margins[pose_idx]
    }

    /// Returns one pose's slices.
    pub fn pose(&self, pose_idx: usize) -> RotatedPose<'a> {
        let start = pose_idx * self.point_count;
        let end = start + self.point_count;
        RotatedPose {
            rx: &self.rx[start..end],
            ry: &self.ry[start..end],
            rdx: &self.rdx[start..end],
            rdy: &self.rdy[start..end],
        }
    }
}

/// CSR-style orientation-bin index of a model.
///
/// `offsets` has `num_bins + 1` entries with `offsets[0] == 0`, the last
/// entry equal to `indices.len()`, and monotone non-decreasing values;
/// `indices[offsets[b]..offsets[b + 1]]` are the model point indices whose
/// gradient orientation falls in bin `b`.
#[derive(Copy, Clone)]
pub struct OrientationBins<'a> {
    offsets: &'a [i32],
    indices: &'a [i32],
}

impl<'a> OrientationBins<'a> {
    /// Creates and validates a bin table for a model of `point_count` points.
    pub fn new(
        offsets: &'a [i32],
        indices: &'a [i32],
        point_count: usize,
    ) -> EdgeMatchResult<Self> {
        if offsets.len() < 2 {
            return Err(EdgeMatchError::InvalidBinTable {
                reason: "offsets needs at least two entries",
            });
        }
        if offsets[0] != 0 {
            return Err(EdgeMatchError::InvalidBinTable {
                reason: "offsets must start at zero",
            });
        }
        if *offsets.last().expect("len checked") != indices.len() as i32 {
            return Err(EdgeMatchError::InvalidBinTable {
                reason: "offsets must end at the index count",
            });
        }
        if offsets.windows(2).any(|w| w[1] < w[0]) {
            return Err(EdgeMatchError::InvalidBinTable {
                reason: "offsets must be monotone non-decreasing",
            });
        }
        if indices
            .iter()
            .any(|&i| i < 0 || i as usize >= point_count)
        {
            return Err(EdgeMatchError::InvalidBinTable {
                reason: "index out of model range",
            });
        }
        Ok(Self { offsets, indices })
    }

    /// Returns the number of orientation bins.
    pub fn num_bins(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns the width of one bin in degrees.
    pub fn bin_width_deg(&self) -> f64 {
        360.0 / self.num_bins() as f64
    }

    /// Returns the model point indices in bin `b`.
    pub fn bin(&self, b: usize) -> &'a [i32] {
        let start = self.offsets[b] as usize;
        let end = self.offsets[b + 1] as usize;
        &self.indices[start..end]
    }
}

/// The unrotated model used by the Hough voter: floating point coordinates
/// relative to the model origin, plus the orientation-bin index.
#[derive(Copy, Clone)]
pub struct EdgeModel<'a> {
    x: &'a [f32],
    y: &'a [f32],
    bins: OrientationBins<'a>,
}

impl<'a> EdgeModel<'a> {
    /// Creates a model over two coordinate slices and a validated bin table.
    pub fn new(x: &'a [f32], y: &'a [f32], bins: OrientationBins<'a>) -> EdgeMatchResult<Self> {
        if y.len() != x.len() {
            return Err(EdgeMatchError::LengthMismatch {
                expected: x.len(),
                got: y.len(),
                context: "model y",
            });
        }
        Ok(Self { x, y, bins })
    }

    /// Returns the number of model points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the model has no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Returns the model x coordinates.
    pub fn x(&self) -> &'a [f32] {
        self.x
    }

    /// Returns the model y coordinates.
    pub fn y(&self) -> &'a [f32] {
        self.y
    }

    /// Returns the orientation-bin index.
    pub fn bins(&self) -> OrientationBins<'a> {
        self.bins
    }
}

/// Oriented edges extracted from the target image: integer pixel locations
/// plus quantized gradient-orientation bins.
#[derive(Copy, Clone)]
pub struct SearchEdges<'a> {
    x: &'a [i32],
    y: &'a [i32],
    bin: &'a [i32],
}

impl<'a> SearchEdges<'a> {
    /// Creates a search-edge set over three equal-length slices.
    pub fn new(x: &'a [i32], y: &'a [i32], bin: &'a [i32]) -> EdgeMatchResult<Self> {
        let n = x.len();
        for (len, context) in [(y.len(), "search y"), (bin.len(), "search bin")] {
            if len != n {
                return Err(EdgeMatchError::LengthMismatch {
                    expected: n,
                    got: len,
                    context,
                });
            }
        }
        Ok(Self { x, y, bin })
    }

    /// Returns the number of search edges.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the set has no edges.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Returns the edge x coordinates.
    pub fn x(&self) -> &'a [i32] {
        self.x
    }

    /// Returns the edge y coordinates.
    pub fn y(&self) -> &'a [i32] {
        self.y
    }

    /// Returns the quantized orientation bins.
    pub fn bin(&self) -> &'a [i32] {
        self.bin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_table_rejects_non_monotone_offsets() {
        let offsets = [0i32, 3, 2, 4];
        let indices = [0i32, 1, 2, 3];
        let err = OrientationBins::new(&offsets, &indices, 4).err().unwrap();
        assert_eq!(
            err,
            EdgeMatchError::InvalidBinTable {
                reason: "offsets must be monotone non-decreasing"
            }
        );
    }

    #[test]
    fn bin_table_rejects_out_of_range_index() {
        let offsets = [0i32, 1];
        let indices = [5i32];
        assert!(OrientationBins::new(&offsets, &indices, 4).is_err());
    }

    #[test]
    fn bin_lookup_partitions_indices() {
        let offsets = [0i32, 2, 2, 3];
        let indices = [0i32, 2, 1];
        let bins = OrientationBins::new(&offsets, &indices, 3).unwrap();
        assert_eq!(bins.num_bins(), 3);
        assert_eq!(bins.bin(0), &[0, 2]);
        assert_eq!(bins.bin(1), &[] as &[i32]);
        assert_eq!(bins.bin(2), &[1]);
        assert_eq!(bins.bin_width_deg(), 120.0);
    }

    #[test]
    fn pose_bank_slices_are_contiguous_per_pose() {
        let rx = [1i32, 2, 3, 4];
        let ry = [5i32, 6, 7, 8];
        let rdx = [1.0f32, 0.0, -1.0, 0.0];
        let rdy = [0.0f32, 1.0, 0.0, -1.0];
        let margins = [3i32, 4];
        let bank = PoseBank::new(&rx, &ry, &rdx, &rdy, &margins, 2).unwrap();
        assert_eq!(bank.pose_count(), 2);
        assert_eq!(bank.pose(1).rx(), &[3, 4]);
        assert_eq!(bank.margin(1), 4);
    }
}
