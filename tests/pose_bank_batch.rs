use edgematch::{
    refine_pose_bank, refine_translation, EvalParams, GradientView, PoseBank, RotatedPose,
};

const W: usize = 56;
const H: usize = 56;

struct Field {
    dx: Vec<f32>,
    dy: Vec<f32>,
    mag: Vec<f32>,
}

impl Field {
    fn zeros() -> Self {
        Self {
            dx: vec![0.0; W * H],
            dy: vec![0.0; W * H],
            mag: vec![0.0; W * H],
        }
    }

    fn set(&mut self, x: i32, y: i32, dx: f32, dy: f32) {
        let idx = y as usize * W + x as usize;
        self.dx[idx] = dx;
        self.dy[idx] = dy;
        self.mag[idx] = (dx * dx + dy * dy).sqrt();
    }

    fn view(&self) -> GradientView<'_> {
        GradientView::new(&self.dx, &self.dy, &self.mag, W, H).unwrap()
    }
}

/// Bank of diamond-shaped poses of growing radius; pose `p` has points at
/// distance `p + 1` from the centre.
struct DiamondBank {
    rx: Vec<i32>,
    ry: Vec<i32>,
    rdx: Vec<f32>,
    rdy: Vec<f32>,
    margins: Vec<i32>,
}

impl DiamondBank {
    fn new(pose_count: usize) -> Self {
        let mut bank = Self {
            rx: Vec::new(),
            ry: Vec::new(),
            rdx: Vec::new(),
            rdy: Vec::new(),
            margins: Vec::new(),
        };
        for p in 0..pose_count as i32 {
            let r = p + 1;
            bank.rx.extend_from_slice(&[r, 0, -r, 0]);
            bank.ry.extend_from_slice(&[0, r, 0, -r]);
            bank.rdx.extend_from_slice(&[1.0, 0.0, -1.0, 0.0]);
            bank.rdy.extend_from_slice(&[0.0, 1.0, 0.0, -1.0]);
            bank.margins.push(r + 1);
        }
        bank
    }

    fn bank(&self) -> PoseBank<'_> {
        PoseBank::new(
            &self.rx,
            &self.ry,
            &self.rdx,
            &self.rdy,
            &self.margins,
            4,
        )
        .unwrap()
    }

    /// Paints the gradient pattern of pose `p` at `(cx, cy)`.
    fn paint(&self, field: &mut Field, p: usize, cx: i32, cy: i32, strength: f32) {
        for i in 0..4 {
            let k = p * 4 + i;
            field.set(
                cx + self.rx[k],
                cy + self.ry[k],
                self.rdx[k] * strength,
                self.rdy[k] * strength,
            );
        }
    }
}

fn relaxed() -> EvalParams {
    EvalParams {
        thresh: 0.0,
        greedy: 0.0,
        contrast_invariant: false,
    }
}

#[test]
fn single_pose_bank_reduces_to_lattice_search() {
    let diamonds = DiamondBank::new(1);
    let mut field = Field::zeros();
    diamonds.paint(&mut field, 0, 21, 19, 80.0);
    let view = field.view();

    let batch = refine_pose_bank(20, 20, 3, &diamonds.bank(), &view, &relaxed());
    let pose = RotatedPose::new(
        &diamonds.rx[..4],
        &diamonds.ry[..4],
        &diamonds.rdx[..4],
        &diamonds.rdy[..4],
    )
    .unwrap();
    let single = refine_translation(20, 20, 3, &pose, diamonds.margins[0], &view, &relaxed());

    assert_eq!(batch.pose_idx, 0);
    assert_eq!(batch.score, single.score);
    assert_eq!((batch.dx, batch.dy), (single.dx, single.dy));
}

#[test]
fn best_pose_and_offset_match_the_serial_reference() {
    let diamonds = DiamondBank::new(5);
    let mut field = Field::zeros();
    // Pose 3's pattern is the one actually present, slightly off-centre.
    diamonds.paint(&mut field, 3, 29, 26, 120.0);
    let view = field.view();
    let params = relaxed();

    let batch = refine_pose_bank(28, 27, 4, &diamonds.bank(), &view, &params);

    let mut expect_score = 0.0;
    let mut expect = (0usize, 0, 0);
    for p in 0..5 {
        let start = p * 4;
        let pose = RotatedPose::new(
            &diamonds.rx[start..start + 4],
            &diamonds.ry[start..start + 4],
            &diamonds.rdx[start..start + 4],
            &diamonds.rdy[start..start + 4],
        )
        .unwrap();
        let local = refine_translation(28, 27, 4, &pose, diamonds.margins[p], &view, &params);
        if local.score > expect_score {
            expect_score = local.score;
            expect = (p, local.dx, local.dy);
        }
    }

    assert_eq!(batch.pose_idx, expect.0);
    assert_eq!(batch.pose_idx, 3);
    assert_eq!(batch.score, expect_score);
    assert_eq!((batch.dx, batch.dy), (expect.1, expect.2));
    assert_eq!((batch.dx, batch.dy), (1, -1));
}

#[test]
fn tied_poses_resolve_to_the_lowest_index() {
    // Two identical poses over a uniform field tie exactly; the earlier
    // pose index must win regardless of scheduling.
    let rx = [1i32, -1, 1, -1];
    let ry = [0i32, 0, 0, 0];
    let rdx = [1.0f32; 4];
    let rdy = [0.0f32; 4];
    let margins = [2i32, 2];
    let bank = PoseBank::new(&rx, &ry, &rdx, &rdy, &margins, 2).unwrap();

    let field = Field {
        dx: vec![70.0; W * H],
        dy: vec![0.0; W * H],
        mag: vec![70.0; W * H],
    };

    let best = refine_pose_bank(25, 25, 1, &bank, &field.view(), &relaxed());
    assert!(best.score > 0.0);
    assert_eq!(best.pose_idx, 0);
    assert_eq!((best.dx, best.dy), (-1, -1));
}

#[cfg(feature = "rayon")]
#[test]
fn result_is_invariant_under_thread_count() {
    let diamonds = DiamondBank::new(6);
    let mut field = Field::zeros();
    diamonds.paint(&mut field, 2, 30, 30, 90.0);
    diamonds.paint(&mut field, 4, 14, 38, 90.0);
    let view = field.view();
    let params = relaxed();

    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| refine_pose_bank(30, 30, 3, &diamonds.bank(), &view, &params));
    let many = rayon::ThreadPoolBuilder::new()
        .num_threads(8)
        .build()
        .unwrap()
        .install(|| refine_pose_bank(30, 30, 3, &diamonds.bank(), &view, &params));

    assert_eq!(single, many);
}

#[test]
fn empty_field_reports_pose_zero_with_no_score() {
    let diamonds = DiamondBank::new(3);
    let field = Field::zeros();
    let best = refine_pose_bank(28, 28, 2, &diamonds.bank(), &field.view(), &relaxed());
    assert_eq!(best.score, 0.0);
    assert_eq!((best.dx, best.dy, best.pose_idx), (0, 0, 0));
}
