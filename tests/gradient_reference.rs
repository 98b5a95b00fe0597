use edgematch::{EdgeMatchError, GradientField, ImageView};

fn field_at(field: &GradientField, x: usize, y: usize) -> (f32, f32, f32) {
    let idx = y * field.width() + x;
    (field.dx()[idx], field.dy()[idx], field.mag()[idx])
}

#[test]
fn single_bright_pixel_matches_hand_computed_sobel() {
    // 5x5 image, only (2,2) = 255
    let mut data = vec![0u8; 25];
    data[2 * 5 + 2] = 255;
    let src = ImageView::packed(&data, 5, 5).unwrap();
    let field = GradientField::compute(src).unwrap();

    // Horizontal derivative: the bright pixel sits in the +1 column of
    // (1,2) and the -1 column of (3,2), each with weight 2.
    assert_eq!(field_at(&field, 1, 2).0, 510.0);
    assert_eq!(field_at(&field, 3, 2).0, -510.0);
    assert_eq!(field_at(&field, 2, 1).0, 0.0);
    // Vertical derivative mirrors that across rows.
    assert_eq!(field_at(&field, 2, 1).1, 510.0);
    assert_eq!(field_at(&field, 2, 3).1, -510.0);
    // At (1,2) the vertical kernel's centre row has zero weight.
    assert_eq!(field_at(&field, 1, 2).1, 0.0);
    assert_eq!(field_at(&field, 1, 2).2, 510.0);
    // Diagonal neighbor gets weight 1 on both kernels.
    assert_eq!(field_at(&field, 1, 1).0, 255.0);
    assert_eq!(field_at(&field, 1, 1).1, 255.0);
}

#[test]
fn borders_are_zero_for_all_outputs() {
    let width = 17;
    let height = 11;
    let data: Vec<u8> = (0..width * height).map(|i| (i * 37 % 251) as u8).collect();
    let src = ImageView::packed(&data, width, height).unwrap();
    let field = GradientField::compute(src).unwrap();

    for x in 0..width {
        for &y in &[0, height - 1] {
            assert_eq!(field_at(&field, x, y), (0.0, 0.0, 0.0), "row border");
        }
    }
    for y in 0..height {
        for &x in &[0, width - 1] {
            assert_eq!(field_at(&field, x, y), (0.0, 0.0, 0.0), "column border");
        }
    }
}

#[test]
fn constant_image_has_zero_gradient_everywhere() {
    let data = vec![143u8; 12 * 9];
    let src = ImageView::packed(&data, 12, 9).unwrap();
    let field = GradientField::compute(src).unwrap();
    assert!(field.dx().iter().all(|&v| v == 0.0));
    assert!(field.dy().iter().all(|&v| v == 0.0));
    assert!(field.mag().iter().all(|&v| v == 0.0));
}

#[test]
fn padded_stride_ignores_row_padding() {
    let width = 6;
    let height = 5;
    let stride = 9;
    let mut padded = vec![0u8; stride * height];
    let mut packed = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 31) ^ (y * 7)) as u8;
            padded[y * stride + x] = value;
            packed[y * width + x] = value;
        }
        // Poison the padding: it must never be read.
        for x in width..stride {
            if y * stride + x < padded.len() {
                padded[y * stride + x] = 255;
            }
        }
    }

    let from_padded =
        GradientField::compute(ImageView::with_stride(&padded, width, height, stride).unwrap()).unwrap();
    let from_packed =
        GradientField::compute(ImageView::packed(&packed, width, height).unwrap()).unwrap();
    assert_eq!(from_padded.dx(), from_packed.dx());
    assert_eq!(from_padded.dy(), from_packed.dy());
    assert_eq!(from_padded.mag(), from_packed.mag());
}

#[test]
fn recomputation_is_bit_identical() {
    let width = 33; // exercises the SIMD tail
    let height = 16;
    let data: Vec<u8> = (0..width * height)
        .map(|i| ((i * 13) ^ (i >> 3)) as u8)
        .collect();
    let src = ImageView::packed(&data, width, height).unwrap();
    let first = GradientField::compute(src).unwrap();
    let second = GradientField::compute(src).unwrap();
    assert_eq!(first.dx(), second.dx());
    assert_eq!(first.dy(), second.dy());
    assert_eq!(first.mag(), second.mag());
}

#[test]
fn rejects_undersized_outputs() {
    let data = vec![0u8; 25];
    let src = ImageView::packed(&data, 5, 5).unwrap();
    let mut dx = vec![0.0f32; 24];
    let mut dy = vec![0.0f32; 25];
    let mut mag = vec![0.0f32; 25];
    let err = edgematch::compute_gradient_into(src, &mut dx, &mut dy, &mut mag)
        .err()
        .unwrap();
    assert_eq!(
        err,
        EdgeMatchError::LengthMismatch {
            expected: 25,
            got: 24,
            context: "gradient dx output",
        }
    );
}
