use super::*;

use image::{Rgba, RgbaImage};

fn shaded(level: u8, size: u32) -> Frame {
    Frame::new(
        RgbaImage::from_pixel(size, size, Rgba([level, level.wrapping_mul(3), level, 255])),
        0.1,
    )
}

#[test]
fn within_budget_passes_through_untouched() {
    let frames = vec![shaded(10, 8), shaded(20, 8)];
    let governed = govern(frames, 0.1, SizeBudget::default()).unwrap();
    assert_eq!(governed.frame_count, 2);
    assert_eq!((governed.width, governed.height), (8, 8));
    assert_eq!(governed.stats.encode_attempts, 1);
    assert_eq!(governed.stats.decimation_passes, 0);
    assert_eq!(governed.stats.downscale_passes, 0);
    assert!((governed.duration - 0.1).abs() < 1e-12);
    assert_eq!(&governed.bytes[..6], b"GIF89a");
}

#[test]
fn one_decimation_pass_hits_the_frame_cap_exactly() {
    // 50 frames against a cap of 20: ratio 2.5, so the kept indices are
    // floor(i * 2.5) and the duration scales to 0.25 s, preserving the
    // 5.0 s total playtime. The byte ceiling is derived by encoding the
    // expected survivor list, so the governor must land on it exactly.
    let frames: Vec<Frame> = (0..50).map(|i| shaded(i as u8 * 5, 24)).collect();

    let survivors: Vec<Frame> = (0..20)
        .map(|i| frames[(i as f64 * 2.5) as usize].clone())
        .collect();
    let expected_bytes = encode_gif(&survivors, 0.25).unwrap();

    let budget = SizeBudget {
        max_bytes: expected_bytes.len(),
        max_frames: 20,
    };
    let governed = govern(frames, 0.1, budget).unwrap();

    assert_eq!(governed.frame_count, 20);
    assert_eq!(governed.stats.decimation_passes, 1);
    assert_eq!(governed.stats.downscale_passes, 0);
    assert_eq!(governed.stats.encode_attempts, 2);
    assert!((governed.duration - 0.25).abs() < 1e-12);
    assert!((governed.duration * 20.0 - 0.1 * 50.0).abs() < 0.1);
    assert_eq!(governed.bytes, expected_bytes);
}

#[test]
fn impossible_budget_surfaces_the_floor() {
    let frames = vec![shaded(100, 20)];
    let budget = SizeBudget {
        max_bytes: 1,
        max_frames: 100,
    };
    match govern(frames, 0.1, budget) {
        Err(FuseError::BudgetUnattainable(msg)) => {
            // Downscale walks 20 -> 18 -> 16 and refuses the step to 14.
            assert!(msg.contains("16x16"), "unexpected message: {msg}");
        }
        other => panic!("expected BudgetUnattainable, got {other:?}"),
    }
}

#[test]
fn degenerate_budgets_are_rejected() {
    let frames = vec![shaded(1, 8)];
    assert!(matches!(
        govern(
            frames.clone(),
            0.1,
            SizeBudget {
                max_bytes: 0,
                max_frames: 10
            }
        ),
        Err(FuseError::InvalidInput(_))
    ));
    assert!(matches!(
        govern(
            frames,
            0.1,
            SizeBudget {
                max_bytes: 10,
                max_frames: 0
            }
        ),
        Err(FuseError::InvalidInput(_))
    ));
}
