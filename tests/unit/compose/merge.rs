use super::*;

use image::{Rgba, RgbaImage};

use crate::timeline::align::{ExtendPolicy, plan_alignment};

fn shaded_animation(levels: &[u8], duration: f64) -> FrameSequence {
    let frames = levels
        .iter()
        .map(|&level| {
            Frame::new(
                RgbaImage::from_pixel(2, 2, Rgba([level, level, level, 255])),
                duration,
            )
        })
        .collect();
    FrameSequence::new(frames).unwrap()
}

fn identity_merge(frames: &[&Frame]) -> FuseResult<Frame> {
    Ok(frames[0].clone())
}

#[test]
fn identity_merge_reproduces_target_frames_per_tick() {
    let a = shaded_animation(&[10, 20, 30, 40], 0.25);
    let inputs = vec![a.clone(), a.clone()];
    let refs: Vec<&FrameSequence> = inputs.iter().collect();
    let plan = plan_alignment(&refs, ExtendPolicy::ExtendLoop, 100).unwrap();

    let merged = compose(&inputs, &plan, &identity_merge, &Threading::default()).unwrap();
    assert_eq!(merged.frames.len(), plan.tick_count);
    assert!((merged.duration - 0.25).abs() < 1e-12);

    for (tick, frame) in merged.frames.iter().enumerate() {
        let expected = &inputs[0].frame(plan.rows[0][tick]).image;
        assert_eq!(&frame.image, expected);
        assert!((frame.duration - plan.tick_duration).abs() < 1e-12);
    }
}

#[test]
fn merge_failures_carry_the_tick_index() {
    let a = shaded_animation(&[10, 20, 30, 40], 0.25);
    let inputs = vec![a];
    let plan = AlignmentPlan {
        rows: vec![vec![0, 1, 2, 3]],
        tick_count: 4,
        tick_duration: 0.25,
        target: 0,
    };

    let poisoned = |frames: &[&Frame]| -> FuseResult<Frame> {
        if frames[0].image.get_pixel(0, 0)[0] == 30 {
            return Err(FuseError::invalid_input("poisoned frame"));
        }
        Ok(frames[0].clone())
    };

    match compose(&inputs, &plan, &poisoned, &Threading::default()) {
        Err(FuseError::MergeFunction { tick, message }) => {
            assert_eq!(tick, 2);
            assert!(message.contains("poisoned frame"));
        }
        other => panic!("expected MergeFunction error, got {other:?}"),
    }
}

#[test]
fn parallel_output_matches_sequential() {
    let a = shaded_animation(&[1, 2, 3, 4, 5, 6], 0.05);
    let b = shaded_animation(&[7, 8, 9], 0.1);
    let inputs = vec![a, b];
    let refs: Vec<&FrameSequence> = inputs.iter().collect();
    let plan = plan_alignment(&refs, ExtendPolicy::ExtendLoop, 100).unwrap();

    let brighten = |frames: &[&Frame]| -> FuseResult<Frame> {
        let mut image = frames[0].image.clone();
        for (dst, src) in image.pixels_mut().zip(frames[1].image.pixels()) {
            dst[0] = dst[0].saturating_add(src[0]);
        }
        Ok(Frame::new(image, 0.0))
    };

    let sequential = compose(&inputs, &plan, &brighten, &Threading::default()).unwrap();
    let parallel = compose(
        &inputs,
        &plan,
        &brighten,
        &Threading {
            parallel: true,
            threads: Some(2),
        },
    )
    .unwrap();

    assert_eq!(sequential.frames.len(), parallel.frames.len());
    for (s, p) in sequential.frames.iter().zip(&parallel.frames) {
        assert_eq!(s.image, p.image);
    }
}

#[test]
fn first_input_transparency_lands_on_merged_frame_zero() {
    let mut a = shaded_animation(&[10, 20], 0.1);
    a.frames[0].transparency = Some(5);
    let inputs = vec![a];
    let plan = AlignmentPlan {
        rows: vec![vec![0, 1]],
        tick_count: 2,
        tick_duration: 0.1,
        target: 0,
    };

    // The merger builds fresh frames, so any metadata on the output can
    // only have been carried by the compositor.
    let fresh = |frames: &[&Frame]| -> FuseResult<Frame> {
        Ok(Frame::new(frames[0].image.clone(), 0.0))
    };

    let merged = compose(&inputs, &plan, &fresh, &Threading::default()).unwrap();
    assert_eq!(merged.frames[0].transparency, Some(5));
    assert_eq!(merged.frames[1].transparency, None);
}

#[test]
fn zero_worker_threads_are_rejected() {
    let a = shaded_animation(&[10, 20], 0.1);
    let inputs = vec![a];
    let plan = AlignmentPlan {
        rows: vec![vec![0, 1]],
        tick_count: 2,
        tick_duration: 0.1,
        target: 0,
    };

    let result = compose(
        &inputs,
        &plan,
        &identity_merge,
        &Threading {
            parallel: true,
            threads: Some(0),
        },
    );
    assert!(matches!(result, Err(FuseError::InvalidInput(_))));
}

#[test]
fn plan_and_input_shapes_must_agree() {
    let a = shaded_animation(&[10, 20], 0.1);
    let inputs = vec![a];

    let wrong_width = AlignmentPlan {
        rows: vec![vec![0, 1], vec![0, 1]],
        tick_count: 2,
        tick_duration: 0.1,
        target: 0,
    };
    assert!(compose(&inputs, &wrong_width, &identity_merge, &Threading::default()).is_err());

    let out_of_bounds = AlignmentPlan {
        rows: vec![vec![0, 2]],
        tick_count: 2,
        tick_duration: 0.1,
        target: 0,
    };
    assert!(compose(&inputs, &out_of_bounds, &identity_merge, &Threading::default()).is_err());
}
