use super::*;

fn frame(duration: f64) -> Frame {
    Frame::new(RgbaImage::new(2, 2), duration)
}

#[test]
fn empty_sequence_is_rejected() {
    assert!(matches!(
        FrameSequence::new(Vec::new()),
        Err(FuseError::InvalidInput(_))
    ));
}

#[test]
fn single_frame_has_no_timeline() {
    let seq = FrameSequence::new(vec![frame(0.5)]).unwrap();
    assert_eq!(seq.frame_count(), 1);
    assert!(!seq.is_animated());
    assert_eq!(seq.average_duration(), 0.0);
    assert_eq!(seq.total_duration(), 0.0);
}

#[test]
fn average_collapses_nonuniform_durations() {
    let seq = FrameSequence::new(vec![frame(0.1), frame(0.2), frame(0.3)]).unwrap();
    assert!(seq.is_animated());
    assert!((seq.average_duration() - 0.2).abs() < 1e-12);
    assert!((seq.total_duration() - 0.6).abs() < 1e-12);
}

#[test]
fn from_still_wraps_one_frame() {
    let seq = FrameSequence::from_still(RgbaImage::new(4, 3));
    assert_eq!(seq.frame_count(), 1);
    assert_eq!(seq.frame(0).width(), 4);
    assert_eq!(seq.frame(0).height(), 3);
    assert_eq!(seq.frame(0).transparency, None);
}
