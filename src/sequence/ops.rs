use image::RgbaImage;

use crate::{
    foundation::error::{FuseError, FuseResult},
    sequence::frame::{Frame, FrameSequence, MIN_FRAME_DURATION},
};

impl FrameSequence {
    /// Frames in reverse playback order, per-frame durations preserved.
    pub fn reversed(&self) -> FrameSequence {
        let frames: Vec<Frame> = self.frames().iter().rev().cloned().collect();
        FrameSequence { frames }
    }

    /// Forward playback followed by backward playback, omitting the final
    /// frame from the mirrored half so the turning point is not doubled.
    pub fn bounced(&self) -> FrameSequence {
        let frames = self.frames();
        let mut out: Vec<Frame> = frames.to_vec();
        out.extend(frames[..frames.len() - 1].iter().rev().cloned());
        FrameSequence { frames: out }
    }

    /// Re-time every frame to a uniform seconds-per-frame value.
    ///
    /// Values below [`MIN_FRAME_DURATION`] are rejected.
    pub fn retimed(&self, seconds_per_frame: f64) -> FuseResult<FrameSequence> {
        if !seconds_per_frame.is_finite() || seconds_per_frame < MIN_FRAME_DURATION {
            return Err(FuseError::invalid_input(format!(
                "frame duration must be at least {MIN_FRAME_DURATION} s (at most {:.0} fps), got {seconds_per_frame} s",
                1.0 / MIN_FRAME_DURATION,
            )));
        }
        let frames = self
            .frames()
            .iter()
            .map(|f| Frame {
                duration: seconds_per_frame,
                ..f.clone()
            })
            .collect();
        Ok(FrameSequence { frames })
    }

    /// Build an animation from still images on a uniform clock.
    pub fn from_stills(images: Vec<RgbaImage>, seconds_per_frame: f64) -> FuseResult<FrameSequence> {
        if !seconds_per_frame.is_finite() || seconds_per_frame <= 0.0 {
            return Err(FuseError::invalid_input(format!(
                "frame duration must be positive, got {seconds_per_frame} s"
            )));
        }
        let frames: Vec<Frame> = images
            .into_iter()
            .map(|image| Frame::new(image, seconds_per_frame))
            .collect();
        FrameSequence::new(frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/ops.rs"]
mod tests;
