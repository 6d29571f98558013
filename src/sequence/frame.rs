use image::RgbaImage;

use crate::foundation::error::{FuseError, FuseResult};

/// Fallback seconds-per-frame for source frames that declare no duration.
pub const DEFAULT_FRAME_DURATION: f64 = 0.020;

/// Smallest seconds-per-frame accepted when re-timing a sequence. GIF
/// viewers misrender delays shorter than this (above 50 fps).
pub const MIN_FRAME_DURATION: f64 = 0.020;

/// One still raster frame within a sequence.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Straight (non-premultiplied) RGBA8 pixels.
    pub image: RgbaImage,
    /// Display time in seconds this frame declares for itself.
    pub duration: f64,
    /// GIF transparent-color index, carried as-is from the source
    /// container. The engine never interprets it; it is forwarded from
    /// the first input's frame 0 to merged frame 0 only.
    pub transparency: Option<u8>,
}

impl Frame {
    pub fn new(image: RgbaImage, duration: f64) -> Self {
        Self {
            image,
            duration,
            transparency: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Ordered, non-empty frames of one input, materialized up front.
///
/// A sequence owns its frames exclusively; the compositor reads but never
/// mutates them, and nothing persists across merge calls.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    pub(crate) frames: Vec<Frame>,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>) -> FuseResult<Self> {
        if frames.is_empty() {
            return Err(FuseError::invalid_input(
                "frame sequence must contain at least one frame",
            ));
        }
        Ok(Self { frames })
    }

    /// Wrap a single still image as a one-frame sequence.
    pub fn from_still(image: RgbaImage) -> Self {
        Self {
            frames: vec![Frame::new(image, 0.0)],
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[index]
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Representative seconds-per-frame for the whole sequence.
    ///
    /// Individual source frames may declare non-uniform durations; they are
    /// collapsed to their mean. A single-frame sequence has no timeline and
    /// reports `0.0`.
    pub fn average_duration(&self) -> f64 {
        if self.frames.len() == 1 {
            return 0.0;
        }
        let total: f64 = self.frames.iter().map(|f| f.duration).sum();
        total / self.frames.len() as f64
    }

    /// Total playtime under the representative duration.
    pub fn total_duration(&self) -> f64 {
        self.frames.len() as f64 * self.average_duration()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/frame.rs"]
mod tests;
