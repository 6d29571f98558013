use image::imageops::{self, FilterType};

use crate::{
    encode::gif::encode_gif,
    foundation::error::{FuseError, FuseResult},
    sequence::frame::Frame,
};

/// Smallest width or height the governor will downscale to before giving
/// up with [`FuseError::BudgetUnattainable`].
pub const MIN_DIMENSION: u32 = 16;

const DOWNSCALE_FACTOR: f64 = 0.9;

/// Output size ceiling: encoded bytes and frame count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SizeBudget {
    pub max_bytes: usize,
    pub max_frames: usize,
}

impl Default for SizeBudget {
    fn default() -> Self {
        Self {
            max_bytes: 10_000_000,
            max_frames: 100,
        }
    }
}

impl SizeBudget {
    pub fn validate(&self) -> FuseResult<()> {
        if self.max_bytes == 0 {
            return Err(FuseError::invalid_input("budget max_bytes must be > 0"));
        }
        if self.max_frames == 0 {
            return Err(FuseError::invalid_input("budget max_frames must be > 0"));
        }
        Ok(())
    }
}

/// Degradation counters for one governed encode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct GovernorStats {
    pub encode_attempts: u32,
    pub decimation_passes: u32,
    pub downscale_passes: u32,
}

/// A governed encode: the payload plus what it ended up as.
#[derive(Clone, Debug)]
pub struct GovernedOutput {
    pub bytes: Vec<u8>,
    pub frame_count: usize,
    pub width: u32,
    pub height: u32,
    /// Final seconds-per-frame (scaled up by decimation passes).
    pub duration: f64,
    pub stats: GovernorStats,
}

/// Encode `frames` as a GIF no larger than the budget, using the minimum
/// necessary degradation.
///
/// Each pass encodes and measures. Over budget with too many frames →
/// decimate down to `max_frames` in one pass, scaling the duration so
/// total playtime is preserved. Over budget within the frame cap →
/// downscale every frame by ×0.9 and try again. The passes are inherently
/// sequential; each depends on the previous measured size.
#[tracing::instrument(skip(frames), fields(frame_count = frames.len()))]
pub fn govern(frames: Vec<Frame>, duration: f64, budget: SizeBudget) -> FuseResult<GovernedOutput> {
    budget.validate()?;
    let mut stats = GovernorStats::default();
    govern_pass(frames, duration, budget, &mut stats)
}

fn govern_pass(
    frames: Vec<Frame>,
    duration: f64,
    budget: SizeBudget,
    stats: &mut GovernorStats,
) -> FuseResult<GovernedOutput> {
    let bytes = encode_gif(&frames, duration)?;
    stats.encode_attempts += 1;

    if bytes.len() <= budget.max_bytes {
        return Ok(GovernedOutput {
            frame_count: frames.len(),
            width: frames[0].width(),
            height: frames[0].height(),
            duration,
            stats: *stats,
            bytes,
        });
    }

    if frames.len() > budget.max_frames {
        let ratio = frames.len() as f64 / budget.max_frames as f64;
        let last = frames.len() - 1;
        let decimated: Vec<Frame> = (0..budget.max_frames)
            .map(|i| frames[((i as f64 * ratio) as usize).min(last)].clone())
            .collect();
        stats.decimation_passes += 1;
        tracing::debug!(
            from = frames.len(),
            to = decimated.len(),
            bytes = bytes.len(),
            "over budget, decimating frames"
        );
        return govern_pass(decimated, duration * ratio, budget, stats);
    }

    let (width, height) = (frames[0].width(), frames[0].height());
    let scaled_width = (f64::from(width) * DOWNSCALE_FACTOR) as u32;
    let scaled_height = (f64::from(height) * DOWNSCALE_FACTOR) as u32;
    if scaled_width < MIN_DIMENSION || scaled_height < MIN_DIMENSION {
        return Err(FuseError::budget_unattainable(format!(
            "{} bytes at {width}x{height} with {} frames still exceeds {} bytes; \
             refusing to downscale below {MIN_DIMENSION}px",
            bytes.len(),
            frames.len(),
            budget.max_bytes,
        )));
    }

    tracing::debug!(
        %scaled_width,
        %scaled_height,
        bytes = bytes.len(),
        "over budget, downscaling frames"
    );
    let scaled: Vec<Frame> = frames
        .into_iter()
        .map(|frame| {
            let image = imageops::resize(
                &frame.image,
                (f64::from(frame.image.width()) * DOWNSCALE_FACTOR) as u32,
                (f64::from(frame.image.height()) * DOWNSCALE_FACTOR) as u32,
                FilterType::CatmullRom,
            );
            Frame { image, ..frame }
        })
        .collect();
    stats.downscale_passes += 1;
    govern_pass(scaled, duration, budget, stats)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/budget.rs"]
mod tests;
