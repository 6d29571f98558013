use std::io::Cursor;
use std::time::Duration;

use image::{
    Delay, ImageFormat, RgbaImage,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::{
    foundation::error::{FuseError, FuseResult},
    sequence::frame::{Frame, FrameSequence},
};

// LZW compression effort passed to the GIF encoder (1 = best, 30 = fastest).
const GIF_ENCODE_SPEED: i32 = 10;

/// Encode frames as an infinitely looping GIF with a uniform
/// seconds-per-frame delay.
pub fn encode_gif(frames: &[Frame], seconds_per_frame: f64) -> FuseResult<Vec<u8>> {
    if frames.is_empty() {
        return Err(FuseError::invalid_input(
            "gif encoding requires at least one frame",
        ));
    }

    let delay = Delay::from_saturating_duration(Duration::from_secs_f64(
        seconds_per_frame.max(0.0),
    ));

    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, GIF_ENCODE_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| FuseError::encoding(format!("set gif repeat: {e}")))?;
        for (i, frame) in frames.iter().enumerate() {
            let out_frame = image::Frame::from_parts(frame.image.clone(), 0, 0, delay);
            encoder
                .encode_frame(out_frame)
                .map_err(|e| FuseError::encoding(format!("encode gif frame {i}: {e}")))?;
        }
    }
    Ok(bytes)
}

/// Encode a single raster buffer as PNG.
pub fn encode_png(image: &RgbaImage) -> FuseResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| FuseError::encoding(format!("encode png: {e}")))?;
    Ok(bytes)
}

/// Export every frame of a sequence as its own PNG payload.
pub fn encode_frames_png(sequence: &FrameSequence) -> FuseResult<Vec<Vec<u8>>> {
    sequence
        .frames()
        .iter()
        .map(|frame| encode_png(&frame.image))
        .collect()
}
