use std::io::Cursor;

use anyhow::Context;
use image::{AnimationDecoder, ImageFormat, codecs::gif::GifDecoder};

use crate::{
    foundation::error::{FuseError, FuseResult},
    sequence::frame::{DEFAULT_FRAME_DURATION, Frame, FrameSequence},
};

/// Decode encoded image bytes into a materialized [`FrameSequence`].
///
/// GIF payloads decode frame-by-frame with their declared per-frame delays
/// (20 ms fallback when a frame declares none); every other container
/// decodes as a single-frame sequence. Decoding happens entirely up front
/// so the engine holds immutable buffers instead of seeking into a shared
/// handle.
pub fn decode_sequence(bytes: &[u8]) -> FuseResult<FrameSequence> {
    let format = image::guess_format(bytes).context("sniff image container")?;
    if format == ImageFormat::Gif {
        decode_gif(bytes)
    } else {
        decode_still(bytes)
    }
}

/// Decode bytes as a single still frame, regardless of container.
pub fn decode_still(bytes: &[u8]) -> FuseResult<FrameSequence> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(FrameSequence::from_still(dyn_img.to_rgba8()))
}

fn decode_gif(bytes: &[u8]) -> FuseResult<FrameSequence> {
    let decoder = GifDecoder::new(Cursor::new(bytes)).context("open gif stream")?;
    let source_frames = decoder
        .into_frames()
        .collect_frames()
        .context("decode gif frames")?;
    if source_frames.is_empty() {
        return Err(FuseError::invalid_input("gif stream contains no frames"));
    }

    let frames = source_frames
        .into_iter()
        .map(|frame| {
            let (numer_ms, denom_ms) = frame.delay().numer_denom_ms();
            let duration = if numer_ms == 0 {
                DEFAULT_FRAME_DURATION
            } else {
                f64::from(numer_ms) / f64::from(denom_ms) / 1000.0
            };
            Frame::new(frame.into_buffer(), duration)
        })
        .collect();

    FrameSequence::new(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/decode.rs"]
mod tests;
