//! Framefuse composes animated image sequences (GIF-style: ordered frames,
//! each with its own display duration) into a single merged output under a
//! byte-size budget.
//!
//! # Pipeline overview
//!
//! 1. **Materialize**: decode each input up front into an immutable
//!    [`FrameSequence`] (no shared seek cursors).
//! 2. **Align**: [`plan_alignment`] picks the finest-grained input as the
//!    merged clock and maps every other input onto it, extending the
//!    timeline per [`ExtendPolicy`].
//! 3. **Compose**: a caller-supplied [`FrameMerger`] runs once per tick
//!    (optionally in parallel) to produce the merged frames.
//! 4. **Govern**: [`govern`] encodes the result and decimates frames or
//!    downscales dimensions until it fits the [`SizeBudget`].
//!
//! [`merge_sequences`] is the one-shot entry point that dispatches between
//! the still path (single PNG) and the animated pipeline above.
//!
//! The engine is stateless between calls, holds no IO surface, and leaves
//! `unsafe` forbidden.
#![forbid(unsafe_code)]

mod compose;
mod encode;
mod foundation;
mod sequence;
mod timeline;

pub use compose::merge::{FrameMerger, MergedSequence, Threading, compose};
pub use compose::pipeline::{EncodedOutput, MergeOptions, OutputKind, merge_sequences};
pub use encode::budget::{GovernedOutput, GovernorStats, MIN_DIMENSION, SizeBudget, govern};
pub use encode::gif::{encode_frames_png, encode_gif, encode_png};
pub use foundation::error::{FuseError, FuseResult};
pub use sequence::decode::{decode_sequence, decode_still};
pub use sequence::frame::{DEFAULT_FRAME_DURATION, Frame, FrameSequence, MIN_FRAME_DURATION};
pub use timeline::align::{AlignmentPlan, ExtendPolicy, plan_alignment};
