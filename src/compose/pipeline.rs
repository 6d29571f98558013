use crate::{
    compose::merge::{FrameMerger, Threading, compose},
    encode::{
        budget::{GovernorStats, SizeBudget, govern},
        gif::encode_png,
    },
    foundation::error::{FuseError, FuseResult},
    sequence::frame::FrameSequence,
    timeline::align::{AlignmentPlan, ExtendPolicy, plan_alignment},
};

/// Per-call configuration for [`merge_sequences`].
#[derive(Clone, Debug, Default)]
pub struct MergeOptions {
    pub policy: ExtendPolicy,
    pub budget: SizeBudget,
    pub threading: Threading,
}

/// What the output payload contains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum OutputKind {
    /// A single PNG still.
    Still,
    /// A looping GIF animation.
    Animation,
}

/// Encoded result of one merge call.
#[derive(Clone, Debug)]
pub struct EncodedOutput {
    pub bytes: Vec<u8>,
    pub kind: OutputKind,
    pub width: u32,
    pub height: u32,
    pub frame_count: usize,
    /// Final seconds-per-frame; `0.0` for a still.
    pub duration: f64,
    pub stats: GovernorStats,
}

/// Merge input sequences with a caller-supplied composition function and
/// encode the result under the size budget.
///
/// The path depends on how many inputs are animated:
/// - none: `merger` runs once on the single-frame tuple and the result is
///   a PNG still; no timeline or governor frame logic is involved.
/// - one: the animated input's own native timeline drives the merge and
///   every still input is held constant at each tick.
/// - two or more: the animated inputs are aligned onto a common clock
///   (see [`plan_alignment`]), stills held constant, and the merged frames
///   go through the size governor.
#[tracing::instrument(skip(inputs, merger), fields(input_count = inputs.len()))]
pub fn merge_sequences<M: FrameMerger>(
    inputs: &[FrameSequence],
    merger: &M,
    options: &MergeOptions,
) -> FuseResult<EncodedOutput> {
    if inputs.is_empty() {
        return Err(FuseError::invalid_input(
            "merging requires at least one input sequence",
        ));
    }
    options.budget.validate()?;

    let animated: Vec<usize> = inputs
        .iter()
        .enumerate()
        .filter(|(_, seq)| seq.is_animated())
        .map(|(i, _)| i)
        .collect();

    if animated.is_empty() {
        return merge_stills(inputs, merger);
    }

    let plan = if animated.len() == 1 {
        native_timeline_plan(inputs, animated[0])
    } else {
        let subset: Vec<&FrameSequence> = animated.iter().map(|&i| &inputs[i]).collect();
        let sub_plan = plan_alignment(&subset, options.policy, options.budget.max_frames)?;
        expand_plan(sub_plan, inputs, &animated)
    };

    let merged = compose(inputs, &plan, merger, &options.threading)?;
    let governed = govern(merged.frames, merged.duration, options.budget)?;

    Ok(EncodedOutput {
        bytes: governed.bytes,
        kind: OutputKind::Animation,
        width: governed.width,
        height: governed.height,
        frame_count: governed.frame_count,
        duration: governed.duration,
        stats: governed.stats,
    })
}

fn merge_stills<M: FrameMerger>(
    inputs: &[FrameSequence],
    merger: &M,
) -> FuseResult<EncodedOutput> {
    let gathered: Vec<_> = inputs.iter().map(|seq| seq.frame(0)).collect();
    let mut frame = merger
        .merge(&gathered)
        .map_err(|e| FuseError::merge_function(0, e.to_string()))?;
    frame.transparency = inputs[0].frame(0).transparency;

    let bytes = encode_png(&frame.image)?;
    Ok(EncodedOutput {
        kind: OutputKind::Still,
        width: frame.width(),
        height: frame.height(),
        frame_count: 1,
        duration: 0.0,
        stats: GovernorStats::default(),
        bytes,
    })
}

/// Plan for the single-animated path: the animated input plays its own
/// frames in order and every still input is pinned to frame 0. No
/// alignment computation is involved.
fn native_timeline_plan(inputs: &[FrameSequence], animated: usize) -> AlignmentPlan {
    let tick_count = inputs[animated].frame_count();
    let rows = inputs
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i == animated {
                (0..tick_count).collect()
            } else {
                vec![0; tick_count]
            }
        })
        .collect();
    AlignmentPlan {
        rows,
        tick_count,
        tick_duration: inputs[animated].average_duration(),
        target: animated,
    }
}

/// Widen a plan computed over the animated subset to cover every input,
/// pinning stills to frame 0 at each tick.
fn expand_plan(
    sub_plan: AlignmentPlan,
    inputs: &[FrameSequence],
    animated: &[usize],
) -> AlignmentPlan {
    let tick_count = sub_plan.tick_count;
    let target = animated[sub_plan.target];
    let mut sub_rows = sub_plan.rows.into_iter();

    let rows = inputs
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if animated.contains(&i) {
                sub_rows.next().unwrap_or_default()
            } else {
                vec![0; tick_count]
            }
        })
        .collect();

    AlignmentPlan {
        rows,
        tick_count,
        tick_duration: sub_plan.tick_duration,
        target,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/pipeline.rs"]
mod tests;
