use crate::{
    foundation::error::{FuseError, FuseResult},
    sequence::frame::FrameSequence,
};

/// Rule for lengthening the reference timeline when another input's total
/// playtime exceeds it by at least one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ExtendPolicy {
    /// Keep the reference timeline as-is; longer inputs clip, shorter
    /// inputs wrap.
    NoExtend,
    /// Prepend held copies of the first frame.
    ExtendFirst,
    /// Append held copies of the last frame.
    ExtendLast,
    /// Append whole repetitions of the reference cycle until every input's
    /// loop boundary nearly coincides with a merged-timeline tick.
    #[default]
    ExtendLoop,
}

/// Which source frame each input shows at every merged-timeline tick.
///
/// `rows[i][t]` is the frame index of input `i` at tick `t`; all rows have
/// length [`tick_count`](Self::tick_count) and every value lies in
/// `[0, frame_count_i)`.
#[derive(Clone, Debug, serde::Serialize)]
pub struct AlignmentPlan {
    pub rows: Vec<Vec<usize>>,
    pub tick_count: usize,
    /// Seconds per merged tick, fixed by the finest-grained input.
    pub tick_duration: f64,
    /// Position of the input whose clock the merged timeline follows.
    pub target: usize,
}

/// Align animated inputs onto one common virtual frame clock.
///
/// The input with the smallest representative duration (finest temporal
/// resolution) becomes the target: the merged output plays at its
/// per-frame duration, maximizing fidelity. Ties break to the first such
/// input. Other inputs are sampled at each tick's start instant against
/// their own clocks, wrapping when exhausted, so shorter inputs loop to
/// cover the merged timeline.
///
/// `max_frames` caps how far [`ExtendPolicy::ExtendLoop`] may grow the
/// timeline; it is the same ceiling the size governor enforces later.
#[tracing::instrument(skip(inputs), fields(input_count = inputs.len()))]
pub fn plan_alignment(
    inputs: &[&FrameSequence],
    policy: ExtendPolicy,
    max_frames: usize,
) -> FuseResult<AlignmentPlan> {
    if inputs.is_empty() {
        return Err(FuseError::invalid_input(
            "timeline alignment requires at least one input",
        ));
    }

    let mut metas = Vec::with_capacity(inputs.len());
    for (i, seq) in inputs.iter().enumerate() {
        if !seq.is_animated() {
            return Err(FuseError::invalid_input(format!(
                "timeline alignment requires animated inputs, but input {i} has a single frame"
            )));
        }
        let duration = seq.average_duration();
        if !duration.is_finite() || duration <= 0.0 {
            return Err(FuseError::invalid_input(format!(
                "input {i} has a non-positive frame duration ({duration} s)"
            )));
        }
        metas.push((seq.frame_count(), duration));
    }

    // Finest temporal resolution wins; ties go to the first input.
    let mut target = 0;
    for (i, meta) in metas.iter().enumerate().skip(1) {
        if meta.1 < metas[target].1 {
            target = i;
        }
    }
    let (target_count, tick_duration) = metas[target];

    let mut target_indices: Vec<usize> = (0..target_count).collect();

    let target_total = target_count as f64 * tick_duration;
    let max_total = metas
        .iter()
        .map(|&(count, duration)| count as f64 * duration)
        .fold(0.0, f64::max);

    // Only extend when some input's full playtime exceeds the target's by
    // at least one tick; anything closer is absorbed by the wrap in the
    // sampling walk below.
    if max_total - target_total >= tick_duration {
        match policy {
            ExtendPolicy::NoExtend => {}
            ExtendPolicy::ExtendFirst => {
                let extra = ((max_total - target_total) / tick_duration).ceil() as usize;
                let mut extended = vec![0usize; extra];
                extended.extend_from_slice(&target_indices);
                target_indices = extended;
            }
            ExtendPolicy::ExtendLast => {
                let extra = ((max_total - target_total) / tick_duration).ceil() as usize;
                target_indices.extend(std::iter::repeat_n(target_count - 1, extra));
            }
            ExtendPolicy::ExtendLoop => {
                let cycles = loop_cycle_count(&metas, target, tick_duration, max_frames);
                let one_cycle = target_indices.clone();
                for _ in 1..cycles {
                    target_indices.extend_from_slice(&one_cycle);
                }
            }
        }
    }

    let tick_count = target_indices.len();

    let mut rows = Vec::with_capacity(inputs.len());
    for (i, &(count, duration)) in metas.iter().enumerate() {
        if i == target {
            rows.push(target_indices.clone());
            continue;
        }
        let own_total = count as f64 * duration;
        let mut row = Vec::with_capacity(tick_count);
        for tick in 0..tick_count {
            let instant = (tick as f64 * tick_duration) % own_total;
            // The clamp guards the float edge where `instant / duration`
            // lands exactly on `count`.
            let index = ((instant / duration) as usize).min(count - 1);
            row.push(index);
        }
        rows.push(row);
    }

    Ok(AlignmentPlan {
        rows,
        tick_count,
        tick_duration,
        target,
    })
}

/// How many whole target cycles the merged timeline spans under
/// [`ExtendPolicy::ExtendLoop`].
///
/// Stops as soon as every non-target input's total playtime divides the
/// merged playtime to within one tick (its loop seam lands on a merged
/// tick), or when one more cycle would exceed `max_frames`.
fn loop_cycle_count(
    metas: &[(usize, f64)],
    target: usize,
    tick_duration: f64,
    max_frames: usize,
) -> usize {
    let target_count = metas[target].0;
    let mut cycles = 1usize;
    loop {
        let merged_total = (cycles * target_count) as f64 * tick_duration;
        let seams_aligned = metas.iter().enumerate().all(|(i, &(count, duration))| {
            if i == target {
                return true;
            }
            let own_total = count as f64 * duration;
            let loops = merged_total / own_total;
            (loops - loops.round()).abs() * own_total <= tick_duration
        });
        if seams_aligned {
            return cycles;
        }
        if (cycles + 1) * target_count > max_frames {
            return cycles;
        }
        cycles += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/align.rs"]
mod tests;
