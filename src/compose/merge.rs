use rayon::prelude::*;

use crate::{
    foundation::error::{FuseError, FuseResult},
    sequence::frame::{Frame, FrameSequence},
    timeline::align::AlignmentPlan,
};

/// Caller-supplied composition seam, invoked once per merged-timeline tick
/// with one frame per input.
///
/// Implementations must be referentially transparent and side-effect-free:
/// the compositor may invoke them in any order, or in parallel across
/// ticks, and reassembles results in tick order afterwards.
pub trait FrameMerger: Sync {
    fn merge(&self, frames: &[&Frame]) -> FuseResult<Frame>;
}

impl<F> FrameMerger for F
where
    F: Fn(&[&Frame]) -> FuseResult<Frame> + Sync,
{
    fn merge(&self, frames: &[&Frame]) -> FuseResult<Frame> {
        self(frames)
    }
}

/// Threading configuration for per-tick composition.
#[derive(Clone, Debug)]
pub struct Threading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl Default for Threading {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
        }
    }
}

/// Output of the compositor: merged frames plus the shared tick duration.
#[derive(Clone, Debug)]
pub struct MergedSequence {
    pub frames: Vec<Frame>,
    /// Seconds per merged frame.
    pub duration: f64,
}

/// Apply `merger` at every tick of `plan`, gathering one frame per input.
///
/// Output frames appear in tick order regardless of threading. A merge
/// failure is terminal and reports the failing tick. The first input's
/// frame-0 transparency metadata is carried onto merged frame 0.
pub fn compose<M: FrameMerger>(
    inputs: &[FrameSequence],
    plan: &AlignmentPlan,
    merger: &M,
    threading: &Threading,
) -> FuseResult<MergedSequence> {
    if plan.rows.len() != inputs.len() {
        return Err(FuseError::invalid_input(format!(
            "alignment plan covers {} inputs, got {}",
            plan.rows.len(),
            inputs.len()
        )));
    }
    for (i, (row, seq)) in plan.rows.iter().zip(inputs).enumerate() {
        if row.len() != plan.tick_count {
            return Err(FuseError::invalid_input(format!(
                "alignment row {i} has {} ticks, expected {}",
                row.len(),
                plan.tick_count
            )));
        }
        if let Some(&bad) = row.iter().find(|&&idx| idx >= seq.frame_count()) {
            return Err(FuseError::invalid_input(format!(
                "alignment row {i} references frame {bad} of {} available",
                seq.frame_count()
            )));
        }
    }

    let merge_tick = |tick: usize| -> FuseResult<Frame> {
        let gathered: Vec<&Frame> = inputs
            .iter()
            .zip(&plan.rows)
            .map(|(seq, row)| seq.frame(row[tick]))
            .collect();
        merger.merge(&gathered)
    };

    let results: Vec<FuseResult<Frame>> = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| (0..plan.tick_count).into_par_iter().map(merge_tick).collect())
    } else {
        (0..plan.tick_count).map(merge_tick).collect()
    };

    let mut frames = Vec::with_capacity(results.len());
    for (tick, result) in results.into_iter().enumerate() {
        let mut frame = result.map_err(|e| FuseError::merge_function(tick, e.to_string()))?;
        frame.duration = plan.tick_duration;
        frames.push(frame);
    }

    if let Some(first) = frames.first_mut() {
        first.transparency = inputs[0].frame(0).transparency;
    }

    Ok(MergedSequence {
        frames,
        duration: plan.tick_duration,
    })
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> FuseResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FuseError::invalid_input(
            "threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FuseError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/merge.rs"]
mod tests;
