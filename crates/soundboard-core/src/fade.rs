//! Time-based volume ramps for playback instances.
//!
//! Each instance has at most one active fade. Starting a new fade on an
//! instance replaces the one in flight, so the volume never follows two
//! trajectories at once. The engine only computes values; the registry owns
//! the voices and applies each [`FadeStep`] it gets back.

use crate::backend::InstanceId;
use std::collections::BTreeMap;
use std::time::Duration;

/// What happens to the instance once its fade reaches the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeCompletion {
    /// Nothing; the instance keeps playing at the target volume.
    Hold,
    /// Pause the instance.
    Pause,
    /// Pause, rewind and release the instance.
    Stop,
}

/// An active volume fade on one instance.
#[derive(Clone, Debug)]
pub struct FadeJob {
    /// Instance being faded.
    pub instance: InstanceId,
    /// Volume when the fade started.
    pub start_value: f32,
    /// Volume to reach.
    pub target_value: f32,
    /// Time spent so far.
    pub elapsed: Duration,
    /// Total length.
    pub duration: Duration,
    /// Action applied once complete.
    pub completion: FadeCompletion,
}

impl FadeJob {
    pub fn new(
        instance: InstanceId,
        start_value: f32,
        target_value: f32,
        duration: Duration,
        completion: FadeCompletion,
    ) -> Self {
        Self {
            instance,
            start_value,
            target_value,
            elapsed: Duration::ZERO,
            duration,
            completion,
        }
    }

    /// Interpolated volume at the current elapsed time.
    pub fn current_value(&self) -> f32 {
        if self.is_complete() {
            return self.target_value;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.start_value + (self.target_value - self.start_value) * t as f32
    }

    /// Whether the fade has reached its target.
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Volume update produced by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct FadeStep {
    pub instance: InstanceId,
    pub volume: f32,
    /// Set when the fade finished with this step.
    pub finished: Option<FadeCompletion>,
}

/// Scheduler for all fades of one registry.
#[derive(Debug, Default)]
pub struct FadeEngine {
    jobs: BTreeMap<InstanceId, FadeJob>,
}

impl FadeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fade, replacing any fade already running on the instance.
    ///
    /// A zero-length fade is not scheduled; its final step is returned so the
    /// caller can apply it right away.
    pub fn start(&mut self, job: FadeJob) -> Option<FadeStep> {
        if self.jobs.remove(&job.instance).is_some() {
            log::trace!("Fade on {} replaced", job.instance);
        }
        if job.duration.is_zero() {
            return Some(FadeStep {
                instance: job.instance,
                volume: job.target_value,
                finished: Some(job.completion),
            });
        }
        self.jobs.insert(job.instance, job);
        None
    }

    /// Drop the fade of an instance that no longer exists.
    pub fn forget(&mut self, instance: InstanceId) -> Option<FadeJob> {
        self.jobs.remove(&instance)
    }

    /// Advance every fade by `delta` and report the new volumes.
    pub fn advance(&mut self, delta: Duration) -> Vec<FadeStep> {
        let mut steps = Vec::with_capacity(self.jobs.len());
        self.jobs.retain(|instance, job| {
            job.elapsed = job.elapsed.saturating_add(delta);
            let done = job.is_complete();
            steps.push(FadeStep {
                instance: *instance,
                volume: job.current_value(),
                finished: done.then_some(job.completion),
            });
            !done
        });
        steps
    }

    /// The active fade of an instance, if any.
    pub fn job(&self, instance: InstanceId) -> Option<&FadeJob> {
        self.jobs.get(&instance)
    }

    pub fn is_fading(&self, instance: InstanceId) -> bool {
        self.jobs.contains_key(&instance)
    }

    /// Number of active fades.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Drop every fade.
    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}
