//! Fixed-timestep accumulator and the Stopped/Running frame driver.

use crate::float::Float;

/// Whether wall-clock ticks advance the simulation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
}

/// What a frame did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Physics steps executed this frame.
    pub steps: usize,
    /// True when the step cap tripped and the backlog was dropped.
    pub clamped: bool,
}

/// Outcome of [`FixedTimestep::plan`]: how many steps to run now.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FramePlan<F: Float> {
    pub steps: usize,
    /// Seconds of backlog thrown away by the cap, zero when not clamped.
    pub dropped: F,
}

/// Accumulates wall-clock time and hands out whole fixed steps.
#[derive(Clone, Debug)]
pub struct FixedTimestep<F: Float> {
    state: LoopState,
    accumulator: F,
    last_timestamp: Option<F>,
}

impl<F: Float> Default for FixedTimestep<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> FixedTimestep<F> {
    pub fn new() -> Self {
        FixedTimestep { state: LoopState::Stopped, accumulator: F::zero(), last_timestamp: None }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn accumulator(&self) -> F {
        self.accumulator
    }

    /// Stopped -> Running. `now` is the wall-clock time in seconds the next
    /// tick is measured against. Returns false if already running.
    pub fn start(&mut self, now: F) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = LoopState::Running;
        self.last_timestamp = Some(now);
        true
    }

    /// Running -> Stopped. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = LoopState::Stopped;
        self.last_timestamp = None;
        true
    }

    /// Wall-clock seconds since the previous tick, or `None` while stopped.
    /// Clocks that go backwards yield zero.
    pub fn delta_since_last(&mut self, now: F) -> Option<F> {
        if !self.is_running() {
            return None;
        }
        let delta = match self.last_timestamp {
            Some(last) => (now - last).max(F::zero()),
            None => F::zero(),
        };
        self.last_timestamp = Some(now);
        Some(delta)
    }

    /// Add `delta` seconds and decide how many `fixed_dt` steps to run.
    ///
    /// At most `max_steps` are granted. If time for another step is still
    /// pending after that, the accumulator is reset to zero rather than
    /// carried over.
    pub fn plan(&mut self, delta: F, fixed_dt: F, max_steps: usize) -> FramePlan<F> {
        if delta.is_finite() && delta > F::zero() {
            self.accumulator = self.accumulator + delta;
        }
        let mut steps = 0;
        let mut dropped = F::zero();
        while self.accumulator >= fixed_dt {
            if steps == max_steps {
                dropped = self.accumulator;
                self.accumulator = F::zero();
                break;
            }
            self.accumulator = self.accumulator - fixed_dt;
            steps += 1;
        }
        FramePlan { steps, dropped }
    }

    /// Throw away pending time, e.g. after a pause.
    pub fn reset(&mut self) {
        self.accumulator = F::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn partial_step_carries_over() {
        let mut ts: FixedTimestep<f64> = FixedTimestep::new();
        let plan = ts.plan(DT * 1.5, DT, 5);
        assert_eq!(plan.steps, 1);
        assert!((ts.accumulator() - DT * 0.5).abs() < 1e-12);
        let plan = ts.plan(DT * 0.6, DT, 5);
        assert_eq!(plan.steps, 1);
    }

    #[test]
    fn cap_drops_backlog() {
        let mut ts: FixedTimestep<f64> = FixedTimestep::new();
        let plan = ts.plan(DT * 10.0, DT, 5);
        assert_eq!(plan.steps, 5);
        assert!(plan.dropped > 0.0);
        assert_eq!(ts.accumulator(), 0.0);
    }

    #[test]
    fn negative_and_nan_deltas_ignored() {
        let mut ts: FixedTimestep<f64> = FixedTimestep::new();
        assert_eq!(ts.plan(-1.0, DT, 5).steps, 0);
        assert_eq!(ts.plan(f64::NAN, DT, 5).steps, 0);
        assert_eq!(ts.accumulator(), 0.0);
    }

    #[test]
    fn state_transitions() {
        let mut ts: FixedTimestep<f64> = FixedTimestep::new();
        assert_eq!(ts.state(), LoopState::Stopped);
        assert_eq!(ts.delta_since_last(1.0), None);
        assert!(ts.start(10.0));
        assert!(!ts.start(11.0));
        assert_eq!(ts.delta_since_last(10.25), Some(0.25));
        assert_eq!(ts.delta_since_last(10.0), Some(0.0));
        assert!(ts.stop());
        assert!(!ts.stop());
        assert_eq!(ts.delta_since_last(12.0), None);
    }
}
