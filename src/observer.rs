//! Step observer trait for monitoring physics simulation progress.

/// Trait for observing physics simulation steps.
///
/// Hooks fire in pipeline order. All methods have default no-op
/// implementations.
pub trait StepObserver {
    /// Called after gravity has been accumulated into every dynamic body.
    fn on_forces(&mut self) {}

    /// Called after all Euler and Verlet bodies have been integrated.
    fn on_integrate(&mut self) {}

    /// Called after each constraint iteration.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called after collision resolution with the number of resolved contacts.
    fn on_collisions(&mut self, _contacts: usize) {}

    /// Called after boundary handling.
    fn on_boundaries(&mut self) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self) {}

    /// Called when a frame hit the step cap and dropped `_dropped` seconds of
    /// accumulated time.
    fn on_frame_clamped(&mut self, _dropped: f64) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
