use crate::context::RunningContext;
use crate::next::Next;
use crate::step::{BoxStep, FnStep, Step, StepFuture};

/// Ordered collection of steps for one invocation.
///
/// Construction convenience only; the executor consumes the steps in the
/// order they were added.
#[derive(Default)]
pub struct Chain {
    steps: Vec<BoxStep>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Append a named function step.
    pub fn step_fn<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: for<'a> Fn(&'a mut RunningContext, Next) -> StepFuture<'a> + Send + Sync + 'static,
    {
        self.step(FnStep::named(name, func))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[BoxStep] {
        &self.steps
    }
}

impl From<Vec<BoxStep>> for Chain {
    fn from(steps: Vec<BoxStep>) -> Self {
        Self { steps }
    }
}
