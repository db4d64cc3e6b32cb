use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::context::RunningContext;
use crate::error::ErrorRecord;
use crate::next::Next;

/// A single unit of middleware work.
///
/// A step signals completion through `next` (callback convention) or by
/// returning `Err` from its own future (awaitable convention); the executor
/// observes both channels at once. Returning `Ok(())` is not a completion
/// signal on its own.
#[async_trait]
pub trait Step: Send + Sync {
    /// The step's declared identifier. Unnamed steps are displayed as
    /// `"anonymous function"`.
    fn name(&self) -> Option<&str> {
        None
    }

    async fn run(&self, data: &mut RunningContext, next: Next) -> Result<(), ErrorRecord>;

    /// Type-erase for storage in a heterogeneous chain.
    fn boxed(self) -> BoxStep
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// A type-erased step.
pub type BoxStep = Box<dyn Step>;

/// The future returned by a function step.
pub type StepFuture<'a> = BoxFuture<'a, Result<(), ErrorRecord>>;

/// Wraps a plain function as a [`Step`], so free functions can join a chain
/// without a dedicated type.
pub struct FnStep<F> {
    name: Option<String>,
    func: F,
}

impl<F> FnStep<F>
where
    F: for<'a> Fn(&'a mut RunningContext, Next) -> StepFuture<'a> + Send + Sync,
{
    /// An anonymous function step.
    pub fn new(func: F) -> Self {
        Self { name: None, func }
    }

    pub fn named(name: impl Into<String>, func: F) -> Self {
        Self {
            name: Some(name.into()),
            func,
        }
    }
}

#[async_trait]
impl<F> Step for FnStep<F>
where
    F: for<'a> Fn(&'a mut RunningContext, Next) -> StepFuture<'a> + Send + Sync,
{
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn run(&self, data: &mut RunningContext, next: Next) -> Result<(), ErrorRecord> {
        (self.func)(data, next).await
    }
}

/// Convenience constructor for a named function step.
pub fn step_fn<F>(name: impl Into<String>, func: F) -> FnStep<F>
where
    F: for<'a> Fn(&'a mut RunningContext, Next) -> StepFuture<'a> + Send + Sync,
{
    FnStep::named(name, func)
}
