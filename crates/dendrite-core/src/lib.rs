mod builder;
mod context;
mod envelope;
mod error;
mod executor;
mod next;
mod observer;
mod step;

pub use builder::Chain;
pub use context::RunningContext;
pub use envelope::{ChainResult, SuccessEnvelope, OK_STATUS};
pub use error::{
    ErrorBody, ErrorEnvelope, ErrorRecord, DEFAULT_ERROR_MESSAGE, DEFAULT_ERROR_STATUS,
};
pub use executor::ChainExecutor;
pub use next::{Next, Signal};
pub use observer::{
    ChainObserver, NoopObserver, ObserverEvent, RecordingObserver, TracingObserver,
};
pub use step::{step_fn, BoxStep, FnStep, Step, StepFuture};

/// Key under which the invocation event is seeded into the running context.
pub const EVENT_KEY: &str = "event";
/// Key under which the invocation context is seeded into the running context.
pub const CONTEXT_KEY: &str = "context";
/// Bookkeeping key tracking the currently-executing step's name.
pub const CURRENT_STEP_KEY: &str = "__current_step__";
/// Display name for a step that does not declare one.
pub const ANONYMOUS_STEP: &str = "anonymous function";
/// Display name used when a failure cannot be attributed to any step.
pub const UNKNOWN_STEP: &str = "unknown function";
