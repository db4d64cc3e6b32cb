use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot::error::TryRecvError;

use crate::builder::Chain;
use crate::context::RunningContext;
use crate::envelope::{ChainResult, SuccessEnvelope};
use crate::error::{ErrorEnvelope, ErrorRecord};
use crate::next::{Next, Signal};
use crate::observer::{ChainObserver, NoopObserver};
use crate::step::{BoxStep, Step};
use crate::ANONYMOUS_STEP;

/// Drives an ordered chain of steps over a shared running context.
///
/// Constructed once from the opaque invocation pair; each [`run`] seeds a
/// fresh context from it, so separate runs share no mutable state.
///
/// There is no timeout or cancellation: a step that never signals completion
/// while its future is still pending stalls the chain indefinitely.
///
/// [`run`]: ChainExecutor::run
pub struct ChainExecutor {
    event: Value,
    context: Value,
    observer: Arc<dyn ChainObserver>,
}

impl ChainExecutor {
    /// The invocation pair is stored as-is; both values are opaque payloads
    /// and no validation is performed.
    pub fn new(event: Value, context: Value) -> Self {
        Self {
            event,
            context,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replace the default no-op observability hook.
    pub fn with_observer(mut self, observer: Arc<dyn ChainObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run every step strictly in order, waiting for each step's completion
    /// signal before advancing.
    ///
    /// The first captured failure stops the chain (remaining steps are
    /// never invoked) and surfaces as an [`ErrorEnvelope`] on the error
    /// channel. If every step succeeds, the final running context is
    /// returned as a [`SuccessEnvelope`] with the seed and bookkeeping keys
    /// stripped. A chain of zero steps succeeds with an empty payload.
    pub async fn run(&self, chain: &Chain) -> ChainResult {
        self.run_steps(chain.steps()).await
    }

    /// [`run`](ChainExecutor::run) over a plain slice of boxed steps.
    pub async fn run_steps(&self, steps: &[BoxStep]) -> ChainResult {
        let mut data = RunningContext::seeded(self.event.clone(), self.context.clone());

        for (index, step) in steps.iter().enumerate() {
            let name = step.name().unwrap_or(ANONYMOUS_STEP).to_string();
            data.set_current_step(&name);
            self.observer.on_step_start(index, &name);

            match drive(step.as_ref(), &mut data).await {
                Signal::Proceed(None) => {}
                Signal::Proceed(Some(replacement)) => {
                    data = RunningContext::from_map(replacement);
                }
                Signal::Fail(mut record) => {
                    record.attribute_to(&name);
                    self.observer.on_step_failure(&name, &record);
                    let envelope = ErrorEnvelope::from_record(record, Some(&name));
                    self.observer.on_chain_complete(envelope.status);
                    return Err(envelope);
                }
            }
        }

        let envelope = SuccessEnvelope::new(data.into_payload());
        self.observer.on_chain_complete(envelope.status);
        Ok(envelope)
    }
}

/// Drive a single step to its completion signal.
///
/// Two channels are observed at once: the continuation latch and the step's
/// own future. Whichever produces a signal first wins; once the latch
/// settles, the future is dropped, cancelling any work the step left running
/// past its signal.
async fn drive(step: &dyn Step, data: &mut RunningContext) -> Signal {
    let (next, mut rx) = Next::latch();
    let mut fut = step.run(data, next);

    tokio::select! {
        biased;

        latched = &mut rx => match latched {
            Ok(signal) => signal,
            // Every continuation handle was dropped unsignaled; only the
            // future itself can decide the outcome now.
            Err(_) => match fut.await {
                Ok(()) => unsignaled(),
                Err(record) => Signal::Fail(record),
            },
        },
        finished = &mut fut => {
            // The step may have settled the latch in the same poll that
            // finished its future; a signal already sent fired first.
            match rx.try_recv() {
                Ok(signal) => signal,
                Err(TryRecvError::Closed) => match finished {
                    Err(record) => Signal::Fail(record),
                    Ok(()) => unsignaled(),
                },
                Err(TryRecvError::Empty) => match finished {
                    Err(record) => Signal::Fail(record),
                    // A continuation handle is still alive somewhere; the
                    // future resolving cleanly is not a completion signal,
                    // so keep waiting for the latch.
                    Ok(()) => match rx.await {
                        Ok(signal) => signal,
                        Err(_) => unsignaled(),
                    },
                },
            }
        },
    }
}

/// A step that finished without ever signaling can never complete; surface
/// the violation instead of stalling.
fn unsignaled() -> Signal {
    Signal::Fail(ErrorRecord::new("step completed without signaling"))
}
