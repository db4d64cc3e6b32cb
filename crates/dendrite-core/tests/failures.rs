use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use dendrite_core::{
    Chain, ChainExecutor, ErrorRecord, Next, RunningContext, Step, ANONYMOUS_STEP,
    DEFAULT_ERROR_MESSAGE,
};

/// Fails through the continuation with the given record.
struct FailVia {
    name: &'static str,
    record: ErrorRecord,
}

#[async_trait]
impl Step for FailVia {
    fn name(&self) -> Option<&str> {
        Some(self.name)
    }

    async fn run(&self, _data: &mut RunningContext, next: Next) -> Result<(), ErrorRecord> {
        next.fail(self.record.clone());
        Ok(())
    }
}

/// Fails by returning `Err` from its own future, never touching `next`.
struct FailReturn {
    name: &'static str,
    record: ErrorRecord,
}

#[async_trait]
impl Step for FailReturn {
    fn name(&self) -> Option<&str> {
        Some(self.name)
    }

    async fn run(&self, _data: &mut RunningContext, _next: Next) -> Result<(), ErrorRecord> {
        Err(self.record.clone())
    }
}

/// Counts invocations, then succeeds.
struct Counting {
    name: &'static str,
    count: Arc<AtomicUsize>,
}

#[async_trait]
impl Step for Counting {
    fn name(&self) -> Option<&str> {
        Some(self.name)
    }

    async fn run(&self, _data: &mut RunningContext, next: Next) -> Result<(), ErrorRecord> {
        self.count.fetch_add(1, Ordering::SeqCst);
        next.advance();
        Ok(())
    }
}

fn executor() -> ChainExecutor {
    ChainExecutor::new(json!({}), json!({}))
}

#[tokio::test]
async fn returned_error_is_captured_and_attributed() {
    let chain = Chain::new().step(FailReturn {
        name: "explode",
        record: ErrorRecord::new("boom"),
    });

    let envelope = executor().run(&chain).await.unwrap_err();
    assert_eq!(envelope.status, 500);
    assert_eq!(envelope.data.message, "boom");
    assert_eq!(envelope.data.func, "explode");
}

#[tokio::test]
async fn continuation_failure_short_circuits_the_chain() {
    let count = Arc::new(AtomicUsize::new(0));
    let chain = Chain::new()
        .step(Counting {
            name: "before",
            count: count.clone(),
        })
        .step(FailVia {
            name: "validate",
            record: ErrorRecord::new("bad input").with_status(400),
        })
        .step(Counting {
            name: "after",
            count: count.clone(),
        });

    let envelope = executor().run(&chain).await.unwrap_err();
    assert_eq!(envelope.status, 400);
    assert_eq!(envelope.data.message, "bad input");
    assert_eq!(envelope.data.func, "validate");
    // Only the step before the failure ever ran.
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failure_without_status_defaults_to_500() {
    let chain = Chain::new().step(FailVia {
        name: "f",
        record: ErrorRecord::new("plain"),
    });

    let envelope = executor().run(&chain).await.unwrap_err();
    assert_eq!(envelope.status, 500);
}

#[tokio::test]
async fn malformed_failure_is_normalized_not_dropped() {
    let chain = Chain::new().step(FailVia {
        name: "f",
        record: ErrorRecord::default(),
    });

    let envelope = executor().run(&chain).await.unwrap_err();
    assert_eq!(envelope.status, 500);
    assert_eq!(envelope.data.message, DEFAULT_ERROR_MESSAGE);
    assert_eq!(envelope.data.func, "f");
}

#[tokio::test]
async fn pre_attributed_failures_keep_their_own_step_name() {
    let chain = Chain::new().step(FailVia {
        name: "outer",
        record: ErrorRecord::new("delegated").with_step("inner_helper"),
    });

    let envelope = executor().run(&chain).await.unwrap_err();
    assert_eq!(envelope.data.func, "inner_helper");
}

#[tokio::test]
async fn anonymous_step_failures_use_the_placeholder_name() {
    struct MutateAnonymously;

    #[async_trait]
    impl Step for MutateAnonymously {
        async fn run(&self, data: &mut RunningContext, next: Next) -> Result<(), ErrorRecord> {
            data.insert("touched", json!(true));
            next.advance();
            Ok(())
        }
    }

    struct FailAnonymously;

    #[async_trait]
    impl Step for FailAnonymously {
        async fn run(&self, _data: &mut RunningContext, next: Next) -> Result<(), ErrorRecord> {
            next.fail("late failure");
            Ok(())
        }
    }

    let chain = Chain::new().step(MutateAnonymously).step(FailAnonymously);
    let envelope = executor().run(&chain).await.unwrap_err();
    assert_eq!(envelope.data.func, ANONYMOUS_STEP);
}

#[tokio::test]
async fn first_signal_wins_over_a_later_error_return() {
    struct AdvanceThenErr;

    #[async_trait]
    impl Step for AdvanceThenErr {
        fn name(&self) -> Option<&str> {
            Some("ambivalent")
        }

        async fn run(&self, data: &mut RunningContext, next: Next) -> Result<(), ErrorRecord> {
            data.insert("ok", json!(true));
            next.advance();
            Err(ErrorRecord::new("ignored"))
        }
    }

    let chain = Chain::new().step(AdvanceThenErr);
    let envelope = executor().run(&chain).await.unwrap();
    assert_eq!(envelope.data.get("ok"), Some(&json!(true)));
}

#[tokio::test]
async fn second_signal_from_the_same_step_is_ignored() {
    struct FailThenAdvance;

    #[async_trait]
    impl Step for FailThenAdvance {
        fn name(&self) -> Option<&str> {
            Some("double")
        }

        async fn run(&self, _data: &mut RunningContext, next: Next) -> Result<(), ErrorRecord> {
            next.fail(ErrorRecord::new("first").with_status(409));
            next.advance();
            Ok(())
        }
    }

    let chain = Chain::new().step(FailThenAdvance);
    let envelope = executor().run(&chain).await.unwrap_err();
    assert_eq!(envelope.status, 409);
    assert_eq!(envelope.data.message, "first");
}

#[tokio::test]
async fn finishing_without_any_signal_is_a_500_failure() {
    struct SilentStep;

    #[async_trait]
    impl Step for SilentStep {
        fn name(&self) -> Option<&str> {
            Some("silent")
        }

        async fn run(&self, _data: &mut RunningContext, _next: Next) -> Result<(), ErrorRecord> {
            Ok(())
        }
    }

    let chain = Chain::new().step(SilentStep);
    let envelope = executor().run(&chain).await.unwrap_err();
    assert_eq!(envelope.status, 500);
    assert_eq!(envelope.data.func, "silent");
}

#[tokio::test]
async fn string_failures_are_accepted_by_the_continuation() {
    struct FailWithStr;

    #[async_trait]
    impl Step for FailWithStr {
        fn name(&self) -> Option<&str> {
            Some("stringy")
        }

        async fn run(&self, _data: &mut RunningContext, next: Next) -> Result<(), ErrorRecord> {
            next.fail("just a message");
            Ok(())
        }
    }

    let chain = Chain::new().step(FailWithStr);
    let envelope = executor().run(&chain).await.unwrap_err();
    assert_eq!(envelope.status, 500);
    assert_eq!(envelope.data.message, "just a message");
    assert_eq!(envelope.data.func, "stringy");
}
