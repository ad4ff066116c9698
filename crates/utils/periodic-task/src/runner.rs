use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::TaskResult;

/// Work unit executed by a [`PeriodicTask`](crate::PeriodicTask).
///
/// Injected at construction; the task never inspects what the work does.
#[async_trait]
pub trait Runner: Send + Sync + 'static {
    /// One unit of work - invoked once per activation, or once per timer
    /// firing when the task runs periodically.
    ///
    /// The CancellationToken provides:
    /// - `token.cancelled().await` - Wait for the stop signal
    /// - `token.is_cancelled()` - Check if stop was requested
    async fn run(&self, token: CancellationToken) -> TaskResult<()>;
}

/// Work unit that does nothing. Useful for tasks that only exercise the
/// lifecycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRunner;

#[async_trait]
impl Runner for NoopRunner {
    async fn run(&self, _token: CancellationToken) -> TaskResult<()> {
        Ok(())
    }
}

/// Adapter wrapping an async closure as a [`Runner`].
///
/// ```
/// use periodic_task::{PeriodicTask, RunnerFn};
///
/// let runner = RunnerFn::new(|_token| async move { Ok(()) });
/// let task = PeriodicTask::new("demo", runner);
/// assert_eq!(task.name(), "demo");
/// ```
pub struct RunnerFn<F> {
    f: F,
}

impl<F, Fut> RunnerFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskResult<()>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Runner for RunnerFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskResult<()>> + Send + 'static,
{
    async fn run(&self, token: CancellationToken) -> TaskResult<()> {
        (self.f)(token).await
    }
}
