use std::{sync::Arc, time::Duration};

use logger::{debug, error, info};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    Runner,
    error::{TaskError, TaskResult},
    runner::NoopRunner,
};

/// Configuration for [`PeriodicTask`].
#[derive(Debug, Clone, Copy)]
pub struct PeriodicTaskConfig {
    /// Whether a failed run halts the periodic loop. When false, failures
    /// are logged and ticking continues.
    pub stop_on_error: bool,
}

impl Default for PeriodicTaskConfig {
    fn default() -> Self {
        Self { stop_on_error: true }
    }
}

/// A named unit of work executed on a background tokio task, once or on a
/// fixed interval, until told to stop.
///
/// Lifecycle is Inactive -> Active -> Inactive: [`start`](Self::start) /
/// [`start_with_interval`](Self::start_with_interval) activate the task by
/// allocating a fresh [`CancellationToken`] and spawning the work unit;
/// [`stop`](Self::stop) deactivates it by cancelling the token. Each
/// activation gets its own token and timer; neither is ever reused.
///
/// All methods serialize on an internal lock, so concurrent callers cannot
/// race the lifecycle.
pub struct PeriodicTask {
    name: String,
    runner: Arc<dyn Runner>,
    config: PeriodicTaskConfig,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    active: Option<ActiveRun>,
    /// Handle of the most recently stopped run, kept for [`PeriodicTask::join`].
    parked: Option<JoinHandle<TaskResult<()>>>,
}

struct ActiveRun {
    token: CancellationToken,
    handle: JoinHandle<TaskResult<()>>,
    every: Option<Duration>,
}

impl PeriodicTask {
    pub fn new(name: impl Into<String>, runner: impl Runner) -> Self {
        Self::with_config(name, runner, PeriodicTaskConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        runner: impl Runner,
        config: PeriodicTaskConfig,
    ) -> Self {
        Self {
            name: name.into(),
            runner: Arc::new(runner),
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Task whose work unit does nothing.
    pub fn noop(name: impl Into<String>) -> Self {
        Self::new(name, NoopRunner)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn is_active(&self) -> bool {
        self.inner.lock().await.active.is_some()
    }

    /// Interval of the currently active run, `None` when inactive or
    /// running one-shot.
    pub async fn interval(&self) -> Option<Duration> {
        let inner = self.inner.lock().await;
        inner.active.as_ref().and_then(|run| run.every)
    }

    /// Launch the work unit once on a background task.
    ///
    /// Returns without waiting for the run to begin. Fails with an
    /// invalid-state error if the task is already active.
    pub async fn start(&self) -> TaskResult<()> {
        self.activate(None).await
    }

    /// Launch the work unit on a background task, re-invoking it every
    /// `every` until stopped. The first firing lands one full interval
    /// after start.
    ///
    /// Fails with an invalid-argument error if `every` is zero, and with
    /// an invalid-state error if the task is already active.
    pub async fn start_with_interval(&self, every: Duration) -> TaskResult<()> {
        self.check_interval(every)?;
        self.activate(Some(every)).await
    }

    /// Stop the task, then restart it with a new interval.
    ///
    /// Not atomic: an observer between the two halves sees the task
    /// inactive. The interval is validated first, so a bad argument never
    /// takes down a running task.
    pub async fn set_interval(&self, every: Duration) -> TaskResult<()> {
        self.check_interval(every)?;
        self.stop().await?;
        self.activate(Some(every)).await
    }

    /// Trigger the cancellation token of the active run and halt its
    /// timer. The run's handle is parked for [`join`](Self::join).
    ///
    /// Returns without waiting for the background task to exit; no firing
    /// begins after cancellation is observed. Fails with an invalid-state
    /// error if the task is not active (never started, or double-stop).
    pub async fn stop(&self) -> TaskResult<()> {
        let mut inner = self.inner.lock().await;
        let Some(run) = inner.active.take() else {
            return Err(TaskError::invalid_state(&self.name, "not started"));
        };

        run.token.cancel();
        inner.parked = Some(run.handle);
        info!(task = %self.name, "stop requested");
        Ok(())
    }

    /// Wait for the most recently stopped run to fully exit and yield its
    /// result. A panicking work unit surfaces here as a panic-kind error.
    ///
    /// Fails with an invalid-state error while the task is active; returns
    /// `Ok(())` when there is nothing left to wait for.
    pub async fn join(&self) -> TaskResult<()> {
        let handle = {
            let mut inner = self.inner.lock().await;
            if inner.active.is_some() {
                return Err(TaskError::invalid_state(
                    &self.name,
                    "still active, stop it first",
                ));
            }
            inner.parked.take()
        };

        let Some(handle) = handle else {
            return Ok(());
        };

        match handle.await {
            Ok(res) => res,
            Err(e) if e.is_panic() => {
                let payload = e.into_panic();
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "opaque panic payload".to_string());
                Err(TaskError::panic(&self.name, message))
            }
            Err(e) => Err(TaskError::execution(&self.name, e)),
        }
    }

    fn check_interval(&self, every: Duration) -> TaskResult<()> {
        if every.is_zero() {
            return Err(TaskError::invalid_argument(
                &self.name,
                "interval must be positive",
            ));
        }
        Ok(())
    }

    async fn activate(&self, every: Option<Duration>) -> TaskResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.active.is_some() {
            return Err(TaskError::invalid_state(&self.name, "already started"));
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(drive(
            self.name.clone(),
            self.runner.clone(),
            token.clone(),
            every,
            self.config.stop_on_error,
        ));

        inner.active = Some(ActiveRun {
            token,
            handle,
            every,
        });
        Ok(())
    }
}

async fn drive(
    name: String,
    runner: Arc<dyn Runner>,
    token: CancellationToken,
    every: Option<Duration>,
    stop_on_error: bool,
) -> TaskResult<()> {
    info!(task = %name, "work unit started");

    let res = match every {
        None => runner.run(token).await,
        Some(every) => tick_loop(&name, runner.as_ref(), &token, every, stop_on_error).await,
    };

    info!(task = %name, "work unit stopped");
    res
}

async fn tick_loop(
    name: &str,
    runner: &dyn Runner,
    token: &CancellationToken,
    every: Duration,
    stop_on_error: bool,
) -> TaskResult<()> {
    // The ticker lives on this task only; it is dropped the moment the
    // loop exits. Late firings are skipped rather than bursted.
    let mut ticker = time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => return Ok(()),
            _ = ticker.tick() => {
                debug!(task = %name, "tick");
                match runner.run(token.clone()).await {
                    Ok(()) => {}
                    Err(e) if !stop_on_error => {
                        error!(task = %name, ?e, "run failed but stop_on_error=false");
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }
}
