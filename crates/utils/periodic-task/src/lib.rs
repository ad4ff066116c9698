pub use tokio_util::sync::CancellationToken;
pub mod error;
pub use error::{TaskError, TaskErrorKind, TaskResult};
pub use periodic::{PeriodicTask, PeriodicTaskConfig};
pub use runner::{NoopRunner, Runner, RunnerFn};
pub mod periodic;
pub mod runner;
