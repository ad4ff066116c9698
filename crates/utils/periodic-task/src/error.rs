use std::borrow::Cow;
use thiserror::Error;

/// Error produced by the lifecycle methods of a periodic task.
#[derive(Debug, Error)]
#[error("task '{task_name}' failed: {kind}")]
#[non_exhaustive]
pub struct TaskError {
    pub task_name: String,
    #[source]
    pub kind: TaskErrorKind,
}

impl TaskError {
    pub fn new(task_name: impl Into<String>, kind: TaskErrorKind) -> Self {
        Self {
            task_name: task_name.into(),
            kind,
        }
    }

    /// Lifecycle violation: the task is not in the state the call requires.
    pub fn invalid_state(
        task_name: impl Into<String>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(
            task_name,
            TaskErrorKind::InvalidState {
                message: message.into(),
            },
        )
    }

    /// A caller-supplied argument was rejected before the task was touched.
    pub fn invalid_argument(
        task_name: impl Into<String>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(
            task_name,
            TaskErrorKind::InvalidArgument {
                message: message.into(),
            },
        )
    }

    pub fn execution<E>(task_name: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(
            task_name,
            TaskErrorKind::Execution {
                source: source.into(),
            },
        )
    }

    pub fn panic(task_name: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(
            task_name,
            TaskErrorKind::Panic {
                message: message.into(),
            },
        )
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self.kind, TaskErrorKind::InvalidState { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, TaskErrorKind::InvalidArgument { .. })
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaskErrorKind {
    #[error("invalid state: {message}")]
    #[non_exhaustive]
    InvalidState { message: Cow<'static, str> },

    #[error("invalid argument: {message}")]
    #[non_exhaustive]
    InvalidArgument { message: Cow<'static, str> },

    #[error("execution error")]
    #[non_exhaustive]
    Execution {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("work unit panicked: {message}")]
    #[non_exhaustive]
    Panic { message: Cow<'static, str> },
}

pub type TaskResult<T> = Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_task_error_display() {
        let err = TaskError::invalid_state("heartbeat", "already started");
        let display = err.to_string();
        assert!(display.contains("heartbeat"));
        assert!(display.contains("failed"));
    }

    #[test]
    fn test_task_error_kinds() {
        let err = TaskError::invalid_argument("ticker", "interval must be positive");
        assert!(matches!(err.kind, TaskErrorKind::InvalidArgument { .. }));
        assert!(err.is_invalid_argument());
        assert!(!err.is_invalid_state());
        assert_eq!(err.task_name, "ticker");

        let err = TaskError::panic("worker", "unexpected panic");
        assert!(matches!(err.kind, TaskErrorKind::Panic { .. }));
    }

    #[test]
    fn test_error_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let task_err = TaskError::execution("file_reader", io_err);

        assert!(task_err.source().is_some());
        let kind_err = task_err.source().unwrap();
        assert!(kind_err.source().is_some());
    }
}
