use async_trait::async_trait;
use std::process::ExitStatus;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Unable to start {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to read output of {tool}: {source}")]
    Read {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Standard output of {0} is not attached")]
    MissingStdout(&'static str),
    #[error("{tool} exited with {status}")]
    Exit {
        tool: &'static str,
        status: ExitStatus,
    },
    #[error("Unable to parse {0}")]
    Parse(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Unable to remove {path}: {source}")]
    Cleanup {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Process runner has already been started")]
    AlreadyStarted,
    #[error("Supervising task failed: {0}")]
    TaskFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Result of one supervised run. Only the first recorded error is kept.
#[derive(Debug, Default)]
pub struct ProcessOutcome {
    result_path: Option<String>,
    error: Option<ProcessError>,
}

impl ProcessOutcome {
    pub fn set_result_path(&mut self, path: String) {
        self.result_path.replace(path);
    }

    pub fn record_error(&mut self, error: ProcessError) {
        match &self.error {
            None => {
                self.error.replace(error);
            }
            Some(_) => debug!(?error, "Dropping subsequent process error"),
        }
    }

    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn result_path(&self) -> Option<&str> {
        self.result_path.as_deref()
    }

    pub fn error(&self) -> Option<&ProcessError> {
        self.error.as_ref()
    }

    pub fn into_result(self) -> Result<Option<String>, ProcessError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result_path),
        }
    }
}

/// Forwards percentages to the progress channel, clamped to 100 and never going backwards.
pub struct ProgressReporter {
    sender: Option<UnboundedSender<u8>>,
    last: Option<u8>,
}

impl ProgressReporter {
    pub fn new(sender: UnboundedSender<u8>) -> Self {
        Self {
            sender: Some(sender),
            last: None,
        }
    }

    pub fn silent() -> Self {
        Self {
            sender: None,
            last: None,
        }
    }

    pub fn report(&mut self, percent: u8) {
        let percent = percent.min(100);

        if matches!(self.last, Some(last) if percent <= last) {
            return;
        }
        self.last.replace(percent);

        if let Some(sender) = &self.sender {
            // The receiver may be gone when the caller stopped listening; the run continues.
            let _ = sender.send(percent);
        }
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

/// An external program supervised by [`ProcessRunner`].
#[async_trait]
pub trait Tool: Send + Sized + 'static {
    fn name(&self) -> &'static str;

    async fn run(self, progress: &mut ProgressReporter, outcome: &mut ProcessOutcome);
}

/// Idle -> Running -> Succeeded | Failed.
pub struct ProcessRunner {
    state: RunnerState,
    task: Option<JoinHandle<ProcessOutcome>>,
    outcome: Option<ProcessOutcome>,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self {
            state: RunnerState::Idle,
            task: None,
            outcome: None,
        }
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Launches the tool on its own task and returns immediately.
    pub fn start<T: Tool>(
        &mut self,
        tool: T,
        mut progress: ProgressReporter,
    ) -> Result<(), ProcessError> {
        if self.state != RunnerState::Idle {
            return Err(ProcessError::AlreadyStarted);
        }

        debug!(tool = tool.name(), "Starting process runner");

        let task = tokio::spawn(async move {
            let mut outcome = ProcessOutcome::default();
            tool.run(&mut progress, &mut outcome).await;
            outcome
        });

        self.task.replace(task);
        self.state = RunnerState::Running;

        Ok(())
    }

    /// Waits until the supervising task reaches a terminal state. Returns immediately
    /// when the runner was never started or has already finished.
    pub async fn wait(&mut self) {
        let task = match self.task.take() {
            Some(task) => task,
            None => return,
        };

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(?error, "Process supervising task failed");
                let mut outcome = ProcessOutcome::default();
                outcome.record_error(ProcessError::TaskFailed(error.to_string()));
                outcome
            }
        };

        self.state = if outcome.has_failed() {
            RunnerState::Failed
        } else {
            RunnerState::Succeeded
        };
        self.outcome.replace(outcome);
    }

    /// Available only once a terminal state has been reached.
    pub fn outcome(&self) -> Option<&ProcessOutcome> {
        self.outcome.as_ref()
    }

    pub fn into_outcome(self) -> Option<ProcessOutcome> {
        self.outcome
    }
}
