use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Default, Clone)]
pub struct SpammerStats {
    pub success: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl SpammerStats {
    pub fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Success => self.success += 1,
            TaskStatus::Skipped => self.skipped += 1,
            TaskStatus::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.success + self.skipped + self.failed
    }
}

#[async_trait]
pub trait Spammer: Send + Sync {
    /// Short label used in logs and in the run summary
    fn label(&self) -> String;

    /// Run the worker loop to completion
    async fn start(&self) -> Result<SpammerStats>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    /// A business rule short-circuited the task; nothing was attempted.
    Skipped,
    Failed,
}

#[derive(Debug, Clone)]
pub struct TaskResult {
    pub status: TaskStatus,
    pub message: String,
    /// Identifier of the asset or note the task produced, if any
    pub reference: Option<String>,
}

impl TaskResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Success,
            message: message.into(),
            reference: None,
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Skipped,
            message: message.into(),
            reference: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failed,
            message: message.into(),
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

#[async_trait]
pub trait Task<Ctx>: Send + Sync {
    /// Returns the name of the task
    fn name(&self) -> &str;

    /// Executes the task
    async fn run(&self, ctx: &Ctx) -> Result<TaskResult>;
}
