//! Task API that records calls and fails on request.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::adapters::lock;
use crate::error::ApiError;
use crate::ports::{ApiFuture, NewTask, TaskApi};
use crate::wizard::photos::SelectedFile;

/// One recorded call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCall {
    /// `create_task` with its payload.
    Create(NewTask),
    /// `attach_photo` with the photo name and task id.
    Attach {
        /// Photo file name.
        photo: String,
        /// Task the photo was attached to.
        task_id: String,
    },
}

#[derive(Default)]
struct Script {
    create_failures: Vec<String>,
    failing_attachments: HashSet<usize>,
    attach_calls: usize,
    created: usize,
}

/// Records calls behind a cloneable handle.
///
/// Created tasks get ids `task-1`, `task-2`, ...
#[derive(Clone, Default)]
pub struct MemoryTaskApi {
    calls: Arc<Mutex<Vec<TaskCall>>>,
    script: Arc<Mutex<Script>>,
}

impl MemoryTaskApi {
    /// Creates an API that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `create_task` call fail with `message`.
    #[must_use]
    pub fn fail_next_create(self, message: &str) -> Self {
        lock(&self.script).create_failures.push(message.to_string());
        self
    }

    /// Makes the `n`th attachment call (1-based, across the API's lifetime) fail.
    #[must_use]
    pub fn fail_attachment(self, n: usize) -> Self {
        lock(&self.script).failing_attachments.insert(n);
        self
    }

    /// Every call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<TaskCall> {
        lock(&self.calls).clone()
    }
}

impl TaskApi for MemoryTaskApi {
    fn create_task<'a>(&'a self, task: &'a NewTask) -> ApiFuture<'a, String> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            lock(&self.calls).push(TaskCall::Create(task.clone()));
            let mut script = lock(&self.script);
            if !script.create_failures.is_empty() {
                let message = script.create_failures.remove(0);
                return Err(ApiError::Status { status: 500, message });
            }
            script.created += 1;
            Ok(format!("task-{}", script.created))
        })
    }

    fn attach_photo<'a>(&'a self, file: &'a SelectedFile, task_id: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let mut script = lock(&self.script);
            script.attach_calls += 1;
            let fails = script.failing_attachments.contains(&script.attach_calls);
            drop(script);
            lock(&self.calls)
                .push(TaskCall::Attach { photo: file.name.clone(), task_id: task_id.to_string() });
            if fails {
                return Err(ApiError::Status { status: 502, message: "upload failed".to_string() });
            }
            Ok(())
        })
    }
}
