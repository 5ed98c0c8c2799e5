// src/services/batch.rs
// DOCUMENTATION: Bounded, cancellable execution of independent per-item tasks
// PURPOSE: Shared by the upload loop and the archive fetch loop so both follow
// one explicit partial-failure policy

use crate::errors::GalleryError;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

/// What a batch does when one item fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep going
    #[default]
    ContinueOnError,
    /// Stop at the first failure, items still in flight are dropped
    AbortOnError,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "continue" | "continue-on-error" | "continue_on_error" => Ok(Self::ContinueOnError),
            "abort" | "abort-on-error" | "abort_on_error" | "fail-fast" => Ok(Self::AbortOnError),
            other => Err(format!("Unknown failure policy: {}", other)),
        }
    }
}

/// One failed item of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Position of the item in the input
    pub index: usize,
    /// Human readable item name (usually the file name)
    pub label: String,
    pub error: String,
}

/// Outcome of a batch run
#[derive(Debug)]
pub struct BatchReport<T> {
    /// Number of items submitted
    pub total: usize,
    /// Successful results in input order, with their input index
    pub completed: Vec<(usize, T)>,
    pub failures: Vec<ItemFailure>,
    /// Stopped by the cancellation token
    pub cancelled: bool,
    /// Stopped by AbortOnError
    pub aborted: bool,
}

impl<T> BatchReport<T> {
    fn new(total: usize) -> Self {
        Self {
            total,
            completed: Vec::new(),
            failures: Vec::new(),
            cancelled: false,
            aborted: false,
        }
    }

    /// Every item completed successfully
    pub fn is_success(&self) -> bool {
        self.completed.len() == self.total
    }
}

/// Runs per-item async tasks with bounded concurrency
/// DOCUMENTATION: Results come back in input order whatever the completion
/// order. Cancelling the token stops the batch and drops in-flight items.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    concurrency: usize,
    policy: FailurePolicy,
    cancel: CancellationToken,
}

impl BatchRunner {
    pub fn new(concurrency: usize, policy: FailurePolicy) -> Self {
        Self {
            concurrency: concurrency.max(1),
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned token (e.g. tied to Ctrl-C)
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run `task` for every item
    ///
    /// # Arguments
    /// * `items` - Inputs, processed in order
    /// * `label` - Names an item for logs and failure reports
    /// * `task` - Per-item work
    pub async fn run<I, T, L, F, Fut>(&self, items: Vec<I>, label: L, task: F) -> BatchReport<T>
    where
        L: Fn(&I) -> String,
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<T, GalleryError>>,
    {
        let labels: Vec<String> = items.iter().map(&label).collect();
        let mut report = BatchReport::new(items.len());

        if self.cancel.is_cancelled() {
            report.cancelled = true;
            return report;
        }

        let results = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| {
                let fut = task(item);
                async move { (index, fut.await) }
            })
            .buffered(self.concurrency);
        let mut results = std::pin::pin!(results);

        loop {
            let (index, result) = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    log::warn!(
                        "Batch cancelled after {}/{} items",
                        report.completed.len() + report.failures.len(),
                        report.total
                    );
                    report.cancelled = true;
                    break;
                }
                next = results.next() => match next {
                    Some(next) => next,
                    None => break,
                },
            };

            match result {
                Ok(value) => report.completed.push((index, value)),
                Err(e) => {
                    log::warn!("Batch item {} ({}) failed: {}", index, labels[index], e);
                    report.failures.push(ItemFailure {
                        index,
                        label: labels[index].clone(),
                        error: e.to_string(),
                    });

                    if self.policy == FailurePolicy::AbortOnError {
                        log::warn!("Aborting batch after first failure");
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        report
    }
}
