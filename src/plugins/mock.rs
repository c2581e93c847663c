// SPDX-License-Identifier: MPL-2.0
//! In-memory destination for host tests and demos.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::DestinationAdapter;
use crate::error::{BoxError, ErrorCode, ShakeNbakeError};
use crate::report::{BugReport, SubmitResult};

/// How a [`MockAdapter`] call should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    /// A [`ShakeNbakeError`] with this code.
    Typed(ErrorCode),
    /// A plain error with this message.
    Untyped(String),
}

impl MockFailure {
    fn to_error(&self) -> BoxError {
        match self {
            Self::Typed(code) => Box::new(ShakeNbakeError::new(*code, "mock adapter failure")),
            Self::Untyped(message) => message.clone().into(),
        }
    }
}

/// An image received through [`DestinationAdapter::upload_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Destination that records everything it receives.
///
/// Issues are numbered `MOCK-1`, `MOCK-2`, ... in creation order.
#[derive(Debug, Default)]
pub struct MockAdapter {
    uploads: Mutex<Vec<RecordedUpload>>,
    issues: Mutex<Vec<BugReport>>,
    upload_failure: Option<MockFailure>,
    issue_failure: Option<MockFailure>,
    disconnected: bool,
    next_issue: AtomicUsize,
}

impl MockAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every upload fail.
    #[must_use]
    pub fn fail_uploads(mut self, failure: MockFailure) -> Self {
        self.upload_failure = Some(failure);
        self
    }

    /// Makes every issue creation fail.
    #[must_use]
    pub fn fail_issues(mut self, failure: MockFailure) -> Self {
        self.issue_failure = Some(failure);
        self
    }

    /// Makes [`DestinationAdapter::test_connection`] report `false`.
    #[must_use]
    pub fn disconnected(mut self) -> Self {
        self.disconnected = true;
        self
    }

    #[must_use]
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        lock(&self.uploads).clone()
    }

    #[must_use]
    pub fn issues(&self) -> Vec<BugReport> {
        lock(&self.issues).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl DestinationAdapter for MockAdapter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn upload_image(&self, image: &[u8], filename: &str) -> Result<String, BoxError> {
        if let Some(failure) = &self.upload_failure {
            return Err(failure.to_error());
        }
        lock(&self.uploads).push(RecordedUpload {
            filename: filename.to_string(),
            bytes: image.to_vec(),
        });
        Ok(format!("mock://uploads/{filename}"))
    }

    async fn create_issue(&self, report: &BugReport) -> Result<SubmitResult, BoxError> {
        if let Some(failure) = &self.issue_failure {
            return Err(failure.to_error());
        }
        lock(&self.issues).push(report.clone());
        let id = format!("MOCK-{}", self.next_issue.fetch_add(1, Ordering::SeqCst) + 1);
        Ok(SubmitResult {
            url: format!("mock://issues/{id}"),
            id,
            success: true,
        })
    }

    async fn test_connection(&self) -> bool {
        !self.disconnected
    }
}
