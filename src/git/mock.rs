//! git::mock
//!
//! Mock git implementation for deterministic testing.
//!
//! # Design
//!
//! The mock git keeps a [`RemoteSet`] and a handful of working-tree flags
//! in memory, records every call it receives, and allows configuring
//! failure scenarios. Tests drive the checkout engine against it and then
//! assert on the exact sequence of recorded [`GitCall`]s.
//!
//! # Example
//!
//! ```
//! use berth::git::mock::MockGit;
//! use berth::git::{FetchOptions, GitOps};
//!
//! # tokio_test::block_on(async {
//! let git = MockGit::new().with_remote("origin", "git@github.com:atom/github.git");
//!
//! // Re-adding the same remote with the same URL answers the existing model.
//! let remote = git
//!     .add_remote("origin", "git@github.com:atom/github.git")
//!     .await
//!     .unwrap();
//! assert_eq!(remote.owner(), Some("atom"));
//!
//! git.fetch(
//!     "refs/heads/main",
//!     FetchOptions {
//!         remote_name: "origin".to_string(),
//!     },
//! )
//! .await
//! .unwrap();
//!
//! assert_eq!(git.operations().len(), 2);
//! # });
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::traits::{CheckoutOptions, FetchOptions, GitError, GitOps, PullOptions, PushOptions};
use crate::core::remote::{Remote, RemoteSet};

/// Mock git for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockGit {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockGitInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockGitInner {
    /// Configured remotes by name.
    remotes: RemoteSet,
    /// Whether a merge is in progress.
    merging: bool,
    /// Whether a rebase is in progress.
    rebasing: bool,
    /// The rev of the most recent successful checkout.
    checked_out: Option<String>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded calls for verification.
    operations: Vec<GitCall>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail add_remote with the given error.
    AddRemote(GitError),
    /// Fail fetch with the given error.
    Fetch(GitError),
    /// Fail pull with the given error.
    Pull(GitError),
    /// Fail push with the given error.
    Push(GitError),
    /// Fail checkout with the given error.
    Checkout(GitError),
}

/// Recorded call for test verification.
///
/// Carries the full argument set so tests can assert exact sequences,
/// options included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    AddRemote {
        name: String,
        url: String,
    },
    Fetch {
        refspec: String,
        options: FetchOptions,
    },
    Pull {
        refspec: String,
        options: PullOptions,
    },
    Push {
        refspec: String,
        options: PushOptions,
    },
    Checkout {
        rev: String,
        options: CheckoutOptions,
    },
}

impl MockGit {
    /// Create a new mock git with no remotes and a clean working tree.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockGitInner {
                remotes: RemoteSet::new(),
                merging: false,
                rebasing: false,
                checked_out: None,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Add a pre-existing remote.
    pub fn with_remote(self, name: &str, url: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.remotes.add(Remote::new(name, url));
        }
        self
    }

    /// Mark a merge as in progress.
    pub fn merging(self, merging: bool) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.merging = merging;
        }
        self
    }

    /// Mark a rebase as in progress.
    pub fn rebasing(self, rebasing: bool) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.rebasing = rebasing;
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use berth::git::mock::{FailOn, MockGit};
    /// use berth::git::GitError;
    ///
    /// let git = MockGit::new().fail_on(FailOn::Fetch(GitError::OperationFailed {
    ///     operation: "fetch".to_string(),
    ///     message: "exit status 128".to_string(),
    /// }));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded calls.
    ///
    /// Useful for verifying the mock was called correctly.
    pub fn operations(&self) -> Vec<GitCall> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Clear recorded calls.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    /// The configured remote names, in insertion order (for test
    /// verification).
    pub fn remote_names(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.remotes.iter().map(|r| r.name().to_string()).collect()
    }

    /// The rev of the most recent successful checkout (for test
    /// verification).
    pub fn checked_out(&self) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.checked_out.clone()
    }

    /// Record a call.
    fn record(&self, call: GitCall) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(call);
    }

    /// Check whether the configured failure applies to this operation.
    fn check_fail(&self, operation: &str) -> Option<GitError> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::AddRemote(e)) if operation == "add_remote" => Some(e.clone()),
            Some(FailOn::Fetch(e)) if operation == "fetch" => Some(e.clone()),
            Some(FailOn::Pull(e)) if operation == "pull" => Some(e.clone()),
            Some(FailOn::Push(e)) if operation == "push" => Some(e.clone()),
            Some(FailOn::Checkout(e)) if operation == "checkout" => Some(e.clone()),
            _ => None,
        }
    }
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitOps for MockGit {
    async fn add_remote(&self, name: &str, url: &str) -> Result<Remote, GitError> {
        self.record(GitCall::AddRemote {
            name: name.to_string(),
            url: url.to_string(),
        });

        if let Some(error) = self.check_fail("add_remote") {
            return Err(error);
        }

        let mut inner = self.inner.lock().unwrap();
        let existing = inner.remotes.with_name(name);
        if existing.is_present() {
            if existing.url() == url {
                return Ok(existing.clone());
            }
            return Err(GitError::RemoteExists {
                name: name.to_string(),
            });
        }

        let remote = Remote::new(name, url);
        inner.remotes.add(remote.clone());
        Ok(remote)
    }

    async fn fetch(&self, refspec: &str, options: FetchOptions) -> Result<(), GitError> {
        self.record(GitCall::Fetch {
            refspec: refspec.to_string(),
            options,
        });

        if let Some(error) = self.check_fail("fetch") {
            return Err(error);
        }

        Ok(())
    }

    async fn pull(&self, refspec: &str, options: PullOptions) -> Result<(), GitError> {
        self.record(GitCall::Pull {
            refspec: refspec.to_string(),
            options,
        });

        if let Some(error) = self.check_fail("pull") {
            return Err(error);
        }

        Ok(())
    }

    async fn push(&self, refspec: &str, options: PushOptions) -> Result<(), GitError> {
        self.record(GitCall::Push {
            refspec: refspec.to_string(),
            options,
        });

        if let Some(error) = self.check_fail("push") {
            return Err(error);
        }

        Ok(())
    }

    async fn checkout(&self, rev: &str, options: CheckoutOptions) -> Result<(), GitError> {
        self.record(GitCall::Checkout {
            rev: rev.to_string(),
            options,
        });

        if let Some(error) = self.check_fail("checkout") {
            return Err(error);
        }

        let mut inner = self.inner.lock().unwrap();
        inner.checked_out = Some(rev.to_string());
        Ok(())
    }

    async fn is_merging(&self) -> Result<bool, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.merging)
    }

    async fn is_rebasing(&self) -> Result<bool, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rebasing)
    }
}
