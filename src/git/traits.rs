//! git::traits
//!
//! The async contract the checkout engine requires of a git collaborator.
//!
//! # Design
//!
//! The engine never runs git itself. A host supplies an implementation of
//! [`GitOps`] backed by whatever execution strategy it uses, and the
//! engine drives the fetch/checkout/pull sequence through it. The trait
//! is async because every operation can involve network or disk I/O, and
//! `Send + Sync` so a single implementation can serve concurrent tasks.
//!
//! # Error Handling
//!
//! All methods return `Result<T, GitError>`. The engine neither retries
//! nor reinterprets failures; a [`GitError`] always reaches the caller,
//! which decides what is user-visible. Implementations are expected to be
//! atomic per operation (a failed checkout leaves the working tree
//! unchanged), which is what makes partial-failure sequences tolerable.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::remote::Remote;

/// Errors from git operations.
///
/// `Clone` so deterministic test doubles can replay a configured failure
/// on every call.
#[derive(Debug, Clone, Error)]
pub enum GitError {
    /// A remote with this name exists and points at a different URL.
    #[error("remote {name} already exists")]
    RemoteExists {
        /// The conflicting remote name.
        name: String,
    },

    /// A fast-forward-only pull found diverged histories.
    #[error("cannot fast-forward {refspec}")]
    NonFastForward {
        /// The refspec that could not be fast-forwarded.
        refspec: String,
    },

    /// Checkout would clobber local working-tree state.
    #[error("checkout conflicts with local changes: {details}")]
    CheckoutConflict {
        /// Description of the conflicting paths or state.
        details: String,
    },

    /// The operation is not available in the repository's current state.
    #[error("{operation} is not available in {state} state")]
    UnsupportedOperation {
        /// The operation that was attempted.
        operation: String,
        /// The lifecycle state that rejected it.
        state: String,
    },

    /// The underlying git invocation failed.
    #[error("git {operation} failed: {message}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// Whatever diagnostic the implementation could recover.
        message: String,
    },
}

/// Options for [`GitOps::fetch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// The remote to fetch from.
    pub remote_name: String,
}

/// Options for [`GitOps::pull`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullOptions {
    /// The remote to pull from.
    pub remote_name: String,
    /// Fail rather than create a merge commit if histories diverged.
    pub ff_only: bool,
}

/// Options for [`GitOps::push`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushOptions {
    /// The remote to push to.
    pub remote_name: String,
    /// Record the pushed ref as the branch's upstream.
    pub set_upstream: bool,
    /// Allow a non-fast-forward update of the remote ref.
    pub force: bool,
}

/// Options for [`GitOps::checkout`].
///
/// The default options describe a plain switch to an existing rev.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutOptions {
    /// Create the branch instead of requiring it to exist.
    pub create_new: bool,
    /// Configure the new branch to track its start point.
    pub track: bool,
    /// The rev the new branch starts from.
    pub start_point: Option<String>,
}

/// The git operations the checkout engine drives.
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Example
///
/// ```ignore
/// use berth::git::{FetchOptions, GitOps};
///
/// async fn refresh(git: &dyn GitOps) -> Result<(), berth::git::GitError> {
///     git.fetch(
///         "refs/heads/main",
///         FetchOptions { remote_name: "origin".to_string() },
///     )
///     .await
/// }
/// ```
#[async_trait]
pub trait GitOps: Send + Sync {
    /// Add a remote and return its model.
    ///
    /// # Errors
    ///
    /// `RemoteExists` if a remote named `name` already exists and points
    /// at a different URL. Implementations may answer with the existing
    /// remote instead when the URL matches.
    async fn add_remote(&self, name: &str, url: &str) -> Result<Remote, GitError>;

    /// Fetch `refspec` from the named remote.
    async fn fetch(&self, refspec: &str, options: FetchOptions) -> Result<(), GitError>;

    /// Pull `refspec` from the named remote into the current branch.
    ///
    /// # Errors
    ///
    /// `NonFastForward` when `ff_only` is set and the histories have
    /// diverged. This is a hard failure; nothing is merged.
    async fn pull(&self, refspec: &str, options: PullOptions) -> Result<(), GitError>;

    /// Push `refspec` to the named remote.
    async fn push(&self, refspec: &str, options: PushOptions) -> Result<(), GitError>;

    /// Check out `rev`, optionally creating it first.
    ///
    /// # Errors
    ///
    /// `CheckoutConflict` when switching would clobber local changes; the
    /// working tree is left as it was.
    async fn checkout(&self, rev: &str, options: CheckoutOptions) -> Result<(), GitError>;

    /// Whether a merge is in progress.
    async fn is_merging(&self) -> Result<bool, GitError>;

    /// Whether a rebase is in progress.
    async fn is_rebasing(&self) -> Result<bool, GitError>;
}
