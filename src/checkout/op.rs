//! checkout::op
//!
//! Decides whether a pull request can be checked out into the local
//! repository, and performs the checkout when it can.
//!
//! # Design
//!
//! A [`CheckoutOp`] borrows one consistent snapshot of the repository
//! (branches, remotes, state flags) plus the pull request metadata. The
//! status decision is pure; the procedure drives the [`GitOps`]
//! collaborator through the remote-resolution / fetch-or-reuse /
//! checkout sequence and reports which path it took. Git failures
//! propagate to the caller untouched; the caller owns retry and
//! user-visibility policy.
//!
//! The procedure is idempotent at the status layer: once it succeeds, a
//! fresh snapshot evaluates to [`CheckoutStatus::Current`] and no second
//! run is triggered.
//!
//! # Example
//!
//! ```
//! use berth::checkout::{CheckoutOp, RepositoryFlags};
//! use berth::core::branch::BranchSet;
//! use berth::core::pull_request::{HeadRepository, PullRequest, RepositoryOwner};
//! use berth::core::remote::{Remote, RemoteSet};
//!
//! let pull_request = PullRequest {
//!     number: 42,
//!     head_ref_name: "feature".to_string(),
//!     head_repository: Some(HeadRepository {
//!         owner: RepositoryOwner { login: "alice".to_string() },
//!         name: "widget".to_string(),
//!         url: "https://github.com/alice/widget".to_string(),
//!         ssh_url: "git@github.com:alice/widget.git".to_string(),
//!     }),
//! };
//! let branches = BranchSet::new();
//! let remotes: RemoteSet =
//!     [Remote::new("origin", "git@github.com:bob/widget.git")].into_iter().collect();
//! let flags = RepositoryFlags {
//!     is_present: true,
//!     ..Default::default()
//! };
//!
//! let op = CheckoutOp::new(&pull_request, &branches, &remotes, flags);
//! assert!(op.status().is_enabled());
//! ```

use thiserror::Error;
use tracing::{debug, info, instrument};

use super::status::{CheckoutStatus, RepositoryFlags};
use crate::core::branch::BranchSet;
use crate::core::pull_request::PullRequest;
use crate::core::remote::RemoteSet;
use crate::git::{CheckoutOptions, FetchOptions, GitError, GitOps, PullOptions};

/// Errors from the checkout procedure.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A git operation failed; propagated without reinterpretation.
    #[error(transparent)]
    Git(#[from] GitError),

    /// The procedure was invoked while checkout was not enabled.
    #[error("checkout is not enabled: {status}")]
    NotEnabled {
        /// The status at the time of the call.
        status: CheckoutStatus,
    },
}

/// Which path a successful checkout took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// An existing local branch tracking the head ref was checked out
    /// and fast-forwarded.
    FastForwarded {
        /// The local branch that was checked out.
        local_ref: String,
        /// The remote the pull came from.
        remote_name: String,
    },
    /// A new local branch was created from the fetched head ref.
    Created {
        /// The local branch that was created and checked out.
        local_ref: String,
        /// The remote the head ref was fetched from.
        remote_name: String,
    },
}

/// One evaluation of "can this pull request be checked out here, and
/// how".
///
/// Borrows the current snapshots. A repository refresh produces new
/// snapshots and a new op; an op is never reused across refreshes.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutOp<'a> {
    pull_request: &'a PullRequest,
    branches: &'a BranchSet,
    remotes: &'a RemoteSet,
    flags: RepositoryFlags,
}

impl<'a> CheckoutOp<'a> {
    pub fn new(
        pull_request: &'a PullRequest,
        branches: &'a BranchSet,
        remotes: &'a RemoteSet,
        flags: RepositoryFlags,
    ) -> Self {
        Self {
            pull_request,
            branches,
            remotes,
            flags,
        }
    }

    /// Decide the checkout affordance. Causes are evaluated in strict
    /// precedence order; the first match wins.
    pub fn status(&self) -> CheckoutStatus {
        if self.flags.is_absent {
            return CheckoutStatus::disabled("No repository found");
        }
        if self.flags.is_loading {
            return CheckoutStatus::disabled("Loading");
        }
        if !self.flags.is_present {
            return CheckoutStatus::disabled("No repository found");
        }
        if self.flags.is_merging {
            return CheckoutStatus::disabled("Merge in progress");
        }
        if self.flags.is_rebasing {
            return CheckoutStatus::disabled("Rebase in progress");
        }
        if self.flags.checkout_in_progress {
            return CheckoutStatus::disabled("Checking out...");
        }
        let Some(head_repository) = self.pull_request.head_repository.as_ref() else {
            return CheckoutStatus::disabled("Pull request head repository does not exist");
        };

        let push = self.branches.head_branch().push();
        let head_remote = self.remotes.with_name(push.remote_name());
        let tracks_head_repository = head_remote.owner()
            == Some(head_repository.owner.login.as_str())
            && head_remote.repo() == Some(head_repository.name.as_str());

        if tracks_head_repository {
            let short_remote_ref = push.short_remote_ref();
            let pull_refspec = format!("pull/{}/head", self.pull_request.number);
            if short_remote_ref == pull_refspec
                || short_remote_ref == self.pull_request.head_ref_name
            {
                return CheckoutStatus::Current;
            }
        }

        CheckoutStatus::Enabled
    }

    /// Perform the checkout.
    ///
    /// Re-checks [`status`](CheckoutOp::status) first; invoking this
    /// while anything but enabled is a caller bug and errors without
    /// touching git.
    #[instrument(skip(self, git), fields(number = self.pull_request.number))]
    pub async fn run(&self, git: &dyn GitOps) -> Result<CheckoutOutcome, CheckoutError> {
        let status = self.status();
        if !status.is_enabled() {
            return Err(CheckoutError::NotEnabled { status });
        }
        let Some(head_repository) = self.pull_request.head_repository.as_ref() else {
            // Unreachable: the status decision never enables a pull
            // request without a head repository.
            return Err(CheckoutError::NotEnabled { status });
        };

        let head_ref_name = self.pull_request.head_ref_name.as_str();
        let full_head_ref = format!("refs/heads/{}", head_ref_name);
        let owner = head_repository.owner.login.as_str();

        let source_remote_name = match self
            .remotes
            .matching_github_repository(owner, &head_repository.name)
            .first()
        {
            Some(remote) => {
                debug!("reusing remote {} for {}/{}", remote.name(), owner, head_repository.name);
                remote.name().to_string()
            }
            None => {
                let url = match self.remotes.most_used_protocol(&["https", "ssh"]) {
                    Some("ssh") => head_repository.ssh_url.clone(),
                    _ => format!("{}.git", head_repository.url),
                };
                debug!("adding remote {} -> {}", owner, url);
                let remote = git.add_remote(owner, &url).await?;
                remote.name().to_string()
            }
        };

        if let Some(local) = self
            .branches
            .pull_targets(&source_remote_name, &full_head_ref)
            .first()
        {
            let local_ref = local.name().full().to_string();
            debug!("fast-forwarding existing local branch {}", local_ref);
            git.checkout(&local_ref, CheckoutOptions::default()).await?;
            git.pull(
                &full_head_ref,
                PullOptions {
                    remote_name: source_remote_name.clone(),
                    ff_only: true,
                },
            )
            .await?;
            info!("checked out pull request onto {}", local_ref);
            return Ok(CheckoutOutcome::FastForwarded {
                local_ref,
                remote_name: source_remote_name,
            });
        }

        git.fetch(
            &full_head_ref,
            FetchOptions {
                remote_name: source_remote_name.clone(),
            },
        )
        .await?;

        let local_ref = format!("pr-{}/{}/{}", self.pull_request.number, owner, head_ref_name);
        git.checkout(
            &local_ref,
            CheckoutOptions {
                create_new: true,
                track: true,
                start_point: Some(format!(
                    "refs/remotes/{}/{}",
                    source_remote_name, head_ref_name
                )),
            },
        )
        .await?;
        info!("checked out pull request onto new branch {}", local_ref);
        Ok(CheckoutOutcome::Created {
            local_ref,
            remote_name: source_remote_name,
        })
    }
}
