//! repository::repo
//!
//! The repository facade: a git collaborator, the lifecycle state that
//! gates it, and the event plumbing around state changes.
//!
//! # Design
//!
//! The facade owns an `Arc<dyn GitOps>` and never hands it out. Callers
//! go through the facade's own [`GitOps`] implementation, which
//! delegates only while the repository is `Present` and otherwise
//! answers `GitError::UnsupportedOperation` naming the operation and
//! the state. The working-tree probes are the exception: a repository
//! that is not present is simply not merging or rebasing, so
//! `is_merging`/`is_rebasing` answer `Ok(false)` instead of erroring.
//!
//! # Concurrency
//!
//! Asynchronous probes race against newer state changes. Rather than
//! locking probes out, every transition request carries a [`StateToken`]
//! captured when the probe began; if the epoch moved on in the meantime
//! the request resolves as [`Transition::Superseded`] and changes
//! nothing. Observers are invoked after the state lock is released, so
//! a callback may re-enter the repository freely.

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use super::state::RepositoryState;
use crate::checkout::RepositoryFlags;
use crate::core::remote::Remote;
use crate::git::{CheckoutOptions, FetchOptions, GitError, GitOps, PullOptions, PushOptions};

/// Errors from the transition protocol.
#[derive(Debug, Clone, Error)]
pub enum StateError {
    /// The requested target is not reachable from the active state.
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition {
        /// The state that was active when the request arrived.
        from: RepositoryState,
        /// The requested target state.
        to: RepositoryState,
    },
}

/// A capture of the state epoch, required to request a transition.
///
/// A token captured before some other transition applied is stale;
/// requests carrying it resolve as [`Transition::Superseded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateToken {
    epoch: u64,
}

/// The outcome of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The transition was applied and observers were notified.
    Applied {
        /// The state before the transition.
        from: RepositoryState,
        /// The state after the transition.
        to: RepositoryState,
    },
    /// A newer state change already won; nothing happened.
    Superseded,
}

type StateObserver = Arc<dyn Fn(RepositoryState) + Send + Sync>;
type UpdateObserver = Arc<dyn Fn() + Send + Sync>;

struct RepositoryInner {
    state: RepositoryState,
    epoch: u64,
    state_observers: Vec<StateObserver>,
    update_observers: Vec<UpdateObserver>,
}

/// A local repository: a lifecycle state plus the gated git collaborator.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use berth::git::mock::MockGit;
/// use berth::repository::{Repository, RepositoryState, Transition};
///
/// let repo = Repository::new(Arc::new(MockGit::new()));
/// assert_eq!(repo.state(), RepositoryState::Loading);
///
/// let token = repo.state_token();
/// let outcome = repo.transition(token, RepositoryState::Present).unwrap();
/// assert_eq!(
///     outcome,
///     Transition::Applied {
///         from: RepositoryState::Loading,
///         to: RepositoryState::Present,
///     }
/// );
/// ```
pub struct Repository {
    git: Arc<dyn GitOps>,
    inner: Mutex<RepositoryInner>,
}

impl Repository {
    /// A repository whose working directory is being probed.
    pub fn new(git: Arc<dyn GitOps>) -> Self {
        Self::with_state(git, RepositoryState::Loading)
    }

    /// Restored from a session that expected a repository here.
    pub fn loading_guess(git: Arc<dyn GitOps>) -> Self {
        Self::with_state(git, RepositoryState::LoadingGuess)
    }

    /// Restored from a session that expected no repository here.
    pub fn absent_guess(git: Arc<dyn GitOps>) -> Self {
        Self::with_state(git, RepositoryState::AbsentGuess)
    }

    /// A repository known not to exist.
    pub fn absent(git: Arc<dyn GitOps>) -> Self {
        Self::with_state(git, RepositoryState::Absent)
    }

    fn with_state(git: Arc<dyn GitOps>, state: RepositoryState) -> Self {
        Self {
            git,
            inner: Mutex::new(RepositoryInner {
                state,
                epoch: 0,
                state_observers: Vec::new(),
                update_observers: Vec::new(),
            }),
        }
    }

    /// The active lifecycle state.
    pub fn state(&self) -> RepositoryState {
        self.inner.lock().unwrap().state
    }

    /// Capture the current epoch for a later [`transition`] request.
    ///
    /// [`transition`]: Repository::transition
    pub fn state_token(&self) -> StateToken {
        StateToken {
            epoch: self.inner.lock().unwrap().epoch,
        }
    }

    /// Request a transition to `next` on behalf of the probe that
    /// captured `token`.
    ///
    /// A stale token means a newer state change won the race; the
    /// request resolves as [`Transition::Superseded`] without touching
    /// anything. A fresh token with an unreachable target is a caller
    /// bug and errors.
    pub fn transition(
        &self,
        token: StateToken,
        next: RepositoryState,
    ) -> Result<Transition, StateError> {
        let (from, state_observers, update_observers) = {
            let mut inner = self.inner.lock().unwrap();
            if token.epoch != inner.epoch {
                debug!(
                    "transition to {} superseded by a newer state change ({} active)",
                    next, inner.state
                );
                return Ok(Transition::Superseded);
            }
            if !inner.state.can_transition_to(next) {
                return Err(StateError::IllegalTransition {
                    from: inner.state,
                    to: next,
                });
            }
            let from = inner.state;
            inner.state = next;
            inner.epoch += 1;
            (
                from,
                inner.state_observers.clone(),
                inner.update_observers.clone(),
            )
        };

        debug!("repository state changed: {} -> {}", from, next);
        for observer in &state_observers {
            observer(next);
        }
        if !next.is_destroyed() {
            for observer in &update_observers {
                observer();
            }
        }

        Ok(Transition::Applied { from, to: next })
    }

    /// Tear the repository down.
    ///
    /// Legal from any state and idempotent. Emits only the state-change
    /// event.
    pub fn destroy(&self) {
        let (from, state_observers) = {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_destroyed() {
                return;
            }
            let from = inner.state;
            inner.state = RepositoryState::Destroyed;
            inner.epoch += 1;
            (from, inner.state_observers.clone())
        };

        debug!("repository destroyed (was {})", from);
        for observer in &state_observers {
            observer(RepositoryState::Destroyed);
        }
    }

    /// Invoke `f` with the new state after every applied transition.
    pub fn on_did_change_state<F>(&self, f: F)
    where
        F: Fn(RepositoryState) + Send + Sync + 'static,
    {
        self.inner.lock().unwrap().state_observers.push(Arc::new(f));
    }

    /// Invoke `f` after every applied transition except into Destroyed.
    pub fn on_did_update<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.lock().unwrap().update_observers.push(Arc::new(f));
    }

    /// Capture the state-derived flags the checkout status decision
    /// consumes.
    ///
    /// `checkout_in_progress` stays with the caller running the
    /// procedure; it is always `false` here.
    pub async fn snapshot_flags(&self) -> Result<RepositoryFlags, GitError> {
        let state = self.state();
        Ok(RepositoryFlags {
            is_absent: state.is_absent(),
            is_loading: state.is_loading(),
            is_present: state.is_present(),
            is_merging: self.is_merging().await?,
            is_rebasing: self.is_rebasing().await?,
            checkout_in_progress: false,
        })
    }

    /// Gate an operation on the Present state.
    fn ensure_present(&self, operation: &str) -> Result<(), GitError> {
        let state = self.state();
        if state.is_present() {
            Ok(())
        } else {
            Err(GitError::UnsupportedOperation {
                operation: operation.to_string(),
                state: state.name().to_string(),
            })
        }
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GitOps for Repository {
    async fn add_remote(&self, name: &str, url: &str) -> Result<Remote, GitError> {
        self.ensure_present("add_remote")?;
        self.git.add_remote(name, url).await
    }

    async fn fetch(&self, refspec: &str, options: FetchOptions) -> Result<(), GitError> {
        self.ensure_present("fetch")?;
        self.git.fetch(refspec, options).await
    }

    async fn pull(&self, refspec: &str, options: PullOptions) -> Result<(), GitError> {
        self.ensure_present("pull")?;
        self.git.pull(refspec, options).await
    }

    async fn push(&self, refspec: &str, options: PushOptions) -> Result<(), GitError> {
        self.ensure_present("push")?;
        self.git.push(refspec, options).await
    }

    async fn checkout(&self, rev: &str, options: CheckoutOptions) -> Result<(), GitError> {
        self.ensure_present("checkout")?;
        self.git.checkout(rev, options).await
    }

    async fn is_merging(&self) -> Result<bool, GitError> {
        if self.state().is_present() {
            self.git.is_merging().await
        } else {
            Ok(false)
        }
    }

    async fn is_rebasing(&self) -> Result<bool, GitError> {
        if self.state().is_present() {
            self.git.is_rebasing().await
        } else {
            Ok(false)
        }
    }
}
