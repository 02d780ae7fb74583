//! Berth - a git reference model and pull-request checkout engine
//!
//! Berth models the local side of a GitHub pull request: the branches and
//! remotes of a working copy, the lifecycle state of the repository that
//! owns them, and the decision logic that determines whether a pull
//! request is already checked out locally or can be checked out now. When
//! a checkout is possible, Berth drives the remote discovery, fetch, and
//! checkout sequence through an async git collaborator supplied by the
//! host.
//!
//! # Architecture
//!
//! The crate is layered, leaves first:
//!
//! - [`core`] - Immutable value types: refs, branches, remotes, and the
//!   pull-request metadata contract
//! - [`git`] - The [`GitOps`](git::GitOps) collaborator trait, its typed
//!   errors, and a deterministic mock
//! - [`repository`] - Repository lifecycle states and the gated façade
//! - [`checkout`] - Checkout status resolution and the checkout procedure
//!
//! # Correctness Invariants
//!
//! Berth maintains the following invariants:
//!
//! 1. Value types are immutable snapshots; a refreshed repository produces
//!    new values rather than mutating old ones
//! 2. Git operations are reachable only through the active repository
//!    state, which rejects operations it cannot support
//! 3. A state transition instigated under a superseded state resolves as a
//!    no-op, never as an error
//! 4. Checkout failures surface to the caller untouched; nothing is
//!    silently retried or absorbed

pub mod checkout;
pub mod core;
pub mod git;
pub mod repository;
