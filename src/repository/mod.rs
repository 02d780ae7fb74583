//! repository
//!
//! The lifecycle of a local repository and the facade that gates git
//! operations on it.
//!
//! # Architecture
//!
//! A [`Repository`] starts in a loading or guessed state, resolves to a
//! definitive one as probes complete, and can be destroyed from
//! anywhere. Transitions carry a [`StateToken`]; a probe that lost a
//! race resolves as [`Transition::Superseded`] rather than clobbering a
//! newer state. While `Present`, the facade delegates [`GitOps`] calls
//! to its collaborator; in every other state the operations fail with a
//! gate error naming the state.
//!
//! [`GitOps`]: crate::git::GitOps
//!
//! # Modules
//!
//! - `state`: the [`RepositoryState`] enum and its transition table
//! - `repo`: the [`Repository`] facade, tokens, and observers

mod repo;
mod state;

pub use repo::*;
pub use state::*;
