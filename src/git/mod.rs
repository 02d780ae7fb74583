//! git
//!
//! The async seam between the models and an actual git client.
//!
//! # Architecture
//!
//! The [`GitOps`] trait defines the operations the checkout engine needs:
//! remote management, fetch/pull/push, checkout, and working-tree probes.
//! The engine is written entirely against the trait, so a host can back it
//! with a subprocess runner, a bindings library, or a test double without
//! touching engine code.
//!
//! # Modules
//!
//! - `traits`: Core `GitOps` trait, option structs, and [`GitError`]
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```
//! use berth::git::mock::MockGit;
//! use berth::git::{CheckoutOptions, GitOps};
//!
//! # tokio_test::block_on(async {
//! let git = MockGit::new();
//! git.checkout("main", CheckoutOptions::default()).await.unwrap();
//! assert_eq!(git.checked_out().as_deref(), Some("main"));
//! # });
//! ```

pub mod mock;
mod traits;

pub use traits::*;
