//! checkout
//!
//! Pull-request checkout resolution: the status decision and the
//! procedure that performs the checkout.
//!
//! # Architecture
//!
//! Callers assemble a [`CheckoutOp`] from one consistent snapshot (the
//! pull request metadata, the branch and remote sets, and the
//! repository's [`RepositoryFlags`]) and ask for its
//! [`status`](CheckoutOp::status). When the answer is enabled and the
//! user acts on it, [`run`](CheckoutOp::run) drives the git
//! collaborator through remote resolution, fetch-or-reuse, and the
//! checkout itself.
//!
//! # Modules
//!
//! - `status`: the [`CheckoutStatus`] vocabulary and [`RepositoryFlags`]
//! - `op`: [`CheckoutOp`], its outcome, and its errors

mod op;
mod status;

pub use op::*;
pub use status::*;
