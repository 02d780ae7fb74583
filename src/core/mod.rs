//! core
//!
//! Core domain types for the git reference model.
//!
//! # Modules
//!
//! - [`refs`] - Ref names, detached descriptions, and tracking tuples
//! - [`branch`] - Branch snapshots and the indexed branch collection
//! - [`remote`] - Remotes with GitHub URL recognition and their collection
//! - [`pull_request`] - The pull-request metadata contract
//!
//! # Design Principles
//!
//! - Values are immutable snapshots; refreshing produces new values
//! - Construction is total: absent input narrows to a null variant
//!   rather than failing
//! - Null variants answer accessors with empty values, so call chains
//!   need no presence checks

pub mod branch;
pub mod pull_request;
pub mod refs;
pub mod remote;
