//! core::pull_request
//!
//! The pull-request metadata contract consumed by the checkout engine.
//!
//! These are plain data carriers with public fields, shaped to match the
//! upstream API's camel-cased JSON (`headRefName`, `headRepository`,
//! `sshUrl`, `owner.login`) regardless of which transport a host fetches
//! them over. A pull request whose head repository has been deleted
//! carries `head_repository: None`.
//!
//! # Example
//!
//! ```
//! use berth::core::pull_request::PullRequest;
//!
//! let raw = r#"{
//!     "number": 42,
//!     "headRefName": "feature",
//!     "headRepository": {
//!         "owner": {"login": "alice"},
//!         "name": "project",
//!         "url": "https://github.com/alice/project",
//!         "sshUrl": "git@github.com:alice/project.git"
//!     }
//! }"#;
//!
//! let pull_request: PullRequest = serde_json::from_str(raw).unwrap();
//! assert_eq!(pull_request.number, 42);
//! assert_eq!(pull_request.head_repository.unwrap().owner.login, "alice");
//! ```

use serde::{Deserialize, Serialize};

/// The slice of pull-request metadata the checkout engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    /// The pull request number within its base repository.
    pub number: u64,
    /// Name of the ref being proposed, without the `refs/heads/` prefix.
    pub head_ref_name: String,
    /// The repository the head ref lives in; `None` when that repository
    /// has been deleted.
    #[serde(default)]
    pub head_repository: Option<HeadRepository>,
}

/// The repository that hosts a pull request's head ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadRepository {
    pub owner: RepositoryOwner,
    pub name: String,
    /// Web URL of the repository; `.git` is appended to form the https
    /// clone URL.
    pub url: String,
    /// The ssh clone URL.
    pub ssh_url: String,
}

/// An account that owns a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}
