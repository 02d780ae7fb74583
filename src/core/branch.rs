//! core::branch
//!
//! Branch snapshots and the indexed collection that answers tracking
//! queries over them.
//!
//! # Types
//!
//! - [`Branch`] - An immutable snapshot of one local branch
//! - [`BranchBuilder`] - Assembles a branch, resolving push fallbacks
//! - [`BranchSet`] - Flat list plus head cache and reverse tracking indexes
//!
//! # Design
//!
//! A `Branch` is built once from a snapshot of repository refs and never
//! mutated; a refreshed repository produces a new `BranchSet`. The set
//! keeps two reverse indexes keyed by `(remote name, remote ref)` so that
//! "which local branches pull from `refs/heads/feature` on `upstream`"
//! is a map lookup rather than a scan.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

use crate::core::refs::{BranchName, DescribedName, LocalRef, RefName};

static NULL_BRANCH: Lazy<Branch> = Lazy::new(|| Branch {
    name: BranchName::Qualified(RefName::new("")),
    upstream: LocalRef::new("", "", ""),
    push: LocalRef::new("", "", ""),
    sha: String::new(),
    committer_date: None,
    head: false,
    detached: false,
});

/// An immutable snapshot of a local branch: its name, tracking
/// configuration, tip, and head/detached flags.
///
/// The push configuration defaults to the upstream, component by
/// component, at build time. A detached position is represented as a
/// branch whose name is a description rather than a ref.
///
/// # Example
///
/// ```
/// use berth::core::branch::Branch;
///
/// let branch = Branch::builder("refs/heads/feature")
///     .upstream("refs/remotes/origin/feature", "origin", "refs/heads/feature")
///     .sha("abc123")
///     .head(true)
///     .build();
///
/// assert_eq!(branch.name().short(), "feature");
/// assert!(branch.is_head());
/// // Push defaults to the upstream configuration.
/// assert_eq!(branch.push(), branch.upstream());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    name: BranchName,
    upstream: LocalRef,
    push: LocalRef,
    sha: String,
    committer_date: Option<DateTime<Utc>>,
    head: bool,
    detached: bool,
}

impl Branch {
    /// A plain local branch with no tracking configuration.
    pub fn named(name: impl Into<String>) -> Branch {
        Branch::builder(name).build()
    }

    /// Start building a branch snapshot.
    pub fn builder(name: impl Into<String>) -> BranchBuilder {
        BranchBuilder {
            name: name.into(),
            upstream: LocalRef::new("", "", ""),
            push: None,
            sha: String::new(),
            committer_date: None,
            head: false,
            detached: false,
        }
    }

    /// The shared null branch. Answers every accessor with the null
    /// variant of its type, so callers can chain without presence checks.
    pub fn null() -> &'static Branch {
        &NULL_BRANCH
    }

    pub fn name(&self) -> &BranchName {
        &self.name
    }

    /// The tracking configuration this branch pulls through.
    pub fn upstream(&self) -> &LocalRef {
        &self.upstream
    }

    /// The tracking configuration this branch pushes through.
    pub fn push(&self) -> &LocalRef {
        &self.push
    }

    pub fn sha(&self) -> &str {
        &self.sha
    }

    pub fn committer_date(&self) -> Option<DateTime<Utc>> {
        self.committer_date
    }

    /// Whether this branch is currently checked out.
    pub fn is_head(&self) -> bool {
        self.head
    }

    /// Whether HEAD points at a commit rather than a branch ref.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn is_present(&self) -> bool {
        self.name.is_present()
    }

    /// The refspec a fetch uses to update this branch's upstream ref:
    /// remote-side ref to local tracking ref.
    pub fn fetch_ref_spec(&self) -> String {
        format!(
            "{}:{}",
            self.upstream.remote_ref_name().full(),
            self.upstream.ref_name().full()
        )
    }

    /// The refspec a push uses for this branch: local name to the push
    /// destination's remote-side ref.
    pub fn push_ref_spec(&self) -> String {
        format!(
            "{}:{}",
            self.name.full(),
            self.push.remote_ref_name().full()
        )
    }
}

/// Assembles a [`Branch`], resolving the push configuration against the
/// upstream at [`build`](BranchBuilder::build) time.
#[derive(Debug, Clone)]
pub struct BranchBuilder {
    name: String,
    upstream: LocalRef,
    push: Option<LocalRef>,
    sha: String,
    committer_date: Option<DateTime<Utc>>,
    head: bool,
    detached: bool,
}

impl BranchBuilder {
    /// Set the upstream tracking configuration.
    pub fn upstream(
        mut self,
        ref_name: impl Into<String>,
        remote_name: impl Into<String>,
        remote_ref_name: impl Into<String>,
    ) -> Self {
        self.upstream = LocalRef::new(ref_name, remote_name, remote_ref_name);
        self
    }

    /// Set the push configuration. Components left empty resolve to the
    /// corresponding upstream component when the branch is built.
    pub fn push(
        mut self,
        ref_name: impl Into<String>,
        remote_name: impl Into<String>,
        remote_ref_name: impl Into<String>,
    ) -> Self {
        self.push = Some(LocalRef::new(ref_name, remote_name, remote_ref_name));
        self
    }

    pub fn sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = sha.into();
        self
    }

    pub fn committer_date(mut self, date: DateTime<Utc>) -> Self {
        self.committer_date = Some(date);
        self
    }

    pub fn head(mut self, head: bool) -> Self {
        self.head = head;
        self
    }

    /// Mark this as a detached position; the name becomes a description
    /// instead of a ref.
    pub fn detached(mut self, detached: bool) -> Self {
        self.detached = detached;
        self
    }

    pub fn build(self) -> Branch {
        let push = match &self.push {
            Some(push) => push.or(&self.upstream),
            None => self.upstream.clone(),
        };
        let name = if self.detached {
            BranchName::Described(DescribedName::new(self.name))
        } else {
            BranchName::Qualified(RefName::new(self.name))
        };
        Branch {
            name,
            upstream: self.upstream,
            push,
            sha: self.sha,
            committer_date: self.committer_date,
            head: self.head,
            detached: self.detached,
        }
    }
}

/// An indexed collection of branch snapshots.
///
/// Tracks the head branch (if any branch is flagged as head) and two
/// reverse indexes from `(remote name, remote ref)` pairs to branches:
/// one over upstream configurations, one over push configurations.
///
/// # Example
///
/// ```
/// use berth::core::branch::{Branch, BranchSet};
///
/// let mut branches = BranchSet::new();
/// branches.add(Branch::builder("main").head(true).build());
/// branches.add(
///     Branch::builder("pr-7/alice/fix")
///         .upstream("refs/remotes/alice/fix", "alice", "refs/heads/fix")
///         .build(),
/// );
///
/// assert_eq!(branches.head_branch().name().full(), "main");
/// assert_eq!(branches.pull_targets("alice", "refs/heads/fix").len(), 1);
/// assert!(branches.pull_targets("alice", "refs/heads/other").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchSet {
    all: Vec<Branch>,
    head: Option<usize>,
    by_upstream: HashMap<(String, String), Vec<usize>>,
    by_push: HashMap<(String, String), Vec<usize>>,
}

impl BranchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a branch snapshot to the set.
    ///
    /// A branch flagged as head replaces any previously cached head; more
    /// than one head in a set is a caller error tolerated by letting the
    /// last one win. Branches with a present upstream or push
    /// configuration are indexed under the corresponding
    /// `(remote name, remote ref)` pair.
    pub fn add(&mut self, branch: Branch) {
        let index = self.all.len();
        if branch.is_head() {
            self.head = Some(index);
        }
        if branch.upstream().is_present() {
            self.by_upstream
                .entry(index_key(branch.upstream()))
                .or_default()
                .push(index);
        }
        if branch.push().is_present() {
            self.by_push
                .entry(index_key(branch.push()))
                .or_default()
                .push(index);
        }
        self.all.push(branch);
    }

    /// The currently checked-out branch, or the null branch when HEAD is
    /// unborn or no branch in the set was flagged as head.
    pub fn head_branch(&self) -> &Branch {
        self.head
            .and_then(|index| self.all.get(index))
            .unwrap_or_else(|| Branch::null())
    }

    /// Branches whose upstream pulls `remote_ref` from `remote_name`, in
    /// insertion order. Unknown pairs answer with an empty list.
    pub fn pull_targets(&self, remote_name: &str, remote_ref: &str) -> Vec<&Branch> {
        self.lookup(&self.by_upstream, remote_name, remote_ref)
    }

    /// Branches whose push destination is `remote_ref` on `remote_name`,
    /// in insertion order. Unknown pairs answer with an empty list.
    pub fn push_sources(&self, remote_name: &str, remote_ref: &str) -> Vec<&Branch> {
        self.lookup(&self.by_push, remote_name, remote_ref)
    }

    /// Full names of every branch in the set, in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.all.iter().map(|branch| branch.name().full()).collect()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Branch> {
        self.all.iter()
    }

    fn lookup(
        &self,
        index: &HashMap<(String, String), Vec<usize>>,
        remote_name: &str,
        remote_ref: &str,
    ) -> Vec<&Branch> {
        index
            .get(&(remote_name.to_string(), remote_ref.to_string()))
            .map(|hits| hits.iter().filter_map(|&i| self.all.get(i)).collect())
            .unwrap_or_default()
    }
}

fn index_key(tracking: &LocalRef) -> (String, String) {
    (
        tracking.remote_name().to_string(),
        tracking.remote_ref_name().full().to_string(),
    )
}

impl FromIterator<Branch> for BranchSet {
    fn from_iter<I: IntoIterator<Item = Branch>>(iter: I) -> Self {
        let mut set = BranchSet::new();
        for branch in iter {
            set.add(branch);
        }
        set
    }
}
