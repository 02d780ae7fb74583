//! core::refs
//!
//! Value types for git reference names and branch tracking configuration.
//!
//! # Types
//!
//! - [`RefName`] - Fully qualified git reference with a derived short form
//! - [`DescribedName`] - Human-readable description of a detached position
//! - [`BranchName`] - Either of the above, as carried by a branch
//! - [`LocalRef`] - A (local ref, remote, remote ref) tracking tuple
//!
//! # Design
//!
//! Construction never fails. An empty input produces the "null" variant of
//! the type, which answers every accessor with an empty value and reports
//! `is_present() == false`. Callers can therefore chain accessors without
//! null checks, the way the rest of the crate expects
//! (`branches.head_branch().push().short_remote_ref()` is always a valid
//! expression, even on an unborn HEAD).
//!
//! # Examples
//!
//! ```
//! use berth::core::refs::{LocalRef, RefName};
//!
//! let name = RefName::new("refs/remotes/origin/feature");
//! assert_eq!(name.full(), "refs/remotes/origin/feature");
//! assert_eq!(name.short(), "origin/feature");
//!
//! let absent = RefName::none();
//! assert!(!absent.is_present());
//! assert_eq!(absent.short(), "");
//!
//! let tracking = LocalRef::new("refs/remotes/origin/feature", "origin", "refs/heads/feature");
//! assert_eq!(tracking.short_remote_ref(), "feature");
//! ```

use once_cell::sync::Lazy;

/// Prefixes stripped, at most one, to derive a short ref name.
const SHORTENED_PREFIXES: [&str; 3] = ["refs/heads/", "refs/remotes/", "refs/tags/"];

static NULL_REF_NAME: Lazy<RefName> = Lazy::new(RefName::default);
static NULL_LOCAL_REF: Lazy<LocalRef> = Lazy::new(LocalRef::default);

/// A fully qualified git reference name.
///
/// Only the full form is stored; the short form is derived on demand by
/// stripping one leading `refs/heads/`, `refs/remotes/`, or `refs/tags/`
/// prefix. A remote tracking ref keeps its remote segment:
/// `refs/remotes/origin/main` shortens to `origin/main`.
///
/// The empty ref name stands in for "no ref"; see [`RefName::none`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RefName(String);

impl RefName {
    /// Wrap a raw reference name. Never fails; the empty string yields the
    /// null ref name.
    pub fn new(full: impl Into<String>) -> Self {
        Self(full.into())
    }

    /// The shared null ref name.
    pub fn none() -> &'static RefName {
        &NULL_REF_NAME
    }

    /// The full reference name as given at construction.
    pub fn full(&self) -> &str {
        &self.0
    }

    /// The short form, with at most one well-known prefix stripped.
    ///
    /// # Example
    ///
    /// ```
    /// use berth::core::refs::RefName;
    ///
    /// assert_eq!(RefName::new("refs/heads/feature/foo").short(), "feature/foo");
    /// assert_eq!(RefName::new("refs/remotes/origin/main").short(), "origin/main");
    /// assert_eq!(RefName::new("refs/tags/v1.0").short(), "v1.0");
    /// assert_eq!(RefName::new("main").short(), "main");
    /// ```
    pub fn short(&self) -> &str {
        for prefix in SHORTENED_PREFIXES {
            if let Some(rest) = self.0.strip_prefix(prefix) {
                return rest;
            }
        }
        &self.0
    }

    /// Whether this names an actual ref.
    pub fn is_present(&self) -> bool {
        !self.0.is_empty()
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A human-readable description of a detached HEAD position, as produced
/// by `git describe`. Interface-compatible with [`RefName`], except the
/// full and short forms are identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DescribedName(String);

impl DescribedName {
    /// Wrap a description. Never fails.
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    pub fn full(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        &self.0
    }

    pub fn is_present(&self) -> bool {
        !self.0.is_empty()
    }
}

impl std::fmt::Display for DescribedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name a branch carries: a real reference for attached branches, a
/// description for detached ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BranchName {
    /// An attached branch, named by a git reference.
    Qualified(RefName),
    /// A detached position, named by a `git describe`-style description.
    Described(DescribedName),
}

impl BranchName {
    pub fn full(&self) -> &str {
        match self {
            BranchName::Qualified(name) => name.full(),
            BranchName::Described(name) => name.full(),
        }
    }

    pub fn short(&self) -> &str {
        match self {
            BranchName::Qualified(name) => name.short(),
            BranchName::Described(name) => name.short(),
        }
    }

    pub fn is_present(&self) -> bool {
        match self {
            BranchName::Qualified(name) => name.is_present(),
            BranchName::Described(name) => name.is_present(),
        }
    }

    /// Whether this is a detached-HEAD description rather than a ref.
    pub fn is_described(&self) -> bool {
        matches!(self, BranchName::Described(_))
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full())
    }
}

/// A branch's fetch or push destination: the local ref it updates, the
/// remote it talks to, and the ref on that remote.
///
/// Components resolve independently against a fallback with [`LocalRef::or`],
/// which is how a branch's push configuration defaults to its upstream
/// piece by piece.
///
/// # Example
///
/// ```
/// use berth::core::refs::LocalRef;
///
/// let upstream = LocalRef::new("refs/remotes/origin/main", "origin", "refs/heads/main");
///
/// // A push override that only names a different remote ref keeps the
/// // upstream's local ref and remote.
/// let push = LocalRef::new("", "", "refs/heads/mirror").or(&upstream);
/// assert_eq!(push.ref_name().full(), "refs/remotes/origin/main");
/// assert_eq!(push.remote_name(), "origin");
/// assert_eq!(push.remote_ref_name().full(), "refs/heads/mirror");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocalRef {
    ref_name: RefName,
    remote_name: String,
    remote_ref_name: RefName,
}

impl LocalRef {
    /// Build a tracking tuple from raw strings. Never fails; empty inputs
    /// leave the corresponding component absent, and all-empty input is
    /// the null tuple.
    pub fn new(
        ref_name: impl Into<String>,
        remote_name: impl Into<String>,
        remote_ref_name: impl Into<String>,
    ) -> Self {
        Self {
            ref_name: RefName::new(ref_name),
            remote_name: remote_name.into(),
            remote_ref_name: RefName::new(remote_ref_name),
        }
    }

    /// The shared null tracking tuple.
    pub fn none() -> &'static LocalRef {
        &NULL_LOCAL_REF
    }

    /// Resolve each absent component from `fallback`.
    ///
    /// Populated components are kept as-is, so `a.or(b)` with a fully
    /// populated `a` is just `a`, and with a fully absent `a` it equals
    /// `b` in all three components.
    pub fn or(&self, fallback: &LocalRef) -> LocalRef {
        LocalRef {
            ref_name: if self.ref_name.is_present() {
                self.ref_name.clone()
            } else {
                fallback.ref_name.clone()
            },
            remote_name: if self.remote_name.is_empty() {
                fallback.remote_name.clone()
            } else {
                self.remote_name.clone()
            },
            remote_ref_name: if self.remote_ref_name.is_present() {
                self.remote_ref_name.clone()
            } else {
                fallback.remote_ref_name.clone()
            },
        }
    }

    /// The local ref this tuple updates.
    pub fn ref_name(&self) -> &RefName {
        &self.ref_name
    }

    /// The remote this tuple fetches from or pushes to.
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    /// The ref on the remote side.
    pub fn remote_ref_name(&self) -> &RefName {
        &self.remote_ref_name
    }

    /// Short form of the remote-side ref.
    pub fn short_remote_ref(&self) -> &str {
        self.remote_ref_name.short()
    }

    /// Whether any component is populated.
    pub fn is_present(&self) -> bool {
        self.ref_name.is_present()
            || !self.remote_name.is_empty()
            || self.remote_ref_name.is_present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod ref_name {
        use super::*;

        #[test]
        fn strips_heads_prefix() {
            let name = RefName::new("refs/heads/feature/foo");
            assert_eq!(name.full(), "refs/heads/feature/foo");
            assert_eq!(name.short(), "feature/foo");
        }

        #[test]
        fn strips_remotes_prefix_keeping_remote_segment() {
            let name = RefName::new("refs/remotes/origin/upstream");
            assert_eq!(name.short(), "origin/upstream");
        }

        #[test]
        fn strips_tags_prefix() {
            assert_eq!(RefName::new("refs/tags/v1.2.3").short(), "v1.2.3");
        }

        #[test]
        fn unprefixed_name_unchanged() {
            let name = RefName::new("main");
            assert_eq!(name.full(), "main");
            assert_eq!(name.short(), "main");
        }

        #[test]
        fn unknown_namespace_unchanged() {
            assert_eq!(
                RefName::new("refs/notes/commits").short(),
                "refs/notes/commits"
            );
        }

        #[test]
        fn none_is_absent() {
            assert!(!RefName::none().is_present());
            assert_eq!(RefName::none().full(), "");
            assert_eq!(RefName::none().short(), "");
        }

        #[test]
        fn empty_input_equals_none() {
            assert_eq!(&RefName::new(""), RefName::none());
        }

        #[test]
        fn displays_full_form() {
            assert_eq!(
                RefName::new("refs/heads/main").to_string(),
                "refs/heads/main"
            );
        }
    }

    mod described_name {
        use super::*;

        #[test]
        fn full_equals_short() {
            let described = DescribedName::new("v1.0-3-g1234abc");
            assert_eq!(described.full(), "v1.0-3-g1234abc");
            assert_eq!(described.short(), "v1.0-3-g1234abc");
        }

        #[test]
        fn presence() {
            assert!(DescribedName::new("detached").is_present());
            assert!(!DescribedName::new("").is_present());
        }
    }

    mod branch_name {
        use super::*;

        #[test]
        fn qualified_shortens() {
            let name = BranchName::Qualified(RefName::new("refs/heads/feature"));
            assert_eq!(name.full(), "refs/heads/feature");
            assert_eq!(name.short(), "feature");
            assert!(!name.is_described());
        }

        #[test]
        fn described_does_not_shorten() {
            let name = BranchName::Described(DescribedName::new("refs/heads/odd-describe"));
            assert_eq!(name.short(), "refs/heads/odd-describe");
            assert!(name.is_described());
        }

        #[test]
        fn presence_follows_inner_name() {
            assert!(BranchName::Qualified(RefName::new("main")).is_present());
            assert!(!BranchName::Qualified(RefName::new("")).is_present());
        }
    }

    mod local_ref {
        use super::*;

        #[test]
        fn all_empty_is_null() {
            let absent = LocalRef::new("", "", "");
            assert!(!absent.is_present());
            assert_eq!(&absent, LocalRef::none());
        }

        #[test]
        fn any_component_makes_it_present() {
            assert!(LocalRef::new("refs/heads/a", "", "").is_present());
            assert!(LocalRef::new("", "origin", "").is_present());
            assert!(LocalRef::new("", "", "refs/heads/a").is_present());
        }

        #[test]
        fn or_with_empty_input_equals_fallback() {
            let fallback = LocalRef::new("refs/remotes/origin/b", "origin", "refs/heads/b");
            let resolved = LocalRef::new("", "", "").or(&fallback);
            assert_eq!(resolved, fallback);
        }

        #[test]
        fn or_keeps_populated_components() {
            let fallback = LocalRef::new("refs/remotes/origin/b", "origin", "refs/heads/b");
            let resolved =
                LocalRef::new("refs/remotes/fork/b", "fork", "refs/heads/other").or(&fallback);
            assert_eq!(
                resolved,
                LocalRef::new("refs/remotes/fork/b", "fork", "refs/heads/other")
            );
        }

        #[test]
        fn or_resolves_components_independently() {
            let fallback = LocalRef::new("refs/remotes/origin/b", "origin", "refs/heads/b");
            let resolved = LocalRef::new("", "fork", "").or(&fallback);
            assert_eq!(resolved.ref_name().full(), "refs/remotes/origin/b");
            assert_eq!(resolved.remote_name(), "fork");
            assert_eq!(resolved.remote_ref_name().full(), "refs/heads/b");
        }

        #[test]
        fn or_against_none_changes_nothing() {
            let tracking = LocalRef::new("refs/remotes/origin/b", "origin", "refs/heads/b");
            assert_eq!(tracking.or(LocalRef::none()), tracking);
        }

        #[test]
        fn short_remote_ref() {
            let tracking = LocalRef::new("refs/remotes/origin/b", "origin", "refs/heads/b");
            assert_eq!(tracking.short_remote_ref(), "b");
        }
    }
}
