//! checkout::status
//!
//! The checkout affordance vocabulary and the state-derived flags the
//! decision consumes.
//!
//! # Design
//!
//! [`CheckoutStatus`] is ephemeral: recomputed on every evaluation,
//! never stored. The decision procedure itself only produces
//! `Disabled`, `Current`, and `Enabled`; `Hidden` and `Busy` exist for
//! callers layering presentation on top (a payload that is not a pull
//! request at all, or a checkout currently running). A repository that
//! is absent is reported as `Disabled` with a reason, on the grounds
//! that "there is nothing to check out into" is information, not
//! something to hide.

use std::fmt;

/// The checkout affordance for a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStatus {
    /// Not applicable to the payload; callers decide when.
    Hidden,
    /// Checkout is unavailable, with the user-facing reason.
    Disabled {
        /// Why checkout is unavailable right now.
        reason: String,
    },
    /// A checkout is already running.
    Busy,
    /// The pull request is already checked out locally.
    Current,
    /// Checkout may proceed.
    Enabled,
}

impl CheckoutStatus {
    /// Shorthand for building the disabled variant.
    pub fn disabled(reason: impl Into<String>) -> Self {
        CheckoutStatus::Disabled {
            reason: reason.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, CheckoutStatus::Enabled)
    }

    pub fn is_current(&self) -> bool {
        matches!(self, CheckoutStatus::Current)
    }

    /// The disabled reason, when there is one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            CheckoutStatus::Disabled { reason } => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutStatus::Hidden => write!(f, "hidden"),
            CheckoutStatus::Disabled { reason } => write!(f, "disabled: {}", reason),
            CheckoutStatus::Busy => write!(f, "busy"),
            CheckoutStatus::Current => write!(f, "current"),
            CheckoutStatus::Enabled => write!(f, "enabled"),
        }
    }
}

/// State-derived flags feeding the status decision.
///
/// [`Repository::snapshot_flags`](crate::repository::Repository::snapshot_flags)
/// fills the state and working-tree fields. `checkout_in_progress`
/// belongs to the caller running the procedure; flipping it around the
/// call is how one logical checkout at a time is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositoryFlags {
    /// No repository exists at the working directory.
    pub is_absent: bool,
    /// A definitive probe is still outstanding.
    pub is_loading: bool,
    /// The repository is available for operations.
    pub is_present: bool,
    /// A merge is in progress in the working tree.
    pub is_merging: bool,
    /// A rebase is in progress in the working tree.
    pub is_rebasing: bool,
    /// The caller already has a checkout running.
    pub checkout_in_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers() {
        assert!(CheckoutStatus::Enabled.is_enabled());
        assert!(!CheckoutStatus::Enabled.is_current());
        assert!(CheckoutStatus::Current.is_current());
        assert!(!CheckoutStatus::Busy.is_enabled());
    }

    #[test]
    fn reason_only_on_disabled() {
        assert_eq!(
            CheckoutStatus::disabled("Loading").reason(),
            Some("Loading")
        );
        assert_eq!(CheckoutStatus::Enabled.reason(), None);
        assert_eq!(CheckoutStatus::Hidden.reason(), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", CheckoutStatus::Hidden), "hidden");
        assert_eq!(
            format!("{}", CheckoutStatus::disabled("Merge in progress")),
            "disabled: Merge in progress"
        );
        assert_eq!(format!("{}", CheckoutStatus::Busy), "busy");
        assert_eq!(format!("{}", CheckoutStatus::Current), "current");
        assert_eq!(format!("{}", CheckoutStatus::Enabled), "enabled");
    }

    #[test]
    fn flags_default_to_all_clear() {
        let flags = RepositoryFlags::default();
        assert!(!flags.is_absent);
        assert!(!flags.is_loading);
        assert!(!flags.is_present);
        assert!(!flags.is_merging);
        assert!(!flags.is_rebasing);
        assert!(!flags.checkout_in_progress);
    }
}
