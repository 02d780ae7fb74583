//! repository::state
//!
//! The lifecycle states a local repository can occupy and the legal
//! transitions between them.
//!
//! # Design
//!
//! States are deliberately data-free. The machine answers "what is legal
//! right now"; the [`Repository`](super::Repository) facade owns the
//! collaborator and the event plumbing. The two guess states exist for
//! hosts restoring a prior session: they anticipate the outcome of the
//! first filesystem probe and answer the coarse probes the same way the
//! anticipated state would, until a definitive state arrives.
//!
//! Transition legality:
//!
//! - `Loading` resolves to `Present`, `Absent`, or `TooLarge`.
//! - `LoadingGuess` and `AbsentGuess` resolve to `Loading`, `Absent`,
//!   or `Present`.
//! - `Absent`, `Present`, and `TooLarge` are stable.
//! - Every live state can be destroyed; `Destroyed` is terminal.

use std::fmt;

/// The lifecycle state of a local repository.
///
/// # Example
///
/// ```
/// use berth::repository::RepositoryState;
///
/// assert!(RepositoryState::Loading.can_transition_to(RepositoryState::Present));
/// assert!(!RepositoryState::Absent.can_transition_to(RepositoryState::Present));
/// assert!(RepositoryState::LoadingGuess.is_loading());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryState {
    /// A definitive probe of the working directory is underway.
    Loading,
    /// Restored from a prior session that expected a repository here.
    LoadingGuess,
    /// Restored from a prior session that expected no repository here.
    AbsentGuess,
    /// The directory holds no git repository.
    Absent,
    /// The repository is available; operations are legal.
    Present,
    /// The repository exceeds the size the host is willing to load.
    TooLarge,
    /// The owning instance was torn down; nothing follows.
    Destroyed,
}

impl RepositoryState {
    /// Whether a definitive probe is still outstanding.
    pub fn is_loading(self) -> bool {
        matches!(self, RepositoryState::Loading | RepositoryState::LoadingGuess)
    }

    /// Whether there is (or is expected to be) no repository here.
    pub fn is_absent(self) -> bool {
        matches!(self, RepositoryState::Absent | RepositoryState::AbsentGuess)
    }

    pub fn is_present(self) -> bool {
        matches!(self, RepositoryState::Present)
    }

    pub fn is_too_large(self) -> bool {
        matches!(self, RepositoryState::TooLarge)
    }

    pub fn is_destroyed(self) -> bool {
        matches!(self, RepositoryState::Destroyed)
    }

    /// Whether this is a guess state awaiting a definitive probe.
    pub fn is_undetermined(self) -> bool {
        matches!(
            self,
            RepositoryState::LoadingGuess | RepositoryState::AbsentGuess
        )
    }

    /// Whether the machine may move from this state to `next`.
    pub fn can_transition_to(self, next: RepositoryState) -> bool {
        match (self, next) {
            (RepositoryState::Destroyed, _) => false,
            (_, RepositoryState::Destroyed) => true,
            (
                RepositoryState::Loading,
                RepositoryState::Present | RepositoryState::Absent | RepositoryState::TooLarge,
            ) => true,
            (
                RepositoryState::LoadingGuess | RepositoryState::AbsentGuess,
                RepositoryState::Loading | RepositoryState::Absent | RepositoryState::Present,
            ) => true,
            _ => false,
        }
    }

    /// The state name as it appears in gate errors.
    pub fn name(self) -> &'static str {
        match self {
            RepositoryState::Loading => "Loading",
            RepositoryState::LoadingGuess => "LoadingGuess",
            RepositoryState::AbsentGuess => "AbsentGuess",
            RepositoryState::Absent => "Absent",
            RepositoryState::Present => "Present",
            RepositoryState::TooLarge => "TooLarge",
            RepositoryState::Destroyed => "Destroyed",
        }
    }
}

impl fmt::Display for RepositoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RepositoryState::*;

    const ALL: [RepositoryState; 7] = [
        Loading,
        LoadingGuess,
        AbsentGuess,
        Absent,
        Present,
        TooLarge,
        Destroyed,
    ];

    fn targets(from: RepositoryState) -> Vec<RepositoryState> {
        ALL.iter()
            .copied()
            .filter(|&to| from.can_transition_to(to))
            .collect()
    }

    #[test]
    fn loading_resolves_to_definitive_states() {
        assert_eq!(targets(Loading), vec![Absent, Present, TooLarge, Destroyed]);
    }

    #[test]
    fn guesses_resolve_to_loading_or_definitive_states() {
        assert_eq!(targets(LoadingGuess), vec![Loading, Absent, Present, Destroyed]);
        assert_eq!(targets(AbsentGuess), vec![Loading, Absent, Present, Destroyed]);
    }

    #[test]
    fn definitive_states_are_stable() {
        assert_eq!(targets(Absent), vec![Destroyed]);
        assert_eq!(targets(Present), vec![Destroyed]);
        assert_eq!(targets(TooLarge), vec![Destroyed]);
    }

    #[test]
    fn destroyed_is_terminal() {
        assert!(targets(Destroyed).is_empty());
    }

    #[test]
    fn no_state_transitions_to_itself() {
        for &state in &ALL {
            assert!(!state.can_transition_to(state), "{}", state);
        }
    }

    #[test]
    fn guesses_answer_like_the_anticipated_state() {
        assert!(LoadingGuess.is_loading());
        assert!(!LoadingGuess.is_absent());
        assert!(AbsentGuess.is_absent());
        assert!(!AbsentGuess.is_loading());
        assert!(LoadingGuess.is_undetermined());
        assert!(AbsentGuess.is_undetermined());
        assert!(!Loading.is_undetermined());
    }

    #[test]
    fn only_present_is_present() {
        for &state in &ALL {
            assert_eq!(state.is_present(), state == Present, "{}", state);
        }
    }

    #[test]
    fn display_matches_name() {
        for &state in &ALL {
            assert_eq!(format!("{}", state), state.name());
        }
    }
}
