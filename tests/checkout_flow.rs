//! End-to-end checkout flows through a gated repository.
//!
//! These tests drive the full stack: a `Repository` facade over a
//! `MockGit`, flags snapshotted from the live state, and a `CheckoutOp`
//! running against the facade so that state gating applies to every git
//! call the procedure makes.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use berth::checkout::{CheckoutError, CheckoutOp, CheckoutOutcome, RepositoryFlags};
use berth::core::branch::{Branch, BranchSet};
use berth::core::pull_request::{HeadRepository, PullRequest, RepositoryOwner};
use berth::core::remote::{Remote, RemoteSet};
use berth::git::mock::{GitCall, MockGit};
use berth::git::{CheckoutOptions, FetchOptions, GitError};
use berth::repository::{Repository, RepositoryState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn pull_request() -> PullRequest {
    PullRequest {
        number: 456,
        head_ref_name: "feature".to_string(),
        head_repository: Some(HeadRepository {
            owner: RepositoryOwner {
                login: "ccc".to_string(),
            },
            name: "ddd".to_string(),
            url: "https://github.com/ccc/ddd".to_string(),
            ssh_url: "git@github.com:ccc/ddd.git".to_string(),
        }),
    }
}

fn present_repository(git: MockGit) -> Repository {
    let repo = Repository::new(Arc::new(git));
    let token = repo.state_token();
    repo.transition(token, RepositoryState::Present)
        .expect("loading resolves to present");
    repo
}

#[tokio::test]
async fn checkout_creates_branch_then_reads_as_current() {
    init_tracing();

    let git = MockGit::new();
    let repo = present_repository(git.clone());
    let pr = pull_request();

    // First evaluation: nothing local refers to the pull request yet.
    let branches: BranchSet = [Branch::builder("main")
        .upstream("refs/remotes/origin/main", "origin", "refs/heads/main")
        .head(true)
        .build()]
    .into_iter()
    .collect();
    let remotes: RemoteSet = [Remote::new("origin", "https://github.com/aaa/bbb.git")]
        .into_iter()
        .collect();
    let flags = repo.snapshot_flags().await.unwrap();
    assert!(flags.is_present);

    let op = CheckoutOp::new(&pr, &branches, &remotes, flags);
    assert!(op.status().is_enabled());

    let outcome = op.run(&repo).await.unwrap();
    assert_eq!(
        outcome,
        CheckoutOutcome::Created {
            local_ref: "pr-456/ccc/feature".to_string(),
            remote_name: "ccc".to_string(),
        }
    );
    // https dominates the snapshot, so the synthesized remote uses the
    // https URL.
    assert_eq!(
        git.operations(),
        vec![
            GitCall::AddRemote {
                name: "ccc".to_string(),
                url: "https://github.com/ccc/ddd.git".to_string(),
            },
            GitCall::Fetch {
                refspec: "refs/heads/feature".to_string(),
                options: FetchOptions {
                    remote_name: "ccc".to_string(),
                },
            },
            GitCall::Checkout {
                rev: "pr-456/ccc/feature".to_string(),
                options: CheckoutOptions {
                    create_new: true,
                    track: true,
                    start_point: Some("refs/remotes/ccc/feature".to_string()),
                },
            },
        ]
    );
    assert_eq!(git.checked_out().as_deref(), Some("pr-456/ccc/feature"));

    // A refreshed snapshot reflecting the checkout reads as current and
    // does not trigger the procedure again.
    let branches: BranchSet = [Branch::builder("pr-456/ccc/feature")
        .upstream("refs/remotes/ccc/feature", "ccc", "refs/heads/feature")
        .head(true)
        .build()]
    .into_iter()
    .collect();
    let remotes: RemoteSet = [
        Remote::new("origin", "https://github.com/aaa/bbb.git"),
        Remote::new("ccc", "https://github.com/ccc/ddd.git"),
    ]
    .into_iter()
    .collect();
    let flags = repo.snapshot_flags().await.unwrap();

    let op = CheckoutOp::new(&pr, &branches, &remotes, flags);
    assert!(op.status().is_current());
    assert!(matches!(
        op.run(&repo).await,
        Err(CheckoutError::NotEnabled { .. })
    ));
}

#[tokio::test]
async fn checkout_fast_forwards_existing_branch_through_repository() {
    let git = MockGit::new();
    let repo = present_repository(git.clone());
    let pr = pull_request();

    let branches: BranchSet = [
        Branch::builder("main").head(true).build(),
        Branch::builder("local-feature")
            .upstream("refs/remotes/fork/feature", "fork", "refs/heads/feature")
            .build(),
    ]
    .into_iter()
    .collect();
    let remotes: RemoteSet = [Remote::new("fork", "git@github.com:ccc/ddd.git")]
        .into_iter()
        .collect();
    let flags = repo.snapshot_flags().await.unwrap();

    let outcome = CheckoutOp::new(&pr, &branches, &remotes, flags)
        .run(&repo)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CheckoutOutcome::FastForwarded {
            local_ref: "local-feature".to_string(),
            remote_name: "fork".to_string(),
        }
    );
    // The fast-forward path reuses the fetched state; no fetch call.
    assert!(git
        .operations()
        .iter()
        .all(|call| !matches!(call, GitCall::Fetch { .. })));
    assert_eq!(git.checked_out().as_deref(), Some("local-feature"));
}

#[tokio::test]
async fn loading_repository_disables_checkout() {
    let git = MockGit::new();
    let repo = Repository::new(Arc::new(git.clone()));
    let pr = pull_request();
    let branches = BranchSet::new();
    let remotes = RemoteSet::new();

    let flags = repo.snapshot_flags().await.unwrap();
    let op = CheckoutOp::new(&pr, &branches, &remotes, flags);

    assert_eq!(op.status().reason(), Some("Loading"));
    assert!(matches!(
        op.run(&repo).await,
        Err(CheckoutError::NotEnabled { .. })
    ));
    assert!(git.operations().is_empty());
}

#[tokio::test]
async fn state_gate_catches_flags_that_lie() {
    // Even if a caller hands the op flags claiming the repository is
    // present, the facade still rejects git operations in Loading.
    let git = MockGit::new();
    let repo = Repository::new(Arc::new(git.clone()));
    let pr = pull_request();
    let branches = BranchSet::new();
    let remotes = RemoteSet::new();
    let flags = RepositoryFlags {
        is_present: true,
        ..Default::default()
    };

    let error = CheckoutOp::new(&pr, &branches, &remotes, flags)
        .run(&repo)
        .await
        .unwrap_err();

    match error {
        CheckoutError::Git(GitError::UnsupportedOperation { operation, state }) => {
            assert_eq!(operation, "add_remote");
            assert_eq!(state, "Loading");
        }
        other => panic!("expected a gate error, got {:?}", other),
    }
    assert_eq!(git.checked_out(), None);
}

#[tokio::test]
async fn advisory_flag_serializes_checkouts() {
    let git = MockGit::new();
    let repo = present_repository(git.clone());
    let pr = pull_request();
    let branches = BranchSet::new();
    let remotes = RemoteSet::new();

    let mut flags = repo.snapshot_flags().await.unwrap();
    flags.checkout_in_progress = true;

    let op = CheckoutOp::new(&pr, &branches, &remotes, flags);
    assert_eq!(op.status().reason(), Some("Checking out..."));
    assert!(matches!(
        op.run(&repo).await,
        Err(CheckoutError::NotEnabled { .. })
    ));
    assert!(git.operations().is_empty());
}

#[tokio::test]
async fn destroyed_repository_blocks_checkout() {
    let git = MockGit::new();
    let repo = present_repository(git.clone());
    repo.destroy();

    let pr = pull_request();
    let branches = BranchSet::new();
    let remotes = RemoteSet::new();
    let flags = RepositoryFlags {
        is_present: true,
        ..Default::default()
    };

    let error = CheckoutOp::new(&pr, &branches, &remotes, flags)
        .run(&repo)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        CheckoutError::Git(GitError::UnsupportedOperation { .. })
    ));
}
