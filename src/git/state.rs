use crate::error::CliError;
use std::collections::BTreeSet;
use std::fmt;

/// Position of the local branch relative to its remote tracking ref.
///
/// Anything but `Synced` blocks a release: a release must point at a commit
/// that is exactly what is published on the remote branch, so ahead and
/// diverged are just as disqualifying as behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    Ahead(usize),
    Behind(usize),
    Diverged { ahead: usize, behind: usize },
}

impl SyncStatus {
    pub fn from_counts(ahead: usize, behind: usize) -> Self {
        match (ahead, behind) {
            (0, 0) => SyncStatus::Synced,
            (a, 0) => SyncStatus::Ahead(a),
            (0, b) => SyncStatus::Behind(b),
            (a, b) => SyncStatus::Diverged { ahead: a, behind: b },
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Synced => write!(f, "up to date with the remote"),
            SyncStatus::Ahead(n) => write!(f, "ahead of the remote by {} commit(s)", n),
            SyncStatus::Behind(n) => write!(f, "behind the remote by {} commit(s)", n),
            SyncStatus::Diverged { ahead, behind } => write!(
                f,
                "diverged from the remote ({} ahead, {} behind)",
                ahead, behind
            ),
        }
    }
}

/// Snapshot of local and remote repository state.
///
/// Read fresh at every gate that precedes a side effect; never reused across
/// steps, since the remote can change between reads.
#[derive(Debug, Clone)]
pub struct RepoState {
    pub current_branch: String,
    pub head_commit: String,
    pub sync: SyncStatus,
    pub tags: BTreeSet<String>,
}

impl RepoState {
    pub fn assert_on_branch(&self, expected: &str) -> Result<(), CliError> {
        if self.current_branch != expected {
            return Err(CliError::WrongBranch {
                expected: expected.to_string(),
                actual: self.current_branch.clone(),
            });
        }
        Ok(())
    }

    pub fn assert_synced(&self) -> Result<(), CliError> {
        if !self.sync.is_synced() {
            return Err(CliError::OutOfSync {
                branch: self.current_branch.clone(),
                status: self.sync,
            });
        }
        Ok(())
    }

    pub fn short_head(&self) -> &str {
        &self.head_commit[..self.head_commit.len().min(7)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(sync: SyncStatus) -> RepoState {
        RepoState {
            current_branch: "main".to_string(),
            head_commit: "0123456789abcdef0123456789abcdef01234567".to_string(),
            sync,
            tags: BTreeSet::new(),
        }
    }

    #[test]
    fn test_sync_status_from_counts() {
        assert_eq!(SyncStatus::from_counts(0, 0), SyncStatus::Synced);
        assert_eq!(SyncStatus::from_counts(2, 0), SyncStatus::Ahead(2));
        assert_eq!(SyncStatus::from_counts(0, 3), SyncStatus::Behind(3));
        assert_eq!(
            SyncStatus::from_counts(1, 4),
            SyncStatus::Diverged { ahead: 1, behind: 4 }
        );
    }

    #[test]
    fn test_assert_on_branch() {
        let state = state(SyncStatus::Synced);
        assert!(state.assert_on_branch("main").is_ok());

        let err = state.assert_on_branch("release").unwrap_err();
        match err {
            CliError::WrongBranch { expected, actual } => {
                assert_eq!(expected, "release");
                assert_eq!(actual, "main");
            }
            other => panic!("expected WrongBranch, got {:?}", other),
        }
    }

    #[test]
    fn test_assert_synced_blocks_ahead_behind_and_diverged() {
        assert!(state(SyncStatus::Synced).assert_synced().is_ok());
        for sync in [
            SyncStatus::Ahead(1),
            SyncStatus::Behind(2),
            SyncStatus::Diverged { ahead: 1, behind: 1 },
        ] {
            let err = state(sync).assert_synced().unwrap_err();
            assert!(matches!(err, CliError::OutOfSync { .. }));
        }
    }

    #[test]
    fn test_short_head() {
        assert_eq!(state(SyncStatus::Synced).short_head(), "0123456");
    }
}
