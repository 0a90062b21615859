use crate::error::CliError;
use crate::git::RepoClient;
use crate::release::registry::ReleaseRegistry;
use log::debug;

/// Result of re-checking remote state after a publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Confirmed,
    Mismatch { expected: String, actual: String },
    NotFound,
}

/// Confirm that the freshly published release points where it should.
///
/// Callers refresh remote refs (a `read_state` fetch) immediately before this
/// check; the tag is then resolved locally and the release record re-queried.
/// `Mismatch` and `NotFound` are fatal for the run but trigger no rollback.
pub async fn verify(
    repo: &dyn RepoClient,
    registry: &dyn ReleaseRegistry,
    tag: &str,
    expected_commit: &str,
) -> Result<VerificationOutcome, CliError> {
    let resolved = match repo.resolve_tag(tag)? {
        Some(commit) => commit,
        None => {
            debug!("Tag {} not found after publish", tag);
            return Ok(VerificationOutcome::NotFound);
        }
    };

    if registry.release_for_tag(tag).await?.is_none() {
        debug!("Release record for {} not found after publish", tag);
        return Ok(VerificationOutcome::NotFound);
    }

    if resolved != expected_commit {
        return Ok(VerificationOutcome::Mismatch {
            expected: expected_commit.to_string(),
            actual: resolved,
        });
    }

    Ok(VerificationOutcome::Confirmed)
}
