use crate::error::CliError;
use crate::git::RepoClient;
use crate::release::registry::{Release, ReleaseRegistry};
use log::debug;

/// Result of asking whether the head commit already carries a release.
///
/// `latest` carries the most recent release either way, so the caller can
/// show prior-release context before prompting for a new one.
#[derive(Debug, Clone)]
pub struct ReleaseQueryResult {
    pub found: bool,
    pub latest: Option<Release>,
}

/// Idempotency check: does `head` itself already have a release?
///
/// The match is exact-commit. A release on an ancestor commit does not count;
/// each release tag is resolved locally (tags freshly fetched by the caller's
/// `read_state`) and compared against `head`.
pub async fn head_release_status(
    repo: &dyn RepoClient,
    registry: &dyn ReleaseRegistry,
    head: &str,
) -> Result<ReleaseQueryResult, CliError> {
    let releases = registry.list_releases().await?;
    debug!("Registry reports {} release(s)", releases.len());

    for release in &releases {
        match repo.resolve_tag(&release.tag_name)? {
            Some(commit) if commit == head => {
                debug!("Release {} targets head {}", release.tag_name, head);
                return Ok(ReleaseQueryResult {
                    found: true,
                    latest: Some(release.clone()),
                });
            }
            Some(_) => {}
            None => debug!("Tag {} not resolvable locally", release.tag_name),
        }
    }

    Ok(ReleaseQueryResult {
        found: false,
        latest: releases.into_iter().next(),
    })
}
