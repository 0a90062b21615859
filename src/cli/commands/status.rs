use crate::cli::Command;
use crate::config::Config;
use crate::error::CliError;
use crate::git::{GitRepoClient, RepoClient};
use crate::release::{guard, GitHubRegistry, RepoSlug};
use async_trait::async_trait;
use log::info;
use structopt::StructOpt;

/// Read-only report: where the branch stands and what the latest release is.
#[derive(Debug, Default, StructOpt)]
pub struct StatusCommand {}

#[async_trait(?Send)]
impl Command for StatusCommand {
    async fn execute(&self, _non_interactive: bool) -> Result<(), CliError> {
        let config = Config::load()?;
        let repo = GitRepoClient::discover()?;
        let slug = RepoSlug::from_remote_url(&repo.remote_url()?)?;
        let registry = GitHubRegistry::new(slug.clone(), config.github_token.clone())?;

        info!("📊 Repository: {}", slug);
        let state = repo.read_state(&config.main_branch)?;
        info!(
            "📊 Branch: {} at {} ({})",
            state.current_branch,
            state.short_head(),
            state.sync
        );

        let query = guard::head_release_status(&repo, &registry, &state.head_commit).await?;
        match &query.latest {
            Some(release) if query.found => {
                info!("✓ Head commit is released as {}", release.tag_name);
            }
            Some(release) => {
                info!("📋 Last release: {} (head is unreleased)", release.tag_name);
            }
            None => info!("📋 No releases yet"),
        }

        Ok(())
    }
}
