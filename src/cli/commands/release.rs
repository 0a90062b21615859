use crate::cli::Command;
use crate::config::Config;
use crate::docs::MakeDocsBuilder;
use crate::error::CliError;
use crate::git::GitRepoClient;
use crate::input::TermPrompter;
use crate::release::{GitHubRegistry, ReleaseOptions, ReleaseWorkflow, RepoSlug};
use async_trait::async_trait;
use log::info;
use structopt::StructOpt;

#[derive(Debug, Default, StructOpt)]
pub struct ReleaseCommand {
    #[structopt(short, long, help = "Tag name for the new release")]
    tag: Option<String>,

    #[structopt(long, help = "Release title (defaults to the tag name)")]
    title: Option<String>,

    #[structopt(long, help = "Release notes body (defaults to empty)")]
    notes: Option<String>,

    #[structopt(long = "skip-docs", help = "Skip the document build step")]
    skip_docs: bool,
}

#[async_trait(?Send)]
impl Command for ReleaseCommand {
    async fn execute(&self, non_interactive: bool) -> Result<(), CliError> {
        info!("⚙️ Loading configuration");
        let config = Config::load()?;
        info!("✓ Project root: {}", config.project_root.display());
        info!("✓ Main branch: {}", config.main_branch);

        let repo = GitRepoClient::discover()?;
        let slug = RepoSlug::from_remote_url(&repo.remote_url()?)?;
        let registry = GitHubRegistry::new(slug, config.github_token.clone())?;
        let prompter = TermPrompter;
        let docs = MakeDocsBuilder::new(config.docs_dir.clone());

        let options = ReleaseOptions {
            tag: self.tag.clone(),
            title: self.title.clone(),
            notes: self.notes.clone(),
            skip_docs: self.skip_docs,
            non_interactive,
        };

        let workflow = ReleaseWorkflow::new(&config, &repo, &registry, &prompter, &docs);
        workflow.run(&options).await?;
        Ok(())
    }
}
