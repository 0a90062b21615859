pub mod commands;

use self::commands::{release, status};
use crate::error::CliError;
use async_trait::async_trait;
use structopt::StructOpt;

#[async_trait(?Send)]
pub trait Command {
    async fn execute(&self, non_interactive: bool) -> Result<(), CliError>;
}

#[derive(StructOpt)]
pub enum CliCommand {
    #[structopt(about = "Publish a new release (default)")]
    Release(release::ReleaseCommand),
    #[structopt(about = "Show repository and release status")]
    Status(status::StatusCommand),
}

impl CliCommand {
    pub async fn execute(&self, non_interactive: bool) -> Result<(), CliError> {
        match self {
            CliCommand::Release(cmd) => cmd.execute(non_interactive).await,
            CliCommand::Status(cmd) => cmd.execute(non_interactive).await,
        }
    }
}
