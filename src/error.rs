use crate::git::state::SyncStatus;
use structopt::clap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Git error: {0}")]
    GitError(#[from] git2::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Repository unavailable: {0}")]
    RepoUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Document build failed: {0}")]
    DocsBuildFailed(String),

    #[error("Wrong branch: expected '{expected}', currently on '{actual}'")]
    WrongBranch { expected: String, actual: String },

    #[error("Branch '{branch}' is {status}; push or pull before releasing")]
    OutOfSync { branch: String, status: SyncStatus },

    #[error("Input error: {0}")]
    InputError(String),

    #[error("Release cancelled by user")]
    Cancelled,

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Release registry error: {0}")]
    RegistryError(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error(
        "Partial publish: tag '{tag}' was pushed but the release record was not created ({cause}). \
        Create the release for the existing tag manually, or delete the remote tag and re-run"
    )]
    PartialPublish { tag: String, cause: String },

    #[error("Verification failed: {0}")]
    VerificationFailed(String),
}

impl From<clap::Error> for CliError {
    fn from(error: clap::Error) -> Self {
        CliError::InputError(error.to_string())
    }
}
