pub mod repository;
pub mod state;

pub use repository::{GitRepoClient, RepoClient};
pub use state::{RepoState, SyncStatus};
