use crate::config::DEFAULT_REMOTE;
use crate::error::CliError;
use crate::git::state::{RepoState, SyncStatus};
use git2::{FetchOptions, Oid, PushOptions, RemoteCallbacks, Repository};
use log::{debug, error};
use std::env;

/// Access to local and remote git state.
///
/// `read_state` contacts the remote on every call so that each gate in the
/// release workflow acts on ground truth rather than a cached snapshot.
#[cfg_attr(test, mockall::automock)]
pub trait RepoClient {
    /// Fetch the branch and tags from the remote, then snapshot repository
    /// state relative to `branch`.
    fn read_state(&self, branch: &str) -> Result<RepoState, CliError>;

    /// Resolve a tag name to the commit id it points at, if the tag exists
    /// locally. Callers refresh tags via `read_state` first.
    fn resolve_tag(&self, tag: &str) -> Result<Option<String>, CliError>;

    /// Create an annotated tag pointing at `commit`.
    fn create_tag(&self, tag: &str, commit: &str, message: &str) -> Result<(), CliError>;

    /// Push a tag to the remote.
    fn push_tag(&self, tag: &str) -> Result<(), CliError>;
}

pub fn discover_repository() -> Result<Repository, CliError> {
    let current_dir = env::current_dir()?;
    debug!("Starting repository discovery from: {current_dir:?}");

    match Repository::discover(&current_dir) {
        Ok(repo) => {
            let repo_path = repo
                .path()
                .parent()
                .and_then(|p| p.canonicalize().ok())
                .ok_or_else(|| {
                    CliError::RepoUnavailable(
                        "could not determine repository root directory".to_string(),
                    )
                })?;

            Repository::open(&repo_path).map_err(|e| {
                error!("Failed to open repository at {repo_path:?}: {e}");
                CliError::GitError(e)
            })
        }
        Err(e) => {
            error!("Failed to discover repository from {current_dir:?}: {e}");
            Err(CliError::RepoUnavailable(
                "could not find a git repository in the current directory or any parent"
                    .to_string(),
            ))
        }
    }
}

pub struct GitRepoClient {
    repo: Repository,
    remote_name: String,
}

impl GitRepoClient {
    pub fn discover() -> Result<Self, CliError> {
        Ok(GitRepoClient {
            repo: discover_repository()?,
            remote_name: DEFAULT_REMOTE.to_string(),
        })
    }

    pub fn open(path: &std::path::Path) -> Result<Self, CliError> {
        Ok(GitRepoClient {
            repo: Repository::open(path)?,
            remote_name: DEFAULT_REMOTE.to_string(),
        })
    }

    pub fn remote_url(&self) -> Result<String, CliError> {
        let remote = self.repo.find_remote(&self.remote_name).map_err(|_| {
            CliError::RepoUnavailable(format!("no '{}' remote configured", self.remote_name))
        })?;
        remote
            .url()
            .map(String::from)
            .ok_or_else(|| CliError::RepoUnavailable("remote URL is not valid UTF-8".to_string()))
    }

    fn fetch_from_remote(&self) -> Result<(), CliError> {
        let mut remote = self.repo.find_remote(&self.remote_name).map_err(|_| {
            CliError::RepoUnavailable(format!("no '{}' remote configured", self.remote_name))
        })?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        let refspecs = [
            format!("+refs/heads/*:refs/remotes/{}/*", self.remote_name),
            "+refs/tags/*:refs/tags/*".to_string(),
        ];

        remote
            .fetch(&refspecs, Some(&mut fetch_options), None)
            .map_err(|e| {
                error!("Failed to fetch from remote: {}", e);
                if e.code() == git2::ErrorCode::Auth {
                    error!("Authentication error. Ensure your SSH key is added to the ssh-agent or located at ~/.ssh/id_rsa");
                }
                CliError::RepoUnavailable(format!("cannot fetch from remote: {}", e))
            })
    }

    fn head_commit(&self) -> Result<Oid, CliError> {
        self.repo
            .head()?
            .peel_to_commit()
            .map(|commit| commit.id())
            .map_err(CliError::from)
    }

    fn current_branch(&self) -> Result<String, CliError> {
        if self.repo.head_detached().unwrap_or(false) {
            return Err(CliError::RepoUnavailable(
                "HEAD is detached; check out a branch before releasing".to_string(),
            ));
        }
        self.repo
            .head()?
            .shorthand()
            .map(String::from)
            .ok_or_else(|| CliError::RepoUnavailable("failed to read current branch".to_string()))
    }

    fn sync_status(&self, branch: &str) -> Result<SyncStatus, CliError> {
        let local = self.head_commit()?;
        let tracking_ref = format!("refs/remotes/{}/{}", self.remote_name, branch);
        let remote_tip = self.repo.refname_to_id(&tracking_ref).map_err(|_| {
            CliError::RepoUnavailable(format!(
                "no remote tracking ref for '{}' (was the branch ever pushed?)",
                branch
            ))
        })?;

        let (ahead, behind) = self.repo.graph_ahead_behind(local, remote_tip)?;
        Ok(SyncStatus::from_counts(ahead, behind))
    }
}

impl RepoClient for GitRepoClient {
    fn read_state(&self, branch: &str) -> Result<RepoState, CliError> {
        debug!("Reading repository state for branch '{}'", branch);
        self.fetch_from_remote()?;

        let current_branch = self.current_branch()?;
        let head_commit = self.head_commit()?.to_string();
        let sync = self.sync_status(branch)?;

        let tags = self
            .repo
            .tag_names(None)?
            .iter()
            .filter_map(|t| t.map(String::from))
            .collect();

        Ok(RepoState {
            current_branch,
            head_commit,
            sync,
            tags,
        })
    }

    fn resolve_tag(&self, tag: &str) -> Result<Option<String>, CliError> {
        Ok(self
            .repo
            .revparse_single(&format!("refs/tags/{}", tag))
            .ok()
            .and_then(|obj| obj.peel_to_commit().ok())
            .map(|commit| commit.id().to_string()))
    }

    fn create_tag(&self, tag: &str, commit: &str, message: &str) -> Result<(), CliError> {
        debug!("Creating annotated tag {} at {}", tag, commit);
        let oid = Oid::from_str(commit)?;
        let target = self.repo.find_object(oid, None)?;
        let signature = self.repo.signature()?;

        self.repo.tag(tag, &target, &signature, message, false)?;
        Ok(())
    }

    fn push_tag(&self, tag: &str) -> Result<(), CliError> {
        debug!("Pushing tag {} to remote", tag);
        let mut remote = self.repo.find_remote(&self.remote_name).map_err(|_| {
            CliError::RepoUnavailable(format!("no '{}' remote configured", self.remote_name))
        })?;

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        let refspec = format!("refs/tags/{}", tag);
        remote.push(&[&refspec], Some(&mut push_options)).map_err(|e| {
            error!("Failed to push tag {} to remote: {}", tag, e);
            if e.code() == git2::ErrorCode::Auth {
                error!("Authentication error. Ensure your SSH key is set up correctly, or use HTTPS with a personal access token.");
            }
            CliError::GitError(e)
        })
    }
}

fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, _allowed_types| {
        git2::Cred::ssh_key(
            username_from_url.unwrap_or("git"),
            None,
            std::path::Path::new(&format!(
                "{}/.ssh/id_rsa",
                env::var("HOME").unwrap_or_default()
            )),
            None,
        )
    });
    callbacks
}
