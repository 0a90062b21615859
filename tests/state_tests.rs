use git2::{Repository, RepositoryInitOptions, Signature};
use releasy::error::CliError;
use releasy::git::{GitRepoClient, RepoClient, SyncStatus};
use std::path::Path;
use tempfile::TempDir;

fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> git2::Oid {
    let workdir = repo.workdir().unwrap();
    std::fs::write(workdir.join(name), content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let signature = Signature::now("Test User", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap()
}

fn push_branch(repo: &Repository) {
    let mut remote = repo.find_remote("origin").unwrap();
    remote
        .push(&["+refs/heads/main:refs/heads/main"], None)
        .unwrap();
}

/// Local repository on branch `main` with a bare `origin`, one pushed commit.
fn setup_repo_with_remote() -> (TempDir, Repository, TempDir) {
    let remote_dir = TempDir::new().unwrap();
    Repository::init_bare(remote_dir.path()).unwrap();

    let work_dir = TempDir::new().unwrap();
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(work_dir.path(), &opts).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    repo.remote("origin", remote_dir.path().to_str().unwrap())
        .unwrap();

    commit_file(&repo, "README.md", "hello", "Initial commit");
    push_branch(&repo);

    (work_dir, repo, remote_dir)
}

#[test]
fn test_synced_branch() {
    let (work_dir, _repo, _remote_dir) = setup_repo_with_remote();
    let client = GitRepoClient::open(work_dir.path()).unwrap();

    let state = client.read_state("main").unwrap();
    assert_eq!(state.current_branch, "main");
    assert_eq!(state.sync, SyncStatus::Synced);
    assert!(state.assert_synced().is_ok());
}

#[test]
fn test_ahead_branch_blocks() {
    let (work_dir, repo, _remote_dir) = setup_repo_with_remote();
    commit_file(&repo, "extra.txt", "extra", "Unpushed commit");

    let client = GitRepoClient::open(work_dir.path()).unwrap();
    let state = client.read_state("main").unwrap();
    assert_eq!(state.sync, SyncStatus::Ahead(1));
    assert!(matches!(
        state.assert_synced(),
        Err(CliError::OutOfSync { .. })
    ));
}

#[test]
fn test_behind_branch_blocks() {
    let (work_dir, repo, _remote_dir) = setup_repo_with_remote();
    let first = repo.head().unwrap().peel_to_commit().unwrap().id();
    commit_file(&repo, "second.txt", "second", "Second commit");
    push_branch(&repo);

    let target = repo.find_object(first, None).unwrap();
    repo.reset(&target, git2::ResetType::Hard, None).unwrap();

    let client = GitRepoClient::open(work_dir.path()).unwrap();
    let state = client.read_state("main").unwrap();
    assert_eq!(state.sync, SyncStatus::Behind(1));
}

#[test]
fn test_diverged_branch_blocks() {
    let (work_dir, repo, _remote_dir) = setup_repo_with_remote();
    let first = repo.head().unwrap().peel_to_commit().unwrap().id();
    commit_file(&repo, "second.txt", "second", "Second commit");
    push_branch(&repo);

    let target = repo.find_object(first, None).unwrap();
    repo.reset(&target, git2::ResetType::Hard, None).unwrap();
    commit_file(&repo, "third.txt", "third", "Local-only commit");

    let client = GitRepoClient::open(work_dir.path()).unwrap();
    let state = client.read_state("main").unwrap();
    assert_eq!(state.sync, SyncStatus::Diverged { ahead: 1, behind: 1 });
}

#[test]
fn test_remote_tags_are_fetched_fresh() {
    let (work_dir, repo, _remote_dir) = setup_repo_with_remote();

    let head = repo.head().unwrap().peel_to_commit().unwrap().id();
    let client = GitRepoClient::open(work_dir.path()).unwrap();
    client
        .create_tag("v1.0.0", &head.to_string(), "v1.0.0")
        .unwrap();
    client.push_tag("v1.0.0").unwrap();

    // Drop the local tag; a fresh read must bring it back from the remote
    repo.tag_delete("v1.0.0").unwrap();
    let state = client.read_state("main").unwrap();
    assert!(state.tags.contains("v1.0.0"));
}

#[test]
fn test_create_and_push_tag_lands_on_remote() {
    let (work_dir, repo, remote_dir) = setup_repo_with_remote();
    let head = repo.head().unwrap().peel_to_commit().unwrap().id();

    let client = GitRepoClient::open(work_dir.path()).unwrap();
    client
        .create_tag("v1.0.0", &head.to_string(), "First release")
        .unwrap();
    client.push_tag("v1.0.0").unwrap();

    let bare = Repository::open_bare(remote_dir.path()).unwrap();
    let remote_commit = bare
        .revparse_single("refs/tags/v1.0.0")
        .unwrap()
        .peel_to_commit()
        .unwrap()
        .id();
    assert_eq!(remote_commit, head);

    assert_eq!(
        client.resolve_tag("v1.0.0").unwrap().unwrap(),
        head.to_string()
    );
    assert!(client.resolve_tag("v9.9.9").unwrap().is_none());
}

#[test]
fn test_duplicate_tag_creation_fails() {
    let (work_dir, repo, _remote_dir) = setup_repo_with_remote();
    let head = repo.head().unwrap().peel_to_commit().unwrap().id();

    let client = GitRepoClient::open(work_dir.path()).unwrap();
    client
        .create_tag("v1.0.0", &head.to_string(), "v1.0.0")
        .unwrap();
    let result = client.create_tag("v1.0.0", &head.to_string(), "v1.0.0");
    assert!(matches!(result, Err(CliError::GitError(_))));
}

#[test]
fn test_missing_remote_is_unavailable() {
    let work_dir = TempDir::new().unwrap();
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    Repository::init_opts(work_dir.path(), &opts).unwrap();

    let client = GitRepoClient::open(work_dir.path()).unwrap();
    let result = client.read_state("main");
    assert!(matches!(result, Err(CliError::RepoUnavailable(_))));
}

#[test]
fn test_detached_head_is_unavailable() {
    let (work_dir, repo, _remote_dir) = setup_repo_with_remote();
    let head = repo.head().unwrap().peel_to_commit().unwrap().id();
    repo.set_head_detached(head).unwrap();

    let client = GitRepoClient::open(work_dir.path()).unwrap();
    let result = client.read_state("main");
    assert!(matches!(result, Err(CliError::RepoUnavailable(_))));
}

#[test]
fn test_unpushed_branch_has_no_tracking_ref() {
    let (work_dir, _repo, _remote_dir) = setup_repo_with_remote();

    let client = GitRepoClient::open(work_dir.path()).unwrap();
    let result = client.read_state("release");
    assert!(matches!(result, Err(CliError::RepoUnavailable(_))));
}
