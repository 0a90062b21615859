use crate::error::CliError;
use git2::Repository;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAIN_BRANCH: &str = "main";
pub const DEFAULT_REMOTE: &str = "origin";

const ENV_FILE: &str = ".env";

/// Runtime configuration, loaded once at startup and passed into each
/// collaborator. Loading fails before any other step runs when the `.env`
/// file or the docs directory is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_root: PathBuf,
    pub main_branch: String,
    pub docs_dir: PathBuf,
    pub github_token: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, CliError> {
        let current_dir = env::current_dir()?;
        Self::load_from(&current_dir)
    }

    pub fn load_from(start: &Path) -> Result<Self, CliError> {
        let project_root = find_project_root(start)?;
        let env_vars = read_env_file(&project_root)?;

        let main_branch = env_vars
            .get("MAIN_BRANCH")
            .cloned()
            .unwrap_or_else(|| DEFAULT_MAIN_BRANCH.to_string());

        let docs_dir = project_root.join(env_vars.get("DOCS_DIR").map(String::as_str).unwrap_or(""));
        if !docs_dir.is_dir() {
            return Err(CliError::ConfigError(format!(
                "docs directory not found: {} (check DOCS_DIR in {})",
                docs_dir.display(),
                ENV_FILE
            )));
        }

        let github_token = env_vars
            .get("GITHUB_TOKEN")
            .cloned()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .filter(|t| !t.is_empty());

        Ok(Config {
            project_root,
            main_branch,
            docs_dir,
            github_token,
        })
    }
}

fn find_project_root(start: &Path) -> Result<PathBuf, CliError> {
    let repo = Repository::discover(start).map_err(|_| {
        CliError::ConfigError(
            "cannot find project root (no git repository in current directory or any parent)"
                .to_string(),
        )
    })?;

    repo.workdir()
        .and_then(|p| p.canonicalize().ok())
        .ok_or_else(|| {
            CliError::ConfigError("repository has no working directory".to_string())
        })
}

/// Parse the project-local `.env` file. Blank lines and `#` comments are
/// ignored; values may be wrapped in single or double quotes.
fn read_env_file(project_root: &Path) -> Result<HashMap<String, String>, CliError> {
    let env_file = project_root.join(ENV_FILE);

    if !env_file.exists() {
        return Err(CliError::ConfigError(format!(
            "{} not found at {} (create one from .env.example)",
            ENV_FILE,
            env_file.display()
        )));
    }

    let mut vars = HashMap::new();
    for line in fs::read_to_string(&env_file)?.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            vars.insert(key.trim().to_string(), value.to_string());
        }
    }

    Ok(vars)
}
