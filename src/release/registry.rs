use crate::error::CliError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("releasy/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An immutable, tag-named release record on the remote hosting service.
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    pub tag_name: String,
    pub target_commitish: String,
    pub title: String,
    pub notes: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Remote release registry, keyed by tag.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseRegistry {
    /// All published releases, most recent first. Drafts are not releases.
    async fn list_releases(&self) -> Result<Vec<Release>, CliError>;

    /// The release record for a tag, if one exists.
    async fn release_for_tag(&self, tag: &str) -> Result<Option<Release>, CliError>;

    /// Create the release record for an already-pushed tag.
    async fn create_release(
        &self,
        tag: &str,
        commit: &str,
        title: &str,
        notes: &str,
    ) -> Result<Release, CliError>;
}

/// `owner/repo` pair, parsed from the `origin` remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

static SSH_REMOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^git@[^:]+:([^/]+)/(.+?)(?:\.git)?/?$").unwrap());
static HTTPS_REMOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:https?|ssh)://(?:[^@/]+@)?[^/]+/([^/]+)/(.+?)(?:\.git)?/?$").unwrap());

impl RepoSlug {
    pub fn from_remote_url(url: &str) -> Result<Self, CliError> {
        SSH_REMOTE_RE
            .captures(url)
            .or_else(|| HTTPS_REMOTE_RE.captures(url))
            .map(|caps| RepoSlug {
                owner: caps[1].to_string(),
                repo: caps[2].to_string(),
            })
            .ok_or_else(|| {
                CliError::RepoUnavailable(format!(
                    "cannot determine owner/repository from remote URL '{}'",
                    url
                ))
            })
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// GitHub REST implementation of the registry.
pub struct GitHubRegistry {
    client: reqwest::Client,
    base_url: String,
    slug: RepoSlug,
    token: Option<String>,
}

impl GitHubRegistry {
    pub fn new(slug: RepoSlug, token: Option<String>) -> Result<Self, CliError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError::RegistryError(e.to_string()))?;

        Ok(GitHubRegistry {
            client,
            base_url: DEFAULT_API_BASE.to_string(),
            slug,
            token,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn releases_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases{}",
            self.base_url, self.slug.owner, self.slug.repo, suffix
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[derive(Deserialize)]
struct ApiRelease {
    tag_name: String,
    target_commitish: String,
    name: Option<String>,
    body: Option<String>,
    draft: bool,
    published_at: Option<DateTime<Utc>>,
}

impl From<ApiRelease> for Release {
    fn from(api: ApiRelease) -> Self {
        Release {
            title: api.name.unwrap_or_else(|| api.tag_name.clone()),
            tag_name: api.tag_name,
            target_commitish: api.target_commitish,
            notes: api.body.unwrap_or_default(),
            published_at: api.published_at,
        }
    }
}

fn registry_error(context: &str, status: StatusCode, body: &str) -> CliError {
    // GitHub error bodies carry a human-readable "message" field
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CliError::RegistryError(format!(
            "{}: authentication failed ({}); check GITHUB_TOKEN",
            context, status
        )),
        _ => CliError::RegistryError(format!("{}: status {} - {}", context, status, detail)),
    }
}

#[async_trait]
impl ReleaseRegistry for GitHubRegistry {
    async fn list_releases(&self) -> Result<Vec<Release>, CliError> {
        let url = self.releases_url("?per_page=100");
        debug!("Listing releases for {}", self.slug);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| CliError::RegistryError(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(registry_error("listing releases", status, &body));
        }

        let releases: Vec<ApiRelease> = response
            .json()
            .await
            .map_err(|e| CliError::RegistryError(format!("malformed response: {}", e)))?;

        let mut releases: Vec<Release> = releases
            .into_iter()
            .filter(|r| !r.draft)
            .map(Release::from)
            .collect();
        releases.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(releases)
    }

    async fn release_for_tag(&self, tag: &str) -> Result<Option<Release>, CliError> {
        let url = self.releases_url(&format!("/tags/{}", tag));
        debug!("Querying release record for tag {}", tag);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| CliError::RegistryError(format!("network error: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(registry_error("querying release", status, &body));
        }

        let release: ApiRelease = response
            .json()
            .await
            .map_err(|e| CliError::RegistryError(format!("malformed response: {}", e)))?;
        Ok(Some(release.into()))
    }

    async fn create_release(
        &self,
        tag: &str,
        commit: &str,
        title: &str,
        notes: &str,
    ) -> Result<Release, CliError> {
        #[derive(Serialize)]
        struct RequestBody<'a> {
            tag_name: &'a str,
            target_commitish: &'a str,
            name: &'a str,
            body: &'a str,
            draft: bool,
            prerelease: bool,
        }

        let url = self.releases_url("");
        debug!("Creating release {} targeting {}", tag, commit);

        let body = RequestBody {
            tag_name: tag,
            target_commitish: commit,
            name: title,
            body: notes,
            draft: false,
            prerelease: false,
        };

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| CliError::RegistryError(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(registry_error("creating release", status, &body));
        }

        let release: ApiRelease = response
            .json()
            .await
            .map_err(|e| CliError::RegistryError(format!("malformed response: {}", e)))?;
        Ok(release.into())
    }
}
