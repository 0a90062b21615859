use crate::config::Config;
use crate::docs::{BuildReport, DocsBuilder};
use crate::error::CliError;
use crate::git::RepoClient;
use crate::input::PromptSource;
use crate::release::registry::{Release, ReleaseRegistry};
use crate::release::validator::ValidationOutcome;
use crate::release::verifier::VerificationOutcome;
use crate::release::{guard, validator, verifier};
use crate::logger;
use log::{debug, info, warn};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    Published { release: Release },
    NothingToDo,
}

/// Per-invocation knobs, from CLI flags.
#[derive(Debug, Default, Clone)]
pub struct ReleaseOptions {
    pub tag: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub skip_docs: bool,
    pub non_interactive: bool,
}

/// End-to-end release workflow.
///
/// Strictly sequential: document build, preconditions, duplicate guard,
/// operator input, validation, publish, postconditions. Every gate that
/// precedes a side effect re-reads ground truth instead of reusing an earlier
/// snapshot, because another actor may push or tag between our steps. The
/// only mutating step is publish; everything before it is safe to interrupt.
pub struct ReleaseWorkflow<'a> {
    config: &'a Config,
    repo: &'a dyn RepoClient,
    registry: &'a dyn ReleaseRegistry,
    prompter: &'a dyn PromptSource,
    docs: &'a dyn DocsBuilder,
}

impl<'a> ReleaseWorkflow<'a> {
    pub fn new(
        config: &'a Config,
        repo: &'a dyn RepoClient,
        registry: &'a dyn ReleaseRegistry,
        prompter: &'a dyn PromptSource,
        docs: &'a dyn DocsBuilder,
    ) -> Self {
        ReleaseWorkflow {
            config,
            repo,
            registry,
            prompter,
            docs,
        }
    }

    pub async fn run(&self, opts: &ReleaseOptions) -> Result<ReleaseOutcome, CliError> {
        info!(
            "🚀 Starting release for branch '{}'",
            self.config.main_branch
        );

        if opts.skip_docs {
            warn!("⏭️ Skipping document build (--skip-docs)");
        } else {
            let report = self.docs.build()?;
            if !report.success {
                return Err(docs_failure(&report));
            }
            info!("✅ Document build succeeded");
        }

        info!("🔍 Checking repository preconditions");
        let state = self.repo.read_state(&self.config.main_branch)?;
        state.assert_on_branch(&self.config.main_branch)?;
        state.assert_synced()?;
        info!(
            "✓ On '{}' at {}, {}",
            state.current_branch,
            state.short_head(),
            state.sync
        );

        let query =
            guard::head_release_status(self.repo, self.registry, &state.head_commit).await?;
        if query.found {
            if let Some(release) = &query.latest {
                info!(
                    "✓ Head commit already has a release: {}",
                    release.tag_name
                );
            }
            info!("Nothing to do");
            return Ok(ReleaseOutcome::NothingToDo);
        }

        match &query.latest {
            Some(previous) => {
                info!("📋 Last release: {}", previous.tag_name);
                if previous.title != previous.tag_name {
                    info!("  Title: {}", previous.title);
                }
                if !previous.notes.is_empty() {
                    info!("  Notes: {}", preview(&previous.notes));
                }
            }
            None => info!("📋 No releases found (this will be the first release)"),
        }

        let (tag, title, notes) = self.collect_input(opts, query.latest.as_ref())?;

        info!("🔍 Verifying tag validity");
        let fresh = self.repo.read_state(&self.config.main_branch)?;
        match validator::validate(&tag, &fresh) {
            ValidationOutcome::Valid => {}
            outcome => return Err(CliError::InvalidTag(format!("'{}': {}", tag, outcome))),
        }

        info!(
            "🏷️ Publishing release {} targeting {}",
            tag,
            fresh.short_head()
        );
        self.repo
            .create_tag(&tag, &fresh.head_commit, &title)
            .map_err(|e| CliError::PublishFailed(format!("could not create tag: {}", e)))?;
        self.repo.push_tag(&tag).map_err(|e| {
            CliError::PublishFailed(format!(
                "could not push tag ({}); delete the local tag '{}' before re-running",
                e, tag
            ))
        })?;
        let release = self
            .registry
            .create_release(&tag, &fresh.head_commit, &title, &notes)
            .await
            .map_err(|e| CliError::PartialPublish {
                tag: tag.clone(),
                cause: e.to_string(),
            })?;
        debug!("Release record created for {}", release.tag_name);

        info!("🔍 Final verification");
        let post = self.repo.read_state(&self.config.main_branch)?;
        post.assert_synced()?;
        match verifier::verify(self.repo, self.registry, &tag, &fresh.head_commit).await? {
            VerificationOutcome::Confirmed => {}
            VerificationOutcome::Mismatch { expected, actual } => {
                return Err(CliError::VerificationFailed(format!(
                    "tag '{}' points at {} on the remote but the release targeted {}",
                    tag, actual, expected
                )));
            }
            VerificationOutcome::NotFound => {
                return Err(CliError::VerificationFailed(format!(
                    "release '{}' is missing on the remote after publish",
                    tag
                )));
            }
        }

        logger::success(&format!("Release {} completed successfully!", tag));
        Ok(ReleaseOutcome::Published { release })
    }

    /// Tag, title, notes in fixed order. The tag is re-prompted until
    /// non-empty; title and notes fall back to the tag name and the empty
    /// string respectively. Those are substitutions, not failures.
    fn collect_input(
        &self,
        opts: &ReleaseOptions,
        latest: Option<&Release>,
    ) -> Result<(String, String, String), CliError> {
        let suggestion = validator::suggest_next_tag(latest.map(|r| r.tag_name.as_str()));

        let tag = match opts.tag.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => tag.to_string(),
            _ if opts.non_interactive => {
                return Err(CliError::InputError(
                    "a tag name is required in non-interactive mode (use --tag)".to_string(),
                ));
            }
            _ => loop {
                let entered = self.prompter.input_tag(suggestion.as_deref())?;
                let entered = entered.trim();
                if !entered.is_empty() {
                    break entered.to_string();
                }
                logger::warning("Tag name cannot be empty");
            },
        };

        let title = match opts.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ if opts.non_interactive => tag.clone(),
            _ => {
                let entered = self.prompter.input_title(&tag)?;
                let entered = entered.trim();
                if entered.is_empty() {
                    info!("Using default title: {}", tag);
                    tag.clone()
                } else {
                    entered.to_string()
                }
            }
        };

        let notes = match &opts.notes {
            Some(notes) => notes.clone(),
            None if opts.non_interactive => String::new(),
            None => {
                let entered = self.prompter.input_notes()?;
                if entered.is_empty() {
                    info!("No release notes provided");
                }
                entered
            }
        };

        Ok((tag, title, notes))
    }
}

fn docs_failure(report: &BuildReport) -> CliError {
    let detail = if report.stderr.trim().is_empty() {
        &report.stdout
    } else {
        &report.stderr
    };
    let lines: Vec<&str> = detail.trim().lines().collect();
    let tail = lines[lines.len().saturating_sub(10)..].join("\n");
    CliError::DocsBuildFailed(tail)
}

fn preview(notes: &str) -> String {
    let flat = notes.replace('\n', " ");
    if flat.chars().count() > 100 {
        format!("{}...", flat.chars().take(100).collect::<String>())
    } else {
        flat
    }
}
