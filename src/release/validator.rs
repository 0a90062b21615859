use crate::git::RepoState;
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use std::fmt;

/// Outcome of checking a proposed tag name against repository state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    AlreadyExists,
    NotOnBranchTip,
    MalformedName,
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationOutcome::Valid => write!(f, "tag name is valid"),
            ValidationOutcome::AlreadyExists => {
                write!(f, "a tag with this name already exists")
            }
            ValidationOutcome::NotOnBranchTip => write!(
                f,
                "the local checkout no longer matches the remote branch tip"
            ),
            ValidationOutcome::MalformedName => {
                write!(f, "the tag name is empty or contains forbidden characters")
            }
        }
    }
}

static TAG_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._/-]+$").unwrap());

/// Validate a proposed tag name, checked in order: malformed name, duplicate
/// tag, stale checkout. Pure check; creating the tag happens later, so a
/// failed validation never leaves partial state.
pub fn validate(tag: &str, state: &RepoState) -> ValidationOutcome {
    if is_malformed(tag) {
        return ValidationOutcome::MalformedName;
    }
    if state.tags.contains(tag) {
        return ValidationOutcome::AlreadyExists;
    }
    if !state.sync.is_synced() {
        return ValidationOutcome::NotOnBranchTip;
    }
    ValidationOutcome::Valid
}

/// Conservative subset of git's check-ref-format rules.
fn is_malformed(tag: &str) -> bool {
    tag.is_empty()
        || !TAG_NAME_RE.is_match(tag)
        || tag.starts_with('-')
        || tag.starts_with('.')
        || tag.starts_with('/')
        || tag.ends_with('/')
        || tag.ends_with('.')
        || tag.ends_with(".lock")
        || tag.contains("..")
        || tag.contains("//")
}

/// Suggest the next tag as a patch bump of the latest release tag, keeping
/// the `v` prefix if the latest tag had one.
pub fn suggest_next_tag(latest: Option<&str>) -> Option<String> {
    let latest = latest?;
    let bare = latest.trim_start_matches('v');
    let mut version = Version::parse(bare).ok()?;

    version.patch += 1;
    version.pre = semver::Prerelease::EMPTY;
    version.build = semver::BuildMetadata::EMPTY;

    Some(if latest.starts_with('v') {
        format!("v{}", version)
    } else {
        version.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::SyncStatus;
    use std::collections::BTreeSet;

    fn state(sync: SyncStatus, tags: &[&str]) -> RepoState {
        RepoState {
            current_branch: "main".to_string(),
            head_commit: "0123456789abcdef0123456789abcdef01234567".to_string(),
            sync,
            tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_valid_tag() {
        let state = state(SyncStatus::Synced, &["v1.0.0"]);
        assert_eq!(validate("v1.1.0", &state), ValidationOutcome::Valid);
        assert_eq!(validate("release/2024.1", &state), ValidationOutcome::Valid);
    }

    #[test]
    fn test_malformed_names() {
        let state = state(SyncStatus::Synced, &[]);
        for tag in [
            "", " ", "v 1.0", "v1..0", "-v1", ".hidden", "v1.0.0.lock", "v1.0.0.",
            "a//b", "/v1", "v1/", "tag~1", "tag^2", "tag:name", "tag?",
        ] {
            assert_eq!(
                validate(tag, &state),
                ValidationOutcome::MalformedName,
                "expected '{}' to be malformed",
                tag
            );
        }
    }

    #[test]
    fn test_duplicate_tag() {
        let state = state(SyncStatus::Synced, &["v1.0.0"]);
        assert_eq!(validate("v1.0.0", &state), ValidationOutcome::AlreadyExists);
    }

    #[test]
    fn test_stale_checkout() {
        let state = state(SyncStatus::Behind(1), &[]);
        assert_eq!(validate("v1.1.0", &state), ValidationOutcome::NotOnBranchTip);
    }

    #[test]
    fn test_order_malformed_beats_duplicate_beats_stale() {
        // "v1..0" is both malformed and present in the tag set
        let state = state(SyncStatus::Behind(1), &["v1..0", "v1.0.0"]);
        assert_eq!(validate("v1..0", &state), ValidationOutcome::MalformedName);
        // "v1.0.0" is both a duplicate and on a stale checkout
        assert_eq!(validate("v1.0.0", &state), ValidationOutcome::AlreadyExists);
    }

    #[test]
    fn test_suggest_next_tag() {
        assert_eq!(suggest_next_tag(Some("v1.2.3")).unwrap(), "v1.2.4");
        assert_eq!(suggest_next_tag(Some("0.9.0")).unwrap(), "0.9.1");
        assert_eq!(suggest_next_tag(Some("v2.0.0-rc.1")).unwrap(), "v2.0.1");
        assert!(suggest_next_tag(Some("nightly")).is_none());
        assert!(suggest_next_tag(None).is_none());
    }
}
