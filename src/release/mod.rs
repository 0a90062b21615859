pub mod guard;
pub mod registry;
pub mod validator;
pub mod verifier;
pub mod workflow;

pub use guard::ReleaseQueryResult;
pub use registry::{GitHubRegistry, Release, ReleaseRegistry, RepoSlug};
pub use validator::ValidationOutcome;
pub use verifier::VerificationOutcome;
pub use workflow::{ReleaseOptions, ReleaseOutcome, ReleaseWorkflow};
