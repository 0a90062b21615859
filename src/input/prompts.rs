use crate::error::CliError;
use inquire::{InquireError, Text};

/// Blocking operator input, behind a trait so the workflow can be driven by
/// scripted responses in tests. The three questions are asked in fixed order:
/// tag, title, notes.
#[cfg_attr(test, mockall::automock)]
pub trait PromptSource {
    fn input_tag<'a>(&self, suggestion: Option<&'a str>) -> Result<String, CliError>;
    fn input_title(&self, default: &str) -> Result<String, CliError>;
    fn input_notes(&self) -> Result<String, CliError>;
}

/// Terminal prompter backed by inquire.
pub struct TermPrompter;

impl PromptSource for TermPrompter {
    fn input_tag(&self, suggestion: Option<&str>) -> Result<String, CliError> {
        let mut prompt = Text::new("Enter new tag name:").with_help_message("e.g. v1.0.0");
        if let Some(suggestion) = suggestion {
            prompt = prompt.with_placeholder(suggestion);
        }
        prompt.prompt().map_err(map_inquire_error)
    }

    fn input_title(&self, default: &str) -> Result<String, CliError> {
        Text::new("Enter release title:")
            .with_help_message(&format!("press Enter to use '{}'", default))
            .prompt()
            .map_err(map_inquire_error)
    }

    fn input_notes(&self) -> Result<String, CliError> {
        Text::new("Enter release notes:")
            .with_help_message("press Enter to skip")
            .prompt()
            .map_err(map_inquire_error)
    }
}

fn map_inquire_error(error: InquireError) -> CliError {
    match error {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            CliError::Cancelled
        }
        other => CliError::InputError(other.to_string()),
    }
}
