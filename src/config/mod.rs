pub mod generation;
pub mod prompt;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use self::prompt::PromptError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown attempt profile: '{0}' (expected 'full' or 'simple')")]
    UnknownProfile(String),
    #[error("At least one attempt profile is required")]
    NoProfiles,
    #[error("Unknown error policy: '{0}' (expected 'graceful' or 'strict')")]
    UnknownErrorPolicy(String),
    #[error("DATASTORE_ID '{0}' is a bare id, GOOGLE_CLOUD_PROJECT is required to expand it")]
    DatastoreWithoutProject(String),
    #[error("Invalid CORS origin: '{0}'")]
    InvalidOrigin(String),
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// How the chat endpoint reports a generation that could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Reply with the configured apology text and HTTP 200.
    #[default]
    Graceful,
    /// Reply with HTTP 500 and the error detail.
    Strict,
}

impl FromStr for ErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "graceful" => Ok(ErrorPolicy::Graceful),
            "strict" => Ok(ErrorPolicy::Strict),
            _ => Err(ConfigError::UnknownErrorPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Graceful => write!(f, "graceful"),
            ErrorPolicy::Strict => write!(f, "strict"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_policy_parses_case_insensitively() {
        assert_eq!("graceful".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Graceful);
        assert_eq!(" STRICT ".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Strict);
        assert!(matches!(
            "loud".parse::<ErrorPolicy>(),
            Err(ConfigError::UnknownErrorPolicy(p)) if p == "loud"
        ));
    }
}
