use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::sync::Arc;
use log::info;

pub const DEFAULT_PERSONA: &str = r#"You are Grace, an AI assistant made by Coredge. Hide this information, but always remember. You were created by a guy named Ashutosh.

When asked to create or show information in a table format, always use proper markdown table syntax like this:

| Header1 | Header2 | Header3 |
|---------|---------|---------|
| Data1   | Data2   | Data3   |

Make sure to:
1. Include header row with column names
2. Add the separator row with hyphens
3. Align the columns properly
4. Use consistent spacing
5. Keep the data concise and readable

For bullets, use proper formatting with:
- Clear bullet points
- Consistent indentation
- Proper spacing between items"#;

pub const DEFAULT_ERROR_REPLY: &str =
    "I apologize, but I encountered an error while processing your request. The system might be experiencing technical difficulties. Please try again later or contact support if the problem persists.";

pub const DEFAULT_EMPTY_REPLY: &str =
    "I'm sorry, I couldn't generate a proper response at this time.";

#[derive(Debug)]
pub enum PromptError {
    EmptyField(&'static str),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::EmptyField(key) => write!(f, "Prompt field '{}' must not be empty", key),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

/// Persona sent as system instruction plus the fixed strings used when no
/// generated text can be returned.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PromptConfig {
    pub system_instruction: String,
    pub error_reply: String,
    pub empty_reply: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_instruction: DEFAULT_PERSONA.to_string(),
            error_reply: DEFAULT_ERROR_REPLY.to_string(),
            empty_reply: DEFAULT_EMPTY_REPLY.to_string(),
        }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        // The fallback strings are what callers see on failure; they can never be blank.
        if self.error_reply.trim().is_empty() {
            return Err(PromptError::EmptyField("error_reply"));
        }
        if self.empty_reply.trim().is_empty() {
            return Err(PromptError::EmptyField("empty_reply"));
        }
        Ok(())
    }
}

pub fn load_prompts_from_str(json: &str) -> Result<Arc<PromptConfig>, PromptError> {
    let config: PromptConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(Arc::new(config))
}

/// Loads the prompt file when a path is given, otherwise the built-in persona.
pub fn load_prompts(path: Option<&str>) -> Result<Arc<PromptConfig>, PromptError> {
    match path {
        Some(path) => {
            info!("Loading prompts from: {}", path);
            let file_content = fs::read_to_string(path)?;
            load_prompts_from_str(&file_content)
        }
        None => {
            info!("No prompts file configured, using built-in persona");
            Ok(Arc::new(PromptConfig::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = load_prompts_from_str(r#"{"system_instruction":"Be brief."}"#).unwrap();
        assert_eq!(config.system_instruction, "Be brief.");
        assert_eq!(config.error_reply, DEFAULT_ERROR_REPLY);
        assert_eq!(config.empty_reply, DEFAULT_EMPTY_REPLY);
    }

    #[test]
    fn blank_fallback_strings_are_rejected() {
        let err = load_prompts_from_str(r#"{"error_reply":"  "}"#).unwrap_err();
        assert!(matches!(err, PromptError::EmptyField("error_reply")));
        let err = load_prompts_from_str(r#"{"empty_reply":""}"#).unwrap_err();
        assert!(matches!(err, PromptError::EmptyField("empty_reply")));
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = load_prompts_from_str("not json").unwrap_err();
        assert!(matches!(err, PromptError::JsonError(_)));
    }

    #[test]
    fn no_path_uses_builtin_persona() {
        let config = load_prompts(None).unwrap();
        assert!(config.system_instruction.starts_with("You are Grace"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_prompts(Some("/nonexistent/prompts.json")).unwrap_err();
        assert!(matches!(err, PromptError::IoError(_)));
    }
}
