//! Error types reported to the caller of the session engine.
//!
//! Every error here is a synchronous, local condition. Timeouts are not
//! errors (they produce a timed-out answer) and stale timers are silently
//! dropped, so neither appears below.

/// Errors from the session state machine and the player pool
#[derive(Debug)]
pub enum QuizError {
    /// Requested question count outside the allowed range
    InvalidQuestionCount { requested: usize, min: usize, max: usize },
    /// Player pool size of zero or larger than the profile catalog
    InvalidPoolSize { requested: usize, available: usize },
    /// A player profile failed validation
    InvalidProfile(String),
    /// Category has no matching questions; the quiz cannot start
    EmptyCategory(String),
    /// Operation not allowed in the current state
    InvalidTransition { operation: &'static str, state: &'static str },
    /// Answer index does not exist for the current question
    InvalidAnswerIndex { index: usize, options: usize },
    /// The current question already has an answer
    AlreadyAnswered,
    /// Chat is only open in cooperative sessions
    ChatUnavailable,
    /// Chat message was empty after sanitizing
    EmptyMessage,
    /// Content repository rejected a request
    Content(ContentError),
    /// Session configuration failed validation
    Config(ConfigError),
}

impl From<ContentError> for QuizError {
    fn from(e: ContentError) -> Self {
        QuizError::Content(e)
    }
}

impl From<ConfigError> for QuizError {
    fn from(e: ConfigError) -> Self {
        QuizError::Config(e)
    }
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::InvalidQuestionCount { requested, min, max } => {
                write!(
                    f,
                    "Invalid question count {}: must be between {} and {}",
                    requested, min, max
                )
            }
            QuizError::InvalidPoolSize { requested, available } => {
                write!(
                    f,
                    "Invalid player pool size {}: catalog has {} profiles",
                    requested, available
                )
            }
            QuizError::InvalidProfile(reason) => write!(f, "Invalid player profile: {}", reason),
            QuizError::EmptyCategory(category) => {
                write!(f, "Category '{}' has no questions", category)
            }
            QuizError::InvalidTransition { operation, state } => {
                write!(f, "Cannot {} while in state {}", operation, state)
            }
            QuizError::InvalidAnswerIndex { index, options } => {
                write!(
                    f,
                    "Answer index {} out of range ({} options)",
                    index, options
                )
            }
            QuizError::AlreadyAnswered => write!(f, "Question was already answered"),
            QuizError::ChatUnavailable => write!(f, "Chat is only available in cooperative mode"),
            QuizError::EmptyMessage => write!(f, "Chat message is empty"),
            QuizError::Content(e) => write!(f, "Content error: {}", e),
            QuizError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Content(e) => Some(e),
            QuizError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors from the content store
#[derive(Debug)]
pub enum ContentError {
    UnknownCategory(u32),
    UnknownCard(u32),
    /// A category with this name already exists
    DuplicateCategory(String),
    /// Question/card failed validation
    InvalidQuestion(String),
    /// Bundled or imported content could not be parsed
    Json(serde_json::Error),
}

impl From<serde_json::Error> for ContentError {
    fn from(e: serde_json::Error) -> Self {
        ContentError::Json(e)
    }
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentError::UnknownCategory(id) => write!(f, "Unknown category id {}", id),
            ContentError::UnknownCard(id) => write!(f, "Unknown card id {}", id),
            ContentError::DuplicateCategory(name) => {
                write!(f, "Category '{}' already exists", name)
            }
            ContentError::InvalidQuestion(reason) => write!(f, "Invalid question: {}", reason),
            ContentError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Json(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors from parsing or validating a [`crate::config::QuizConfig`]
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    /// A value outside its allowed range
    Invalid(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Invalid(reason) => write!(f, "Invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = QuizError::InvalidQuestionCount {
            requested: 25,
            min: 1,
            max: 20,
        };
        assert_eq!(
            err.to_string(),
            "Invalid question count 25: must be between 1 and 20"
        );

        let err = QuizError::EmptyCategory("Physik".into());
        assert_eq!(err.to_string(), "Category 'Physik' has no questions");
    }

    #[test]
    fn test_content_error_converts() {
        let err: QuizError = ContentError::UnknownCategory(7).into();
        assert!(matches!(err, QuizError::Content(ContentError::UnknownCategory(7))));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error_converts() {
        let err: QuizError = ConfigError::Invalid("pool_size 0".into()).into();
        assert_eq!(
            err.to_string(),
            "Config error: Invalid configuration: pool_size 0"
        );
    }
}
