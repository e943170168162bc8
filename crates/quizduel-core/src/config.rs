//! Session configuration - timing constants and probabilities
//!
//! Every field has a default, so a partial JSON document only needs to list
//! the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generation::list_profiles;

/// Bounds every configured question range must stay within
pub const MIN_QUESTION_COUNT: usize = 1;
pub const MAX_QUESTION_COUNT: usize = 20;

/// Tunable constants for a quiz session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Smallest selectable question count
    pub min_questions: usize,
    /// Largest selectable question count
    pub max_questions: usize,
    /// Simulated opponents per multiplayer session
    pub pool_size: usize,
    /// Competitive countdown per question (seconds)
    pub countdown_secs: f64,
    /// Pause on the answer reveal before the next question (seconds)
    pub advance_delay_secs: f64,
    /// Gap between staggered cooperative greetings (seconds)
    pub greeting_interval_secs: f64,
    /// Chance a cooperative player posts a hint after a round
    pub hint_probability: f64,
    /// Chance a simulated player replies to a human chat message
    pub reply_probability: f64,
    /// Bounds of the random reply delay (seconds)
    pub reply_delay_min_secs: f64,
    pub reply_delay_max_secs: f64,
    /// Longest accepted chat message, in characters
    pub max_chat_length: usize,
    /// Name shown for the human participant in the final ranking
    pub player_name: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            min_questions: 1,
            max_questions: 20,
            pool_size: 3,
            countdown_secs: 30.0,
            advance_delay_secs: 3.0,
            greeting_interval_secs: 1.5,
            hint_probability: 0.3,
            reply_probability: 0.3,
            reply_delay_min_secs: 1.0,
            reply_delay_max_secs: 3.0,
            max_chat_length: 500,
            player_name: "Du".to_string(),
        }
    }
}

impl QuizConfig {
    /// Parse a (possibly partial) JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges, durations and probabilities
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_questions < MIN_QUESTION_COUNT
            || self.max_questions > MAX_QUESTION_COUNT
            || self.min_questions > self.max_questions
        {
            return Err(ConfigError::Invalid(format!(
                "question range {}..={} must lie within {}..={}",
                self.min_questions, self.max_questions, MIN_QUESTION_COUNT, MAX_QUESTION_COUNT
            )));
        }

        let available = list_profiles().len();
        if self.pool_size == 0 || self.pool_size > available {
            return Err(ConfigError::Invalid(format!(
                "pool_size {} must be between 1 and {}",
                self.pool_size, available
            )));
        }

        let durations = [
            ("countdown_secs", self.countdown_secs),
            ("advance_delay_secs", self.advance_delay_secs),
            ("greeting_interval_secs", self.greeting_interval_secs),
            ("reply_delay_min_secs", self.reply_delay_min_secs),
            ("reply_delay_max_secs", self.reply_delay_max_secs),
        ];
        for (name, secs) in durations {
            if !secs.is_finite() || secs < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a finite, non-negative number of seconds, got {}",
                    name, secs
                )));
            }
        }
        if self.countdown_secs == 0.0 {
            return Err(ConfigError::Invalid("countdown_secs must be positive".into()));
        }
        if self.reply_delay_min_secs > self.reply_delay_max_secs {
            return Err(ConfigError::Invalid(format!(
                "reply delay range {}..={} is empty",
                self.reply_delay_min_secs, self.reply_delay_max_secs
            )));
        }

        for (name, p) in [
            ("hint_probability", self.hint_probability),
            ("reply_probability", self.reply_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within 0..=1, got {}",
                    name, p
                )));
            }
        }

        if self.max_chat_length == 0 {
            return Err(ConfigError::Invalid("max_chat_length must be positive".into()));
        }
        if self.player_name.trim().is_empty() {
            return Err(ConfigError::Invalid("player_name is empty".into()));
        }
        Ok(())
    }

    pub fn question_range(&self) -> std::ops::RangeInclusive<usize> {
        self.min_questions..=self.max_questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuizConfig::default();
        assert_eq!(config.pool_size, 3);
        assert_eq!(config.countdown_secs, 30.0);
        assert!(config.question_range().contains(&20));
        assert!(!config.question_range().contains(&0));
        assert_eq!(config.hint_probability, 0.3);
        assert_eq!(config.reply_probability, 0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = QuizConfig::from_json(r#"{ "advance_delay_secs": 1.0 }"#).unwrap();
        assert_eq!(config.advance_delay_secs, 1.0);
        assert_eq!(config.max_questions, 20);
        assert_eq!(config.player_name, "Du");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            QuizConfig::from_json("[1, 2]"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_question_range_must_stay_within_limits() {
        for json in [
            r#"{ "min_questions": 0 }"#,
            r#"{ "max_questions": 50 }"#,
            r#"{ "min_questions": 0, "max_questions": 50 }"#,
            r#"{ "min_questions": 12, "max_questions": 5 }"#,
        ] {
            assert!(
                matches!(QuizConfig::from_json(json), Err(ConfigError::Invalid(_))),
                "accepted {}",
                json
            );
        }
        let narrow = QuizConfig::from_json(r#"{ "min_questions": 5, "max_questions": 10 }"#).unwrap();
        assert_eq!(narrow.question_range(), 5..=10);
    }

    fn rejects(mutate: impl FnOnce(&mut QuizConfig)) -> bool {
        let mut config = QuizConfig::default();
        mutate(&mut config);
        config.validate().is_err()
    }

    #[test]
    fn test_rejects_bad_pool_timings_and_probabilities() {
        assert!(rejects(|c| c.pool_size = 0));
        assert!(rejects(|c| c.pool_size = 99));
        assert!(rejects(|c| c.countdown_secs = 0.0));
        assert!(rejects(|c| c.advance_delay_secs = -1.0));
        assert!(rejects(|c| c.greeting_interval_secs = f64::NAN));
        assert!(rejects(|c| c.reply_delay_max_secs = f64::INFINITY));
        assert!(rejects(|c| c.reply_delay_min_secs = 5.0));
        assert!(rejects(|c| c.hint_probability = 1.5));
        assert!(rejects(|c| c.reply_probability = f64::NAN));
        assert!(rejects(|c| c.max_chat_length = 0));
        assert!(rejects(|c| c.player_name = "  ".into()));
        assert!(!rejects(|c| c.hint_probability = 1.0));
    }
}
