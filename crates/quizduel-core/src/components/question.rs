//! Question and answer components.

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A quiz category as listed by the content repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl Category {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            icon: String::new(),
            color: String::new(),
        }
    }
}

/// A multiple-choice question, read-only to the engine.
///
/// The category is denormalized as its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub answers: Vec<String>,
    pub correct_answer: usize,
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    /// Create a validated question
    pub fn new(
        id: u32,
        prompt: impl Into<String>,
        answers: Vec<String>,
        correct_answer: usize,
        category: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, ContentError> {
        let question = Self {
            id,
            prompt: prompt.into(),
            answers,
            correct_answer,
            category: category.into(),
            difficulty,
            explanation: None,
        };
        question.validate()?;
        Ok(question)
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Check the structural invariants: a prompt, at least two options and
    /// a correct index that points at one of them.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.prompt.trim().is_empty() {
            return Err(ContentError::InvalidQuestion(format!(
                "question {} has an empty prompt",
                self.id
            )));
        }
        if self.answers.len() < 2 {
            return Err(ContentError::InvalidQuestion(format!(
                "question {} needs at least 2 answers, has {}",
                self.id,
                self.answers.len()
            )));
        }
        if self.correct_answer >= self.answers.len() {
            return Err(ContentError::InvalidQuestion(format!(
                "question {}: correct answer {} out of range",
                self.id, self.correct_answer
            )));
        }
        if self.answers.iter().any(|a| a.trim().is_empty()) {
            return Err(ContentError::InvalidQuestion(format!(
                "question {} has an empty answer option",
                self.id
            )));
        }
        Ok(())
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer
    }

    pub fn answer_text(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    pub fn correct_text(&self) -> Option<&str> {
        self.answer_text(self.correct_answer)
    }
}

/// The human participant's answer to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanAnswer {
    /// `None` when the countdown ran out
    pub selected_answer: Option<usize>,
    pub is_correct: bool,
    pub time_taken: u32,
    pub question_id: u32,
    pub timed_out: bool,
}

impl HumanAnswer {
    pub fn answered(question: &Question, index: usize, time_taken: u32) -> Self {
        Self {
            selected_answer: Some(index),
            is_correct: question.is_correct(index),
            time_taken,
            question_id: question.id,
            timed_out: false,
        }
    }

    pub fn timed_out(question: &Question, time_taken: u32) -> Self {
        Self {
            selected_answer: None,
            is_correct: false,
            time_taken,
            question_id: question.id,
            timed_out: true,
        }
    }
}

/// One simulated player's answer to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedAnswer {
    pub player_id: u32,
    pub player_name: String,
    pub selected_answer: usize,
    pub is_correct: bool,
    pub time_taken: u32,
    pub question_index: usize,
    /// Session clock seconds at which the answer was produced
    pub timestamp: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Option {}", i)).collect()
    }

    #[test]
    fn test_question_validation() {
        assert!(Question::new(1, "Was ist 2+2?", options(4), 1, "Mathematik", Difficulty::Easy).is_ok());
        assert!(Question::new(1, "Was ist 2+2?", options(1), 0, "Mathematik", Difficulty::Easy).is_err());
        assert!(Question::new(1, "Was ist 2+2?", options(3), 3, "Mathematik", Difficulty::Easy).is_err());
        assert!(Question::new(1, "   ", options(3), 0, "Mathematik", Difficulty::Easy).is_err());
    }

    #[test]
    fn test_answer_helpers() {
        let q = Question::new(3, "Hauptstadt?", options(3), 2, "Geografie", Difficulty::Medium)
            .unwrap()
            .with_explanation("Weil.");
        assert!(q.is_correct(2));
        assert_eq!(q.correct_text(), Some("Option 2"));
        assert_eq!(q.answer_text(5), None);

        let malformed = Question {
            correct_answer: 7,
            ..q.clone()
        };
        assert_eq!(malformed.correct_text(), None);

        let timed_out = HumanAnswer::timed_out(&q, 30);
        assert!(timed_out.timed_out);
        assert!(!timed_out.is_correct);
        assert_eq!(timed_out.selected_answer, None);

        let answered = HumanAnswer::answered(&q, 2, 4);
        assert!(answered.is_correct);
        assert_eq!(answered.question_id, 3);
    }

    #[test]
    fn test_difficulty_from_json() {
        let q: Question = serde_json::from_str(
            r#"{"id":1,"prompt":"p","answers":["a","b"],"correct_answer":0,"category":"c","difficulty":"hard"}"#,
        )
        .unwrap();
        assert_eq!(q.difficulty, Difficulty::Hard);
        assert_eq!(q.explanation, None);
    }
}
