//! Player-related components: PlayerProfile, PlayerStats, Personality, etc.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// How a simulated player behaves in chat and commentary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Competitive,
    Cooperative,
    Balanced,
}

/// Study progress of a simulated student
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ExperienceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Erstsemester",
            ExperienceLevel::Intermediate => "Bachelor",
            ExperienceLevel::Advanced => "Master",
            ExperienceLevel::Expert => "Doktorand",
        }
    }
}

/// Static catalog entry describing a simulated opponent.
///
/// Profiles are built once and never mutated; per-session counters live
/// in [`PlayerStats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: u32,
    pub name: String,
    pub affiliation: String,
    pub experience: ExperienceLevel,
    pub avatar: String,
    pub color: String,
    /// Base probability of answering correctly, 0.0 to 1.0
    pub skill_level: f32,
    /// Latency divisor; above 1.0 answers faster than baseline
    pub speed_factor: f32,
    pub personality: Personality,
    pub specialties: BTreeSet<String>,
    pub weaknesses: BTreeSet<String>,
}

impl PlayerProfile {
    /// Create a validated profile with no avatar and no topic biases
    pub fn new(
        id: u32,
        name: impl Into<String>,
        affiliation: impl Into<String>,
        experience: ExperienceLevel,
        skill_level: f32,
        speed_factor: f32,
        personality: Personality,
    ) -> Result<Self, QuizError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(QuizError::InvalidProfile(format!("profile {} has no name", id)));
        }
        if id == super::HUMAN_PLAYER_ID {
            return Err(QuizError::InvalidProfile(format!(
                "id {} is reserved for the human player",
                id
            )));
        }
        if !(0.0..=1.0).contains(&skill_level) {
            return Err(QuizError::InvalidProfile(format!(
                "{}: skill level {} outside 0..=1",
                name, skill_level
            )));
        }
        if !(speed_factor.is_finite() && speed_factor > 0.0) {
            return Err(QuizError::InvalidProfile(format!(
                "{}: speed factor must be positive, got {}",
                name, speed_factor
            )));
        }

        Ok(Self {
            id,
            name,
            affiliation: affiliation.into(),
            experience,
            avatar: String::new(),
            color: String::new(),
            skill_level,
            speed_factor,
            personality,
            specialties: BTreeSet::new(),
            weaknesses: BTreeSet::new(),
        })
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>, color: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self.color = color.into();
        self
    }

    pub fn with_specialties(mut self, topics: &[&str]) -> Self {
        self.specialties = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_weaknesses(mut self, topics: &[&str]) -> Self {
        self.weaknesses = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn is_specialty(&self, topic: &str) -> bool {
        self.specialties.contains(topic)
    }

    pub fn is_weakness(&self, topic: &str) -> bool {
        self.weaknesses.contains(topic)
    }
}

/// Mutable per-session counters of a simulated player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub score: u32,
    pub answered_questions: u32,
    pub correct_answers: u32,
    /// Accumulated answer latency in seconds
    pub total_time: u32,
    /// round(total_time / answered_questions)
    pub average_time: u32,
    pub is_active: bool,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            score: 0,
            answered_questions: 0,
            correct_answers: 0,
            total_time: 0,
            average_time: 0,
            is_active: true,
        }
    }
}

impl PlayerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one answer. `score_delta` is `Some` only for correct answers.
    pub fn record(&mut self, time_taken: u32, score_delta: Option<u32>) {
        self.answered_questions += 1;
        self.total_time += time_taken;
        self.average_time =
            (self.total_time as f32 / self.answered_questions as f32).round() as u32;

        if let Some(delta) = score_delta {
            self.correct_answers += 1;
            self.score += delta;
        }
    }

    /// Fraction of answers that were correct, 0.0 before the first answer
    pub fn accuracy(&self) -> f32 {
        if self.answered_questions == 0 {
            0.0
        } else {
            self.correct_answers as f32 / self.answered_questions as f32
        }
    }

    pub fn performance_rating(&self) -> PerformanceRating {
        PerformanceRating::from_stats(self.accuracy(), self.average_time)
    }
}

/// Four-tier qualitative label derived from accuracy and latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRating {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl PerformanceRating {
    pub fn from_stats(accuracy: f32, average_time: u32) -> Self {
        let speed_rating = if average_time <= 15 {
            1.0
        } else if average_time <= 25 {
            0.5
        } else {
            0.0
        };
        let overall = (accuracy + speed_rating) / 2.0;

        if overall >= 0.8 {
            PerformanceRating::Excellent
        } else if overall >= 0.6 {
            PerformanceRating::Good
        } else if overall >= 0.4 {
            PerformanceRating::Average
        } else {
            PerformanceRating::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceRating::Excellent => "excellent",
            PerformanceRating::Good => "good",
            PerformanceRating::Average => "average",
            PerformanceRating::NeedsImprovement => "needs_improvement",
        }
    }
}

/// A profile together with its live counters, as handed out by the pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlayer {
    pub profile: PlayerProfile,
    pub stats: PlayerStats,
}

/// Read-only statistics row for the multiplayer sidebar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatistics {
    pub id: u32,
    pub name: String,
    pub score: u32,
    pub correct_answers: u32,
    pub total_answers: u32,
    pub average_time: u32,
    pub accuracy: f32,
    pub performance_rating: PerformanceRating,
}

impl PlayerStatistics {
    pub fn new(profile: &PlayerProfile, stats: &PlayerStats) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            score: stats.score,
            correct_answers: stats.correct_answers,
            total_answers: stats.answered_questions,
            average_time: stats.average_time,
            accuracy: stats.accuracy(),
            performance_rating: stats.performance_rating(),
        }
    }
}
