//! Common types used across the engine.

use serde::{Deserialize, Serialize};

/// Player id reserved for the human participant in rankings and chat.
pub const HUMAN_PLAYER_ID: u32 = 0;

/// How a quiz is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    /// Human alone, no opponents, no countdown
    SinglePlayer,
    /// Simulated players help out through the chat, no countdown
    Cooperative,
    /// Simulated players race the human under a per-question countdown
    Competitive,
}

impl QuizMode {
    pub const ALL: [QuizMode; 3] = [
        QuizMode::SinglePlayer,
        QuizMode::Cooperative,
        QuizMode::Competitive,
    ];

    pub fn is_multiplayer(&self) -> bool {
        !matches!(self, QuizMode::SinglePlayer)
    }

    /// Only competitive questions run against the clock
    pub fn has_countdown(&self) -> bool {
        matches!(self, QuizMode::Competitive)
    }

    /// Only cooperative sessions have a chat channel
    pub fn has_chat(&self) -> bool {
        matches!(self, QuizMode::Cooperative)
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuizMode::SinglePlayer => "Einzelspieler",
            QuizMode::Cooperative => "Kooperativ",
            QuizMode::Competitive => "Kompetitiv",
        }
    }
}

impl std::fmt::Display for QuizMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
