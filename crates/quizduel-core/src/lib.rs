//! QuizDuel Core - Quiz Session and Simulated Opponent Engine
//!
//! The core of a multiple-choice quiz played alone, together with simulated
//! fellow students (cooperative) or against them (competitive).
//!
//! # Architecture
//!
//! - **Components**: Pure data (profiles, questions, answers, chat messages)
//! - **Systems**: Logic over that data (answer simulation, commentary,
//!   task scheduling, results)
//! - **Generation**: Built-in catalogs (player profiles, seed content)
//! - **Session**: The state machine tying it together, driven by `update`
//!
//! The simulated players of one session live in a [`pool::SessionPlayerPool`]
//! backed by a small `hecs` world.
//!
//! # Example
//!
//! ```rust,no_run
//! use quizduel_core::prelude::*;
//!
//! let store = LocalContentStore::seeded().unwrap();
//! let mut session = QuizSession::new(Box::new(store), QuizConfig::default()).unwrap();
//!
//! session.start_mode(QuizMode::Competitive).unwrap();
//! session.set_question_count(5).unwrap();
//! session.select_category("Informatik").unwrap();
//!
//! while !session.is_completed() {
//!     session.update(1.0 / 60.0);
//! }
//! println!("{:?}", session.ranking());
//! ```

pub mod components;
pub mod config;
pub mod content;
pub mod error;
pub mod generation;
pub mod persistence;
pub mod pool;
pub mod session;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::QuizConfig;
    pub use crate::content::{ContentRepository, LocalContentStore};
    pub use crate::error::{ConfigError, ContentError, QuizError};
    pub use crate::pool::SessionPlayerPool;
    pub use crate::session::{QuizSession, SessionSnapshot, SessionState};
    pub use crate::systems::{Grade, RankingEntry, Summary};
}
