//! Data types shared by the session engine.
//!
//! Components are plain data. Behavior that needs randomness or touches
//! more than one type lives in [`crate::systems`].

mod chat;
mod common;
mod player;
mod question;

pub use chat::*;
pub use common::*;
pub use player::*;
pub use question::*;
