//! Dialogue Engine: branching passage dialogue for interactive levels.
//!
//! Decides, for a passage id and the current narrative state, what to show
//! the player and which state and world effects to perform. Conversations
//! are staged by sensor proximity and advanced by player choices; all
//! outbound effects go through an injected `HostPort`.

pub mod core;
pub mod schema;
