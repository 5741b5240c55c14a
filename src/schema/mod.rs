//! Authored content types: passages, conditions, pickups and modules.

pub mod condition;
pub mod module;
pub mod passage;
pub mod pickup;
pub mod time;
