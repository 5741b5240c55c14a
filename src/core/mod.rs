//! Runtime: narrative state, passage dispatch and interact staging.

pub mod dispatcher;
pub mod engine;
pub mod host;
pub mod registry;
pub mod resolver;
pub mod stage;
pub mod state;
pub mod validate;
