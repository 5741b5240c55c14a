use serde::{Deserialize, Serialize};

/// An item the player currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pickup {
    pub slug: String,
    pub kind: String,
}

impl Pickup {
    pub fn new(slug: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            kind: kind.into(),
        }
    }
}

/// How a level reacts when the player takes a pickup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupRule {
    pub kind: String,
    /// Marker recorded when the pickup is taken, e.g. `stole-fruit`.
    #[serde(default)]
    pub marker: Option<String>,
}
