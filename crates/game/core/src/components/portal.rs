//! Portal component.

use crate::state::EntityId;

/// One endpoint of a deployed portal pair.
///
/// Stepping onto a portal teleports the actor to the linked endpoint,
/// provided the actor's AI publishes `portal_usable` (the player always
/// may). An unlinked portal is inert.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Portal {
    /// Endpoint tag ("entry", "exit", pair names).
    pub tag: String,
    /// Entity id of the paired portal, once deployed.
    pub linked: Option<EntityId>,
}

impl Portal {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            linked: None,
        }
    }

    pub fn linked_to(tag: impl Into<String>, other: EntityId) -> Self {
        Self {
            tag: tag.into(),
            linked: Some(other),
        }
    }
}
