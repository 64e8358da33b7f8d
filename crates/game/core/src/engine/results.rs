//! Action result records.
//!
//! Every operation (player action, AI turn, spell, status tick) emits an
//! ordered sequence of these records. The renderer/UI maps them to output;
//! the engine applies `Message` records to the log in order. The core never
//! depends on any UI.

use crate::combat::DamageType;
use crate::messages::Message;
use crate::state::{EntityId, Position};

/// One record in a `results` sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ResultEvent {
    /// User-visible text.
    Message(Message),
    /// Damage dealt to a target through the damage pipeline.
    Damage {
        target: EntityId,
        amount: i32,
        kind: DamageType,
    },
    /// An entity died and was finalized.
    Dead(EntityId),
    /// Whether a used resource (scroll, corpse, pile) was consumed.
    Consumed(bool),
    /// An entity was teleported by a portal.
    Teleported(EntityId),
    /// An entity moved one or more tiles.
    Moved { entity: EntityId, to: Position },
    /// An entity picked an item off the floor.
    PickedUp { entity: EntityId, item: EntityId },
    /// An entity auto-equipped or equipped an item.
    Equipped { entity: EntityId, item: EntityId },
    /// Experience awarded to a killer.
    XpGained { entity: EntityId, amount: u32 },
    /// A new entity entered the world (raised minion, hazard, bone pile).
    Spawned(EntityId),
}

impl ResultEvent {
    pub fn message(text: impl Into<String>, color: crate::state::Color) -> Self {
        Self::Message(Message::new(text, color))
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::Message(Message::plain(text))
    }
}

/// Convenience: pull all messages out of a results slice, in order.
pub fn messages(results: &[ResultEvent]) -> Vec<&Message> {
    results
        .iter()
        .filter_map(|r| match r {
            ResultEvent::Message(m) => Some(m),
            _ => None,
        })
        .collect()
}

/// Convenience: whether the results contain a death notice for `id`.
pub fn contains_death(results: &[ResultEvent], id: EntityId) -> bool {
    results.iter().any(|r| matches!(r, ResultEvent::Dead(d) if *d == id))
}
