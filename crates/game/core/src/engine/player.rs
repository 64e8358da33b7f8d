//! Player-action processor.
//!
//! Consumes intent tokens from the input layer and produces the same
//! `results` shape as AI turns. Momentum-breaking actions (moving,
//! quaffing, reading) reset the player's speed-bonus ratchet.

use crate::ai::{helpers, items};
use crate::combat::{AttackOptions, attack_with_tempo};
use crate::engine::{GameEngine, ResultEvent, TurnCtx};
use crate::map::FovMap;
use crate::spells::{SpellTarget, cast_at_nearest_hostile, cast_spell};
use crate::state::{Color, EntityId, Position};

/// Player-intent tokens produced by the input layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PlayerIntent {
    /// Step or bump-attack in a direction.
    Move { dx: i32, dy: i32 },
    /// Attack a specific entity in reach.
    Attack(EntityId),
    /// Pick up whatever lies on the player's tile.
    PickUp,
    /// Use an inventory item (quaff, read).
    UseItem(EntityId),
    /// Drop an inventory item on the player's tile.
    DropItem(EntityId),
    /// Cast a spell by id at a target.
    CastSpell { spell_id: String, target: SpellTarget },
    /// Open (and if keyed, unlock) an adjacent door.
    OpenDoor { dx: i32, dy: i32 },
    /// Close an adjacent open door.
    CloseDoor { dx: i32, dy: i32 },
    /// Search adjacent tiles for secret doors.
    Search,
    /// Take the down stairs (handled by the session).
    Descend,
    /// Take the up stairs (handled by the session).
    Ascend,
    /// Pass the turn.
    Wait,
}

impl GameEngine<'_> {
    /// Resolve one player intent. Stairs intents are the session's job and
    /// resolve to no-ops here.
    pub fn player_action(&mut self, intent: PlayerIntent, fov: &FovMap) -> Vec<ResultEvent> {
        let mut ctx = self.turn_ctx(fov);
        let results = match intent {
            PlayerIntent::Move { dx, dy } => player_move(&mut ctx, dx, dy),
            PlayerIntent::Attack(target) => player_attack(&mut ctx, target),
            PlayerIntent::PickUp => player_pickup(&mut ctx),
            PlayerIntent::UseItem(item) => player_use_item(&mut ctx, item),
            PlayerIntent::DropItem(item) => player_drop_item(&mut ctx, item),
            PlayerIntent::CastSpell { spell_id, target } => {
                player_cast(&mut ctx, &spell_id, target)
            }
            PlayerIntent::OpenDoor { dx, dy } => player_open_door(&mut ctx, dx, dy),
            PlayerIntent::CloseDoor { dx, dy } => player_close_door(&mut ctx, dx, dy),
            PlayerIntent::Search => player_search(&mut ctx),
            PlayerIntent::Descend | PlayerIntent::Ascend | PlayerIntent::Wait => Vec::new(),
        };
        drop(ctx);
        self.publish(&results);
        results
    }
}

fn player_attack(ctx: &mut TurnCtx<'_>, target: EntityId) -> Vec<ResultEvent> {
    let (Some(own_pos), Some(target_pos)) = (
        ctx.entities.get(EntityId::PLAYER).and_then(|e| e.position),
        ctx.entities.get(target).and_then(|e| e.position),
    ) else {
        return vec![ResultEvent::message("There is nothing there to attack.", Color::GREY)];
    };
    let reach = helpers::weapon_reach(ctx, EntityId::PLAYER);
    if own_pos.chebyshev(target_pos) > reach {
        return vec![ResultEvent::message("It is out of reach.", Color::GREY)];
    }
    attack_with_tempo(ctx, EntityId::PLAYER, target, AttackOptions::PRIMARY)
}

fn reset_momentum(ctx: &mut TurnCtx<'_>) {
    if let Some(entity) = ctx.entities.get_mut(EntityId::PLAYER)
        && let Some(tracker) = entity.speed_bonus.as_mut()
    {
        tracker.reset();
    }
}

fn player_move(ctx: &mut TurnCtx<'_>, dx: i32, dy: i32) -> Vec<ResultEvent> {
    let Some(from) = ctx.entities.get(EntityId::PLAYER).and_then(|e| e.position) else {
        return Vec::new();
    };
    let to = from.offset(dx, dy);

    // Bump-attack a hostile blocker.
    if let Some(target) = ctx.entities.blocking_at(to) {
        if target.fighter.is_some() && target.is_alive() {
            let target_id = target.id;
            return attack_with_tempo(ctx, EntityId::PLAYER, target_id, AttackOptions::PRIMARY);
        }
    }

    // Bump-open a plain closed door.
    let door_info = ctx
        .entities
        .iter()
        .find(|e| e.position == Some(to) && e.door.is_some())
        .map(|e| (e.id, e.door.clone().expect("door component")));
    if let Some((door_id, door)) = door_info
        && door.blocks_movement()
    {
        if door.is_locked {
            return vec![ResultEvent::message("The door is locked.", Color::GREY)];
        }
        if let Some(entity) = ctx.entities.get_mut(door_id)
            && let Some(door) = entity.door.as_mut()
        {
            door.open();
        }
        return vec![ResultEvent::message("You push the door open.", Color::WHITE)];
    }

    if ctx.entities.get(EntityId::PLAYER).is_some_and(|e| e.has_status("glue")) {
        return vec![ResultEvent::message(
            "You struggle against the glue!",
            Color::SICKLY_GREEN,
        )];
    }
    if !ctx.walkable(to) {
        return Vec::new();
    }

    // Moving breaks attack momentum.
    reset_momentum(ctx);
    helpers::move_entity(ctx, EntityId::PLAYER, to)
}

fn player_pickup(ctx: &mut TurnCtx<'_>) -> Vec<ResultEvent> {
    let Some(pos) = ctx.entities.get(EntityId::PLAYER).and_then(|e| e.position) else {
        return Vec::new();
    };
    let item = ctx
        .entities
        .iter()
        .find(|e| e.position == Some(pos) && e.item.is_some())
        .map(|e| e.id);
    match item {
        Some(item_id) => items::pickup_item(ctx, EntityId::PLAYER, item_id),
        None => vec![ResultEvent::message("There is nothing here to pick up.", Color::GREY)],
    }
}

fn player_use_item(ctx: &mut TurnCtx<'_>, item_id: EntityId) -> Vec<ResultEvent> {
    let held = ctx
        .entities
        .get(EntityId::PLAYER)
        .and_then(|e| e.inventory.as_ref())
        .is_some_and(|inv| inv.contains(item_id));
    if !held {
        return vec![ResultEvent::message("You are not carrying that.", Color::GREY)];
    }
    let Some(spell_id) = ctx
        .entities
        .get(item_id)
        .and_then(|e| e.item.as_ref())
        .and_then(|i| i.use_spell.clone())
    else {
        return vec![ResultEvent::message("Nothing happens.", Color::GREY)];
    };
    let Some(spell) = ctx.content.spell(&spell_id).cloned() else {
        return vec![ResultEvent::message("Nothing happens.", Color::GREY)];
    };
    let offensive = ctx
        .entities
        .get(item_id)
        .and_then(|e| e.item.as_ref())
        .is_some_and(|i| i.offensive);

    // Quaffing or reading breaks attack momentum.
    reset_momentum(ctx);

    let results = if offensive {
        cast_at_nearest_hostile(ctx, EntityId::PLAYER, &spell)
    } else {
        cast_spell(ctx, EntityId::PLAYER, &spell, SpellTarget::Caster)
    };

    let consumed = !results
        .iter()
        .any(|r| matches!(r, ResultEvent::Consumed(false)));
    if consumed {
        if let Some(entity) = ctx.entities.get_mut(EntityId::PLAYER)
            && let Some(inventory) = entity.inventory.as_mut()
        {
            inventory.remove(item_id);
        }
        ctx.entities.remove(item_id);
    }
    results
}

fn player_drop_item(ctx: &mut TurnCtx<'_>, item_id: EntityId) -> Vec<ResultEvent> {
    let Some(pos) = ctx.entities.get(EntityId::PLAYER).and_then(|e| e.position) else {
        return Vec::new();
    };
    let removed = ctx
        .entities
        .get_mut(EntityId::PLAYER)
        .and_then(|e| e.inventory.as_mut())
        .is_some_and(|inv| inv.remove(item_id));
    if !removed {
        return vec![ResultEvent::message("You are not carrying that.", Color::GREY)];
    }
    let name = ctx
        .entities
        .get_mut(item_id)
        .map(|e| {
            e.position = Some(pos);
            e.name.clone()
        })
        .unwrap_or_default();
    vec![ResultEvent::message(format!("You drop the {name}."), Color::WHITE)]
}

fn player_cast(ctx: &mut TurnCtx<'_>, spell_id: &str, target: SpellTarget) -> Vec<ResultEvent> {
    let Some(spell) = ctx.content.spell(spell_id).cloned() else {
        return vec![ResultEvent::message("You don't know that spell.", Color::GREY)];
    };
    cast_spell(ctx, EntityId::PLAYER, &spell, target)
}

fn adjacent_door(ctx: &TurnCtx<'_>, dx: i32, dy: i32) -> Option<(EntityId, Position)> {
    let from = ctx.entities.get(EntityId::PLAYER).and_then(|e| e.position)?;
    let at = from.offset(dx, dy);
    ctx.entities
        .iter()
        .find(|e| e.position == Some(at) && e.door.is_some())
        .map(|e| (e.id, at))
}

fn player_open_door(ctx: &mut TurnCtx<'_>, dx: i32, dy: i32) -> Vec<ResultEvent> {
    let Some((door_id, _)) = adjacent_door(ctx, dx, dy) else {
        return vec![ResultEvent::message("There is no door there.", Color::GREY)];
    };

    // Collect the player's key tags up front to try against a lock.
    let key_tags: Vec<String> = ctx
        .entities
        .get(EntityId::PLAYER)
        .and_then(|e| e.inventory.as_ref())
        .map(|inv| {
            inv.items
                .iter()
                .filter_map(|&id| {
                    ctx.entities
                        .get(id)
                        .and_then(|e| e.item.as_ref())
                        .and_then(|i| i.key_tag.clone())
                })
                .collect()
        })
        .unwrap_or_default();

    let Some(entity) = ctx.entities.get_mut(door_id) else {
        return Vec::new();
    };
    let Some(door) = entity.door.as_mut() else {
        return Vec::new();
    };

    if !door.is_closed {
        return vec![ResultEvent::message("It is already open.", Color::GREY)];
    }
    if door.is_locked {
        let unlocked = key_tags.iter().any(|tag| door.unlock(tag));
        if !unlocked {
            return vec![ResultEvent::message(
                "The door is locked, and you have no matching key.",
                Color::GREY,
            )];
        }
        door.open();
        return vec![ResultEvent::message(
            "The key turns; the door swings open.",
            Color::WHITE,
        )];
    }
    door.open();
    vec![ResultEvent::message("You open the door.", Color::WHITE)]
}

fn player_close_door(ctx: &mut TurnCtx<'_>, dx: i32, dy: i32) -> Vec<ResultEvent> {
    let Some((door_id, at)) = adjacent_door(ctx, dx, dy) else {
        return vec![ResultEvent::message("There is no door there.", Color::GREY)];
    };
    if ctx.entities.blocking_at(at).is_some() {
        return vec![ResultEvent::message("Something is in the way.", Color::GREY)];
    }
    let Some(entity) = ctx.entities.get_mut(door_id) else {
        return Vec::new();
    };
    let Some(door) = entity.door.as_mut() else {
        return Vec::new();
    };
    if door.is_closed {
        return vec![ResultEvent::message("It is already closed.", Color::GREY)];
    }
    door.close();
    vec![ResultEvent::message("You pull the door shut.", Color::WHITE)]
}

/// Search adjacent tiles: a d20 roll against each secret door's DC.
fn player_search(ctx: &mut TurnCtx<'_>) -> Vec<ResultEvent> {
    let Some(pos) = ctx.entities.get(EntityId::PLAYER).and_then(|e| e.position) else {
        return Vec::new();
    };
    let candidates: Vec<EntityId> = ctx
        .entities
        .iter()
        .filter(|e| {
            e.door
                .as_ref()
                .is_some_and(|d| d.is_secret && !d.is_discovered)
        })
        .filter(|e| e.position.is_some_and(|p| pos.chebyshev(p) <= 1))
        .map(|e| e.id)
        .collect();

    let mut results = Vec::new();
    for door_id in candidates {
        let roll = ctx.rng.roll_die(20) as i32;
        let Some(entity) = ctx.entities.get_mut(door_id) else {
            continue;
        };
        let Some(door) = entity.door.as_mut() else {
            continue;
        };
        if roll >= door.search_dc {
            door.discover();
            results.push(ResultEvent::message(
                "You discover a hidden door!",
                Color::CYAN,
            ));
        }
    }
    if results.is_empty() {
        results.push(ResultEvent::message("You find nothing.", Color::GREY));
    }
    results
}
