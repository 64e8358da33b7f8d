//! Behavior tests: status effects, taunt, doors, items, portals, and the
//! AI differentiators that have deterministic observable outcomes.

mod common;

use barrow_core::{
    AiState, EffectKind, EntityId, PERMANENT, PlayerIntent, Portal, Position, SpellTarget,
    StatusEffect,
};
use common::*;

fn add_status(session: &mut barrow_runtime::GameSession, id: EntityId, effect: StatusEffect) {
    let entity = session.state.entities.get_mut(id).unwrap();
    entity.statuses.get_or_insert_default().add(effect);
}

#[test]
fn taunt_redirects_hostile_ai() {
    let mut session = arena_session(51, Position::new(20, 20));
    let orc = session.spawn_monster_at("orc", Position::new(25, 20)).unwrap();
    let troll = session.spawn_monster_at("troll", Position::new(25, 24)).unwrap();
    add_status(&mut session, troll, StatusEffect::new(EffectKind::Taunted, PERMANENT));

    let before = session
        .state
        .entities
        .get(orc)
        .unwrap()
        .distance_to(session.state.entities.get(troll).unwrap())
        .unwrap();
    run_enemy_phase(&mut session);
    let after = session
        .state
        .entities
        .get(orc)
        .unwrap()
        .distance_to(session.state.entities.get(troll).unwrap())
        .unwrap();

    assert!(after < before, "taunted troll must pull the orc, got {before} -> {after}");
}

#[test]
fn glue_blocks_movement_but_not_adjacent_attacks() {
    let mut session = arena_session(53, Position::new(20, 20));

    // Far and glued: struggles in place.
    let stuck = session.spawn_monster_at("orc", Position::new(26, 20)).unwrap();
    add_status(&mut session, stuck, StatusEffect::new(EffectKind::Glue, PERMANENT));
    let before = session.state.entities.get(stuck).unwrap().position;
    let results = run_enemy_phase(&mut session);
    assert_eq!(session.state.entities.get(stuck).unwrap().position, before);
    assert!(messages_text(&results).contains("struggles against the glue"));

    // Adjacent and glued: still swings.
    let biter = session.spawn_monster_at("skeleton", Position::new(19, 20)).unwrap();
    add_status(&mut session, biter, StatusEffect::new(EffectKind::Glue, PERMANENT));
    let results = run_enemy_phase(&mut session);
    assert!(count_attacks(&results) >= 1, "glued but adjacent: attack expected");
    let _ = biter;
}

#[test]
fn paralysis_skips_the_whole_turn() {
    let mut session = arena_session(55, Position::new(20, 20));
    let orc = session.spawn_monster_at("orc", Position::new(22, 20)).unwrap();
    add_status(&mut session, orc, StatusEffect::new(EffectKind::Paralysis, 2));

    let before = session.state.entities.get(orc).unwrap().position;
    let results = run_enemy_phase(&mut session);
    assert_eq!(session.state.entities.get(orc).unwrap().position, before);
    assert_eq!(count_attacks(&results), 0);
    assert!(messages_text(&results).contains("paralyzed"));
}

#[test]
fn dot_death_finalizes_like_combat_death() {
    let mut session = arena_session(57, Position::new(20, 20));
    let orc = session.spawn_monster_at("orc", Position::new(22, 20)).unwrap();
    add_status(
        &mut session,
        orc,
        StatusEffect::new(EffectKind::Plague { per_turn: 99 }, 3),
    );

    let results = run_enemy_phase(&mut session);
    assert!(barrow_core::engine::contains_death(&results, orc));
    let corpse = session.state.entities.get(orc).unwrap();
    assert!(corpse.corpse.is_some(), "DOT death must leave a corpse");
    assert!(corpse.fighter.is_none() && corpse.ai.is_none());
}

#[test]
fn invisibility_blanks_targeting_and_breaks_on_attack() {
    let mut session = arena_session(59, Position::new(20, 20));
    let orc = session.spawn_monster_at("orc", Position::new(24, 20)).unwrap();
    add_status(
        &mut session,
        EntityId::PLAYER,
        StatusEffect::new(EffectKind::Invisibility, PERMANENT),
    );

    let before = session.state.entities.get(orc).unwrap().position;
    run_enemy_phase(&mut session);
    assert_eq!(
        session.state.entities.get(orc).unwrap().position,
        before,
        "no visible hostile, no move"
    );

    // Walk adjacent (several phases pass harmlessly), then strike: the
    // veil breaks before the attack resolves.
    for _ in 0..3 {
        run_player_action(&mut session, PlayerIntent::Move { dx: 1, dy: 0 });
    }
    let results = run_player_action(&mut session, PlayerIntent::Attack(orc));
    assert!(messages_text(&results).contains("fades into view"));
    assert!(!session.state.entities.player().has_status("invisibility"));
}

#[test]
fn confusion_wraps_the_ai_and_recovers() {
    let mut session = arena_session(61, Position::new(20, 20));
    let orc = session.spawn_monster_at("orc", Position::new(23, 20)).unwrap();

    let results = run_player_action(
        &mut session,
        PlayerIntent::CastSpell {
            spell_id: "confuse".into(),
            target: SpellTarget::Entity(orc),
        },
    );
    assert!(messages_text(&results).contains("vacant"));
    assert!(matches!(
        session.state.entities.get(orc).unwrap().ai,
        Some(AiState::Confused(_))
    ));

    // Ten confused turns, then recovery on the eleventh.
    let mut recovered = false;
    for _ in 0..11 {
        let results = run_enemy_phase(&mut session);
        if messages_text(&results).contains("no longer confused") {
            recovered = true;
            break;
        }
    }
    assert!(recovered);
    assert!(matches!(
        session.state.entities.get(orc).unwrap().ai,
        Some(AiState::Basic(_))
    ));
}

#[test]
fn locked_doors_need_the_matching_key() {
    let mut session = arena_session(63, Position::new(20, 20));
    let door_id = session.state.allocate_id();
    session.state.entities.push(barrow_runtime::door_entity(
        door_id,
        Position::new(21, 20),
        barrow_core::Door::locked("brass"),
    ));

    // Bumping a locked door announces the lock.
    let results = run_player_action(&mut session, PlayerIntent::Move { dx: 1, dy: 0 });
    assert!(messages_text(&results).contains("locked"));
    assert_eq!(
        session.state.entities.player().position,
        Some(Position::new(20, 20))
    );

    // With the key it opens.
    let key = session.spawn_item_at("brass_key", Position::new(20, 20)).unwrap();
    run_player_action(&mut session, PlayerIntent::PickUp);
    let results = run_player_action(&mut session, PlayerIntent::OpenDoor { dx: 1, dy: 0 });
    assert!(messages_text(&results).contains("swings open"));
    let _ = key;

    // Open doors never block.
    run_player_action(&mut session, PlayerIntent::Move { dx: 1, dy: 0 });
    assert_eq!(
        session.state.entities.player().position,
        Some(Position::new(21, 20))
    );
}

#[test]
fn player_pickup_and_consumable_lifecycle() {
    let mut session = arena_session(65, Position::new(20, 20));
    let potion = session
        .spawn_item_at("healing_potion", Position::new(20, 20))
        .unwrap();

    run_player_action(&mut session, PlayerIntent::PickUp);
    assert!(
        session
            .state
            .entities
            .player()
            .inventory
            .as_ref()
            .unwrap()
            .contains(potion)
    );
    assert_eq!(session.state.entities.get(potion).unwrap().position, None);

    // At full health the potion refuses to be wasted.
    let results = run_player_action(&mut session, PlayerIntent::UseItem(potion));
    assert!(messages_text(&results).contains("already at full health"));
    assert!(
        session
            .state
            .entities
            .player()
            .inventory
            .as_ref()
            .unwrap()
            .contains(potion)
    );

    // Hurt, it heals and is consumed.
    session
        .state
        .entities
        .player_mut()
        .fighter
        .as_mut()
        .unwrap()
        .hp = 10;
    let results = run_player_action(&mut session, PlayerIntent::UseItem(potion));
    assert!(messages_text(&results).contains("recovers"));
    assert!(session.state.entities.get(potion).is_none());
    assert!(hp_of(&session, EntityId::PLAYER) > 10);
}

#[test]
fn monster_seeks_picks_up_and_auto_equips() {
    let mut session = arena_session(67, Position::new(20, 20));
    let orc = session.spawn_monster_at("orc", Position::new(26, 20)).unwrap();
    let sword = session
        .spawn_item_at("short_sword", Position::new(27, 20))
        .unwrap();
    let base_power = session
        .state
        .entities
        .get(orc)
        .unwrap()
        .fighter
        .as_ref()
        .unwrap()
        .power;

    // The sword is closer to the orc than the player is; give it a few
    // phases to walk over and scoop it up.
    let mut equipped = false;
    for _ in 0..6 {
        run_enemy_phase(&mut session);
        let entity = session.state.entities.get(orc).unwrap();
        if entity
            .equipment
            .as_ref()
            .is_some_and(|eq| eq.get(barrow_core::EquipSlot::MainHand) == Some(sword))
        {
            equipped = true;
            break;
        }
    }
    assert!(equipped, "orc should seek and auto-equip the sword");
    let entity = session.state.entities.get(orc).unwrap();
    assert_eq!(entity.fighter.as_ref().unwrap().power, base_power + 2);
    // Equipped items leave the inventory list (no double-drop on death).
    assert!(!entity.inventory.as_ref().unwrap().contains(sword));
    assert_eq!(session.state.entities.get(sword).unwrap().position, None);
}

#[test]
fn portals_carry_the_willing_and_refuse_bosses() {
    let mut session = arena_session(69, Position::new(20, 20));

    let exit_id = session.state.allocate_id();
    let mut exit = barrow_core::Entity::new(
        exit_id,
        "portal",
        'O',
        barrow_core::Color::BLUE,
        Position::new(30, 30),
    );
    exit.portal = Some(Portal::new("exit"));
    session.state.entities.push(exit);

    let entry_id = session.state.allocate_id();
    let mut entry = barrow_core::Entity::new(
        entry_id,
        "portal",
        'O',
        barrow_core::Color::BLUE,
        Position::new(21, 20),
    );
    entry.portal = Some(Portal::linked_to("entry", exit_id));
    session.state.entities.push(entry);

    // The player steps on and is pulled through.
    let results = run_player_action(&mut session, PlayerIntent::Move { dx: 1, dy: 0 });
    assert!(results.iter().any(|r| matches!(
        r,
        barrow_core::ResultEvent::Teleported(id) if *id == EntityId::PLAYER
    )));
    assert_eq!(
        session.state.entities.player().position,
        Some(Position::new(30, 30))
    );

    // A boss on the same tile stays put.
    let boss = session
        .spawn_monster_at("ogre_warlord", Position::new(21, 20))
        .unwrap();
    assert!(
        !session
            .state
            .entities
            .get(boss)
            .unwrap()
            .ai
            .as_ref()
            .unwrap()
            .portal_usable()
    );
}

#[test]
fn boss_enrages_once_at_threshold() {
    let mut session = arena_session(71, Position::new(20, 20));
    let boss = session
        .spawn_monster_at("ogre_warlord", Position::new(24, 20))
        .unwrap();
    {
        let entity = session.state.entities.get_mut(boss).unwrap();
        entity.fighter.as_mut().unwrap().hp = 20;
    }

    let results = run_enemy_phase(&mut session);
    assert!(messages_text(&results).contains("rage"));
    let entity = session.state.entities.get(boss).unwrap();
    assert!(entity.boss.as_ref().unwrap().is_enraged);

    // Enrage never fires twice.
    let results = run_enemy_phase(&mut session);
    assert!(!messages_text(&results).contains("flies into a rage"));
}

#[test]
fn skirmisher_leaps_into_the_window() {
    let mut session = arena_session(73, Position::new(20, 20));
    let skirmisher = session
        .spawn_monster_at("skirmisher", Position::new(26, 20))
        .unwrap();

    let results = run_enemy_phase(&mut session);
    assert!(messages_text(&results).contains("leaps forward"));
    let pos = session.state.entities.get(skirmisher).unwrap().position.unwrap();
    assert_eq!(pos, Position::new(24, 20), "two full steps toward the player");

    match session.state.entities.get(skirmisher).unwrap().ai.as_ref() {
        Some(AiState::Skirmisher(ai)) => assert_eq!(ai.leap_cooldown_remaining, 3),
        _ => panic!("skirmisher AI missing"),
    }
}
