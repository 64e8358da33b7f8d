//! Boss AI: basic chase with enrage, dialogue, and status immunities.
//!
//! Immunities themselves live on the status manager; the boss component
//! supplies the enrage/damage-multiplier state consumed by the combat
//! resolver. Bosses publish `portal_usable = false`.

use crate::ai::{BossAi, basic};
use crate::components::DialogueMoment;
use crate::engine::{ResultEvent, TurnCtx};
use crate::state::{Color, EntityId};

pub(super) fn take_turn(
    ai: &mut BossAi,
    actor: EntityId,
    target: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    if !basic::prelude(&mut ai.base, actor, ctx) {
        return Vec::new();
    }

    let mut results = Vec::new();

    // Enrage check fires once, with a one-shot bark.
    let enrage = ctx.entities.get(actor).and_then(|e| {
        let fighter = e.fighter.as_ref()?;
        let boss = e.boss.as_ref()?;
        boss.should_enrage(fighter.hp, fighter.max_hp)
            .then_some(fighter.hp)
    });
    if enrage.is_some()
        && let Some(entity) = ctx.entities.get_mut(actor)
    {
        let name = entity.name.clone();
        if let Some(boss) = entity.boss.as_mut() {
            boss.is_enraged = true;
            results.push(ResultEvent::message(
                format!("{name} flies into a rage!"),
                Color::RED,
            ));
            if let Some(line) = boss.take_line(DialogueMoment::Enrage, ctx.rng) {
                results.push(ResultEvent::message(format!("{name}: \"{line}\""), Color::YELLOW));
            }
        }
    }

    // Low-HP bark, once, at a quarter health.
    let low_hp = ctx.entities.get(actor).and_then(|e| {
        let fighter = e.fighter.as_ref()?;
        let boss = e.boss.as_ref()?;
        (!boss.low_hp_line_fired && fighter.hp * 4 <= fighter.max_hp).then_some(())
    });
    if low_hp.is_some()
        && let Some(entity) = ctx.entities.get_mut(actor)
    {
        let name = entity.name.clone();
        if let Some(boss) = entity.boss.as_mut() {
            boss.low_hp_line_fired = true;
            if let Some(line) = boss.take_line(DialogueMoment::LowHp, ctx.rng) {
                results.push(ResultEvent::message(format!("{name}: \"{line}\""), Color::YELLOW));
            }
        }
    }

    results.extend(basic::act(&mut ai.base, actor, target, ctx));
    results
}
