//! Enemy-phase scheduler.
//!
//! Iterates non-player actors in stable id order, sequencing each slot as:
//! status turn-start hooks, hard-stop checks (paralysis, fear),
//! regeneration, the AI decision, then status turn-end hooks with DOT
//! routed through the shared death pipeline. An actor killed earlier in
//! the phase is skipped; actors spawned during the phase wait for the next
//! one.

use crate::ai;
use crate::combat::{apply_damage, apply_modifier, finalize_death};
use crate::engine::{GameEngine, ResultEvent, TurnCtx};
use crate::map::FovMap;
use crate::state::{Color, EntityId};

impl GameEngine<'_> {
    /// Run one full enemy phase and advance the global turn counter.
    pub fn enemy_phase(&mut self, fov: &FovMap) -> Vec<ResultEvent> {
        let mut all_results = Vec::new();

        // Snapshot the roster: spawns during the phase act next phase.
        let roster: Vec<EntityId> = self
            .state
            .entities
            .ids_sorted()
            .into_iter()
            .filter(|&id| id != EntityId::PLAYER)
            .filter(|&id| {
                self.state
                    .entities
                    .get(id)
                    .is_some_and(|e| e.ai.is_some())
            })
            .collect();

        for actor in roster {
            let results = self.actor_slot(actor, fov);
            all_results.extend(results);
        }

        let hazard_results = self.tick_hazards(fov);
        all_results.extend(hazard_results);

        self.state.turn += 1;
        self.publish(&all_results);
        all_results
    }

    /// One actor's slot within the phase.
    fn actor_slot(&mut self, actor: EntityId, fov: &FovMap) -> Vec<ResultEvent> {
        let mut results = Vec::new();
        let mut ctx = self.turn_ctx(fov);

        // Killed earlier in this phase, or otherwise gone.
        let Some(entity) = ctx.entities.get(actor) else {
            return results;
        };
        if entity.ai.is_none() {
            return results;
        }
        if entity.fighter.is_none() {
            // An actor with a brain but no body is a content bug; abort the
            // turn and keep the phase going.
            let err = crate::error::EngineError::MissingComponent {
                entity: actor,
                component: "fighter",
            };
            tracing::error!(
                target: "barrow_core::engine",
                severity = err.severity().as_str(),
                "{err}"
            );
            return results;
        }
        if !entity.is_alive() {
            return results;
        }
        let name = entity.name.clone();

        // 1. Status turn-start hooks.
        let mut skip_turn = false;
        if let Some(entity) = ctx.entities.get_mut(actor)
            && let Some(statuses) = entity.statuses.as_mut()
        {
            let start = statuses.process_turn_start();
            if start.skip_turn {
                skip_turn = true;
                results.push(ResultEvent::message(
                    format!("{name} moves sluggishly and loses the turn."),
                    Color::VIOLET,
                ));
            }
        }

        // 2. Hard stops: paralysis skips, fear flees.
        let mut feared = false;
        if !skip_turn
            && let Some(entity) = ctx.entities.get(actor)
        {
            if entity.has_status("paralysis") {
                skip_turn = true;
                results.push(ResultEvent::message(
                    format!("{name} is paralyzed!"),
                    Color::VIOLET,
                ));
            } else if entity.has_status("fear") {
                feared = true;
            }
        }

        if !skip_turn {
            // Regeneration ticks before the decision.
            if let Some(entity) = ctx.entities.get_mut(actor)
                && let Some(fighter) = entity.fighter.as_mut()
                && fighter.regeneration > 0
            {
                fighter.heal(fighter.regeneration);
            }

            // 3-4. Target and AI decision.
            if feared {
                results.extend(ai::flee_turn(&mut ctx, actor, EntityId::PLAYER));
            } else {
                let taken = ctx
                    .entities
                    .get_mut(actor)
                    .and_then(|e| e.ai.take());
                if let Some(mut ai_state) = taken {
                    results.extend(ai_state.take_turn(actor, EntityId::PLAYER, &mut ctx));
                    // Restore unless death finalization dismantled the slot.
                    if let Some(entity) = ctx.entities.get_mut(actor)
                        && entity.corpse.is_none()
                        && entity.ai.is_none()
                    {
                        entity.ai = Some(ai_state);
                    }
                }
            }
        }

        // 5. Status turn-end hooks: DOT, duration decrement, expiry.
        results.extend(Self::status_turn_end(&mut ctx, actor));

        results
    }

    /// Turn-end status processing for one actor; DOT deaths finalize
    /// through the same pipeline as combat deaths.
    fn status_turn_end(ctx: &mut TurnCtx<'_>, actor: EntityId) -> Vec<ResultEvent> {
        let mut results = Vec::new();

        let Some(entity) = ctx.entities.get_mut(actor) else {
            return results;
        };
        let name = entity.name.clone();
        let Some(statuses) = entity.statuses.as_mut() else {
            return results;
        };
        let end = statuses.process_turn_end();

        for expired in &end.expired {
            results.push(ResultEvent::message(
                format!("The {expired} afflicting {name} wears off."),
                Color::GREY,
            ));
        }

        for (kind, amount, source) in end.dot {
            let (dealt, hp) = {
                let Some(entity) = ctx.entities.get_mut(actor) else {
                    break;
                };
                let Some(fighter) = entity.fighter.as_mut() else {
                    break;
                };
                let dealt = apply_modifier(amount, kind, &fighter.resistances);
                let hp = apply_damage(fighter, dealt);
                (dealt, hp)
            };
            results.push(ResultEvent::message(
                format!("{name} suffers {dealt} damage from {source}."),
                Color::SICKLY_GREEN,
            ));
            results.push(ResultEvent::Damage {
                target: actor,
                amount: dealt,
                kind,
            });
            if hp <= 0 {
                results.extend(finalize_death(ctx, actor, None));
                break;
            }
        }

        results
    }

    /// Hazard fields burn whoever stands in them, then decay.
    fn tick_hazards(&mut self, fov: &FovMap) -> Vec<ResultEvent> {
        let mut results = Vec::new();
        let mut ctx = self.turn_ctx(fov);

        let hazards: Vec<(EntityId, crate::state::Position, crate::components::Hazard)> = ctx
            .entities
            .iter()
            .filter_map(|e| {
                let hazard = e.hazard.clone()?;
                Some((e.id, e.position?, hazard))
            })
            .collect();

        for (hazard_id, pos, hazard) in hazards {
            let victims: Vec<EntityId> = ctx
                .entities
                .iter()
                .filter(|e| e.position == Some(pos) && e.fighter.is_some() && e.is_alive())
                .map(|e| e.id)
                .collect();
            for victim in victims {
                let (name, dealt, hp) = {
                    let Some(entity) = ctx.entities.get_mut(victim) else {
                        continue;
                    };
                    let name = entity.name.clone();
                    let Some(fighter) = entity.fighter.as_mut() else {
                        continue;
                    };
                    let dealt = apply_modifier(hazard.damage_per_turn, hazard.kind, &fighter.resistances);
                    let hp = apply_damage(fighter, dealt);
                    (name, dealt, hp)
                };
                results.push(ResultEvent::message(
                    format!("{name} is seared by the {}!", hazard.kind),
                    Color::ORANGE,
                ));
                results.push(ResultEvent::Damage {
                    target: victim,
                    amount: dealt,
                    kind: hazard.kind,
                });
                if hp <= 0 {
                    results.extend(finalize_death(&mut ctx, victim, None));
                }
            }

            // Decay.
            let expired = {
                let Some(entity) = ctx.entities.get_mut(hazard_id) else {
                    continue;
                };
                let Some(h) = entity.hazard.as_mut() else {
                    continue;
                };
                h.turns_remaining -= 1;
                h.turns_remaining <= 0
            };
            if expired {
                ctx.entities.remove(hazard_id);
            }
        }

        results
    }
}
