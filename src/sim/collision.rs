//! Collision detection and response
//!
//! The tricky part of the platformer: turning overlapping boxes into
//! corrected positions and events. Resolution order within a tick is fixed:
//!
//! 1. blocks, vertical axis (landing, question block hits)
//! 2. blocks, horizontal axis (walls), re-queried after the vertical snap
//! 3. goal
//! 4. enemies (stomp or contact damage)
//!
//! Detection is discrete per tick. At the speeds involved a character
//! cannot skip across a whole block in one tick, so no sweeping is done.

use glam::Vec2;

use super::rect::{Rect, overlapping};
use super::state::{GameEvent, GameState, ItemKind};
use crate::tuning::Tuning;

/// Whether the rest of the tick should run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    GoalReached,
}

/// Run every collision step in order
pub fn resolve_collisions(
    state: &mut GameState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> Resolution {
    resolve_blocks_vertical(state, tuning, events);
    resolve_blocks_horizontal(state);

    if state.character.rect.overlaps(&state.goal.rect) {
        return Resolution::GoalReached;
    }

    resolve_enemies(state, tuning, events);
    Resolution::Continue
}

fn solid_block_hits(state: &GameState) -> Vec<usize> {
    overlapping(&state.character.rect, &state.blocks, |b| {
        b.is_solid().then_some(&b.rect)
    })
}

/// Land on anything the character is falling into. Landing on an unhit
/// question block releases its item; buff items also bounce the character.
pub fn resolve_blocks_vertical(
    state: &mut GameState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    let hits = solid_block_hits(state);
    let mut spawned: Vec<(ItemKind, Vec2)> = Vec::new();

    for &idx in &hits {
        let character = &mut state.character;
        if character.vel.y <= 0.0 {
            continue;
        }

        let block = &mut state.blocks[idx];
        character.on_ground = true;
        character.rect.set_bottom(block.rect.top());
        character.vel.y = 0.0;

        if let Some(hit) = block.hit(&mut state.rng) {
            log::debug!("Question block {} released {:?}", block.id, hit.item);
            spawned.push((hit.item, hit.pos));
            events.push(GameEvent::ItemSpawned {
                kind: hit.item,
                pos: hit.pos,
            });
            if hit.item.is_buff() {
                character.launch();
            }
        }
    }

    if hits.is_empty() {
        state.character.on_ground = false;
    }

    let block_size = tuning.world.block_size;
    for (kind, pos) in spawned {
        state.push_item(kind, Rect::from_pos_size(pos, Vec2::splat(block_size)));
    }
}

/// Push the character out of walls it walked into
pub fn resolve_blocks_horizontal(state: &mut GameState) {
    let hits = solid_block_hits(state);
    let character = &mut state.character;

    for idx in hits {
        let block = &state.blocks[idx].rect;
        if character.vel.x > 0.0 {
            character.rect.set_right(block.left());
        } else if character.vel.x < 0.0 {
            character.rect.set_left(block.right());
        }
    }
}

/// Stomp enemies from above; take contact damage otherwise
pub fn resolve_enemies(state: &mut GameState, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    let character = &mut state.character;

    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        if !character.rect.overlaps(&enemy.rect) {
            continue;
        }

        let from_above =
            character.vel.y > 0.0 && character.rect.bottom() <= enemy.rect.bottom();

        if from_above {
            let killed = enemy.take_damage(character.jump_damage);
            character.vel.y = character.jump_strength;
            events.push(GameEvent::EnemyStomped {
                id: enemy.id,
                remaining_health: enemy.current_health.max(0),
            });
            events.push(GameEvent::Jumped);
            if killed {
                log::debug!("Enemy {} ({:?}) killed", enemy.id, enemy.kind);
                events.push(GameEvent::EnemyKilled { id: enemy.id });
            }
        } else if !enemy.has_hit_character && !character.immune_to_damage {
            let amount = enemy.contact_damage();
            character.update_health(-amount);
            character.vel.y = tuning.character.knockback;
            character.on_ground = false;
            enemy.has_hit_character = true;
            events.push(GameEvent::CharacterDamaged { amount });
        }
    }
}
