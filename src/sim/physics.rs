//! Character motion and enemy patrol
//!
//! Runs first in every tick, before any collision is resolved.

use super::state::{Character, Enemy, GameEvent};
use crate::tuning::CharacterTuning;

/// Horizontal intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Horizontal {
    Left,
    Right,
    #[default]
    None,
}

impl Horizontal {
    /// Left wins when both directions are held
    pub fn from_keys(left: bool, right: bool) -> Self {
        if left {
            Horizontal::Left
        } else if right {
            Horizontal::Right
        } else {
            Horizontal::None
        }
    }
}

/// Advance the character by one tick: input, jump, gravity, integration.
///
/// `jump_down` is the held state of the jump key; a jump only triggers on the
/// tick the key goes down. `bottom_bound` is the y past which the character
/// has fallen out of the world.
pub fn step_character(
    character: &mut Character,
    horizontal: Horizontal,
    jump_down: bool,
    baseline: &CharacterTuning,
    bottom_bound: f32,
    events: &mut Vec<GameEvent>,
) {
    character.vel.x = match horizontal {
        Horizontal::Left => -character.speed,
        Horizontal::Right => character.speed,
        Horizontal::None => 0.0,
    };

    if character.on_ground {
        character.vel.y = 0.0;
        character.jump_count = 0;
    }

    let rising_edge = jump_down && !character.jump_held;
    if rising_edge && can_jump(character, baseline.max_jumps) {
        character.launch();
        character.jump_count += 1;
        events.push(GameEvent::Jumped);
    }
    character.jump_held = jump_down;

    character.vel.y += baseline.gravity;
    character.rect.pos.y += character.vel.y;
    character.rect.pos.x += character.vel.x;

    if character.rect.top() > bottom_bound {
        if !character.is_game_over {
            log::debug!("Character fell out of the world at x={}", character.rect.left());
        }
        character.is_game_over = true;
    }
}

/// The first jump needs ground under the character; later ones only need a
/// jump to have started the current airtime.
fn can_jump(character: &Character, max_jumps: u8) -> bool {
    character.jump_count < max_jumps && (character.on_ground || character.jump_count > 0)
}

/// Move an enemy along its patrol, turning at either end
pub fn step_enemy(enemy: &mut Enemy) {
    enemy.rect.pos.x += enemy.speed * enemy.direction as f32;
    if enemy.rect.left() <= enemy.initial_x - enemy.movement_range {
        enemy.direction = 1;
    } else if enemy.rect.left() >= enemy.initial_x {
        enemy.direction = -1;
    }
}
