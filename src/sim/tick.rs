//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. Order
//! within a tick: physics, collisions, item pickups, buff timer, terminal
//! checks, camera, cloud spawning, compaction.

use super::collision::{Resolution, resolve_collisions};
use super::effects::{collect_items, update_timer};
use super::level::maybe_spawn_cloud;
use super::physics::{Horizontal, step_character, step_enemy};
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left is held
    pub left: bool,
    /// Move right is held
    pub right: bool,
    /// Jump is held; the character reacts to the press, not the hold
    pub jump: bool,
}

impl TickInput {
    pub fn horizontal(&self) -> Horizontal {
        Horizontal::from_keys(self.left, self.right)
    }
}

/// Advance the game state by one fixed timestep and return what happened.
///
/// Ticking while paused or after the session has ended does nothing.
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_ticks += 1;

    // Physics
    step_character(
        &mut state.character,
        input.horizontal(),
        input.jump,
        &tuning.character,
        tuning.world.screen_height,
        &mut events,
    );
    for enemy in &mut state.enemies {
        step_enemy(enemy);
    }

    // Collisions
    if resolve_collisions(state, tuning, &mut events) == Resolution::GoalReached {
        enter_terminal(state, GamePhase::Victory, &mut events);
        state.compact();
        return events;
    }

    // Items and buffs
    collect_items(state, &tuning.effects, &mut events);
    update_timer(state, &tuning.character, &mut events);

    check_health_invariant(state);

    if state.character.is_game_over {
        enter_terminal(state, GamePhase::GameOver, &mut events);
        state.compact();
        return events;
    }

    update_camera(state, tuning);
    maybe_spawn_cloud(state, tuning);

    state.compact();
    // Ensure deterministic ordering
    state.normalize_order();
    events
}

/// Suspend or resume the simulation. Returns true if the phase changed.
pub fn set_paused(state: &mut GameState, paused: bool) -> bool {
    let next = match (state.phase, paused) {
        (GamePhase::Playing, true) => GamePhase::Paused,
        (GamePhase::Paused, false) => GamePhase::Playing,
        _ => return false,
    };
    log::info!("{:?} -> {:?}", state.phase, next);
    state.phase = next;
    true
}

fn enter_terminal(state: &mut GameState, phase: GamePhase, events: &mut Vec<GameEvent>) {
    debug_assert!(!state.phase.is_terminal(), "terminal phase entered twice");
    if state.phase.is_terminal() {
        return;
    }
    log::info!("Session ended: {:?} after {} ticks", phase, state.time_ticks);
    state.phase = phase;
    events.push(match phase {
        GamePhase::Victory => GameEvent::Victory,
        _ => GameEvent::GameOver,
    });
}

fn check_health_invariant(state: &mut GameState) {
    let c = &mut state.character;
    debug_assert!(
        (0..=c.max_health).contains(&c.health),
        "health {} outside 0..={}",
        c.health,
        c.max_health
    );
    c.health = c.health.clamp(0, c.max_health);
    if c.health == 0 {
        c.is_game_over = true;
    }
}

/// Keep the character inside the camera's follow zone
pub fn update_camera(state: &mut GameState, tuning: &Tuning) {
    let w = &tuning.world;
    let rect = &state.character.rect;
    let right_edge = w.screen_width * w.camera_right_ratio;
    let left_edge = w.screen_width * w.camera_left_ratio;

    if rect.right() > right_edge {
        state.camera_x = rect.right() - right_edge;
    } else if rect.left() < left_edge {
        state.camera_x = rect.left() - left_edge;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::state::{BlockKind, EnemyKind};
    use glam::Vec2;
    use proptest::prelude::*;

    /// Flat floor under the spawn point, goal far away
    fn flat_world() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::empty(11, &tuning);
        let top = tuning.ground_top_y();
        for col in -2..40 {
            state.push_block(
                BlockKind::Ground { surface: true },
                Rect::new(col as f32 * 64.0, top, 64.0, 64.0),
            );
        }
        state.goal.rect.pos = Vec2::new(1e6, 0.0);
        state.character.rect.set_bottom(top);
        state.character.on_ground = true;
        (state, tuning)
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn jump() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_standing_stays_grounded() {
        let (mut state, tuning) = flat_world();
        let y = state.character.rect.top();
        for _ in 0..120 {
            assert_eq!(state.character.vel.y, 0.0);
            tick(&mut state, &idle(), &tuning);
            assert!(state.character.on_ground);
        }
        assert_eq!(state.character.rect.top(), y);
    }

    #[test]
    fn test_double_jump_scenario() {
        let (mut state, tuning) = flat_world();

        let events = tick(&mut state, &jump(), &tuning);
        assert_eq!(events, vec![GameEvent::Jumped]);
        assert_eq!(state.character.jump_count, 1);
        assert!(!state.character.on_ground);

        tick(&mut state, &idle(), &tuning);
        let events = tick(&mut state, &jump(), &tuning);
        assert_eq!(events, vec![GameEvent::Jumped]);
        assert_eq!(state.character.jump_count, 2);

        tick(&mut state, &idle(), &tuning);
        let events = tick(&mut state, &jump(), &tuning);
        assert!(events.is_empty());
        assert_eq!(state.character.jump_count, 2);

        // Land again and the counter resets
        for _ in 0..200 {
            tick(&mut state, &idle(), &tuning);
        }
        assert!(state.character.on_ground);
        let events = tick(&mut state, &jump(), &tuning);
        assert_eq!(events, vec![GameEvent::Jumped]);
    }

    #[test]
    fn test_lethal_contact_fires_game_over_once() {
        let (mut state, tuning) = flat_world();
        let x = state.character.rect.right() + 10.0;
        let y = tuning.ground_top_y() - 64.0;
        state.push_enemy(EnemyKind::Orc, Vec2::new(x, y), 64.0);
        state.enemies[0].current_health = 1200;
        state.enemies[0].speed = 0.0;
        state.character.rect.pos.x += 20.0;

        let events = tick(&mut state, &idle(), &tuning);
        assert_eq!(
            events,
            vec![GameEvent::CharacterDamaged { amount: 1200 }, GameEvent::GameOver]
        );
        assert_eq!(state.character.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);

        assert!(tick(&mut state, &idle(), &tuning).is_empty());
    }

    #[test]
    fn test_goal_ends_session() {
        let (mut state, tuning) = flat_world();
        state.goal.rect = Rect::new(
            state.character.rect.right() + 2.0,
            0.0,
            384.0,
            tuning.ground_top_y(),
        );
        let right = TickInput {
            right: true,
            ..Default::default()
        };

        let events = tick(&mut state, &right, &tuning);
        assert_eq!(events, vec![GameEvent::Victory]);
        assert_eq!(state.phase, GamePhase::Victory);

        let before = state.character.rect;
        assert!(tick(&mut state, &right, &tuning).is_empty());
        assert_eq!(state.character.rect, before);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_falling_off_world() {
        let tuning = Tuning::default();
        let mut state = GameState::empty(1, &tuning);
        state.goal.rect.pos = Vec2::new(1e6, 0.0);
        let mut saw_game_over = 0;
        for _ in 0..600 {
            saw_game_over += tick(&mut state, &idle(), &tuning)
                .iter()
                .filter(|e| **e == GameEvent::GameOver)
                .count();
        }
        assert_eq!(saw_game_over, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let (mut state, tuning) = flat_world();
        state.push_enemy(EnemyKind::Mushroom, Vec2::new(2000.0, 0.0), 64.0);
        assert!(set_paused(&mut state, true));
        assert!(!set_paused(&mut state, true));

        let enemy_x = state.enemies[0].rect.left();
        for _ in 0..10 {
            assert!(tick(&mut state, &jump(), &tuning).is_empty());
        }
        assert_eq!(state.enemies[0].rect.left(), enemy_x);
        assert_eq!(state.time_ticks, 0);

        assert!(set_paused(&mut state, false));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_terminal_cannot_be_paused() {
        let (mut state, _) = flat_world();
        state.phase = GamePhase::Victory;
        assert!(!set_paused(&mut state, true));
        assert!(!set_paused(&mut state, false));
        assert_eq!(state.phase, GamePhase::Victory);
    }

    #[test]
    fn test_camera_follows_right() {
        let (mut state, tuning) = flat_world();
        state.character.rect.pos.x = 2000.0;
        update_camera(&mut state, &tuning);
        assert_eq!(state.camera_x, 2000.0 + 128.0 - 1920.0 * 0.7);
    }

    #[test]
    fn test_camera_follows_left_and_holds_in_dead_zone() {
        let (mut state, tuning) = flat_world();
        state.camera_x = 500.0;
        state.character.rect.pos.x = 1000.0;
        update_camera(&mut state, &tuning);
        assert_eq!(state.camera_x, 500.0);

        state.character.rect.pos.x = 100.0;
        update_camera(&mut state, &tuning);
        assert_eq!(state.camera_x, 100.0 - 1920.0 * 0.3);
    }

    #[test]
    fn test_buff_expires_during_play() {
        let (mut state, tuning) = flat_world();
        state.push_item(
            crate::sim::state::ItemKind::SpeedUp,
            Rect::from_pos_size(state.character.rect.pos, Vec2::splat(64.0)),
        );
        let events = tick(&mut state, &idle(), &tuning);
        assert!(events.contains(&GameEvent::BuffApplied {
            kind: crate::sim::state::ItemKind::SpeedUp
        }));
        assert!(state.items.is_empty());

        let mut expired = 0;
        for _ in 0..400 {
            expired += tick(&mut state, &idle(), &tuning)
                .iter()
                .filter(|e| **e == GameEvent::BuffExpired)
                .count();
        }
        assert_eq!(expired, 1);
        assert_eq!(state.character.speed, tuning.character.speed);
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut a = GameState::new(99999, &tuning);
        let mut b = GameState::new(99999, &tuning);
        let inputs = [
            TickInput { right: true, ..Default::default() },
            TickInput { right: true, jump: true, ..Default::default() },
            TickInput { left: true, ..Default::default() },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            assert_eq!(tick(&mut a, input, &tuning), tick(&mut b, input, &tuning));
        }
        assert_eq!(a.character.rect, b.character.rect);
        assert_eq!(a.clouds.len(), b.clouds.len());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_health_stays_in_bounds(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>()),
                1..300,
            ),
        ) {
            let tuning = Tuning::default();
            let mut state = GameState::new(seed, &tuning);
            for (left, right, jump) in inputs {
                tick(&mut state, &TickInput { left, right, jump }, &tuning);
                let c = &state.character;
                prop_assert!((0..=c.max_health).contains(&c.health));
            }
        }
    }
}
