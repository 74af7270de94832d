//! Level generation
//!
//! Structure is fixed, placement is seeded: ground strata with regular gaps,
//! a scattered field of bricks and question blocks, a line of patrolling
//! enemies, and clouds. Every draw comes from the session RNG, so the same
//! seed always produces the same level.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::state::{BlockKind, EnemyKind, GameState};
use crate::grid_to_world;
use crate::tuning::Tuning;

/// Populate an empty world with ground, obstacles, enemies and clouds
pub fn generate_level(state: &mut GameState, tuning: &Tuning) {
    generate_ground(state, tuning);
    generate_initial_clouds(state, tuning);
    generate_obstacles(state, tuning);
    generate_enemies(state, tuning);

    log::info!(
        "Level seed {}: {} blocks, {} enemies, {} clouds",
        state.seed,
        state.blocks.len(),
        state.enemies.len(),
        state.clouds.len()
    );
}

/// True if `col` falls inside one of the ground gaps
pub fn is_ground_gap(col: i32, tuning: &Tuning) -> bool {
    let l = &tuning.level;
    if col < l.ground_stride_cols {
        return false;
    }
    let segment = col / l.ground_stride_cols;
    segment <= l.ground_gap_count && col % l.ground_stride_cols < l.ground_gap_cols
}

/// Stack the ground strata from the bottom up; the top one is the surface
fn generate_ground(state: &mut GameState, tuning: &Tuning) {
    let bs = tuning.world.block_size;
    let strata = tuning.level.ground_strata;

    for stratum in 1..=strata {
        let surface = stratum == strata;
        for col in tuning.level.ground_first_col..tuning.level.ground_last_col {
            if is_ground_gap(col, tuning) {
                continue;
            }
            let pos = grid_to_world(col, stratum, bs, tuning.world.screen_height);
            let rect = Rect::from_pos_size(pos, Vec2::splat(bs));
            state.push_block(BlockKind::Ground { surface }, rect);
        }
    }
}

/// Bricks and question blocks at random spacing and height
fn generate_obstacles(state: &mut GameState, tuning: &Tuning) {
    let bs = tuning.world.block_size;
    let l = &tuning.level;
    let min_y = tuning.obstacle_min_y() as i32;
    let max_y = tuning.obstacle_max_y() as i32;

    let mut col = state.rng.random_range(l.obstacle_first_col.0..=l.obstacle_first_col.1);
    while col <= l.obstacle_last_col {
        let kind = if state.rng.random_bool(l.question_block_chance) {
            BlockKind::Question { is_hit: false }
        } else {
            BlockKind::Brick
        };
        let y = state.rng.random_range(min_y..=max_y) as f32;
        state.push_block(kind, Rect::new(col as f32 * bs, y, bs, bs));

        col += state.rng.random_range(l.obstacle_spacing_cols.0..=l.obstacle_spacing_cols.1);
    }
}

/// One enemy every `enemy_stride_cols`, archetype picked at random
fn generate_enemies(state: &mut GameState, tuning: &Tuning) {
    let bs = tuning.world.block_size;
    let l = &tuning.level;

    let mut col = l.enemy_first_col;
    while col < l.enemy_last_col {
        let kind = EnemyKind::ALL[state.rng.random_range(0..EnemyKind::ALL.len())];
        let pos = grid_to_world(col, l.enemy_rows_from_bottom, bs, tuning.world.screen_height);
        state.push_enemy(kind, pos, bs);
        col += l.enemy_stride_cols;
    }
}

fn generate_initial_clouds(state: &mut GameState, tuning: &Tuning) {
    let w = &tuning.world;
    for _ in 0..tuning.level.initial_clouds {
        let x = state.rng.random_range(0..=w.screen_width as i32) as f32;
        let y = state.rng.random_range(0..=(w.screen_height / 3.0) as i32) as f32;
        state.push_cloud(Rect::new(x, y, w.block_size, w.block_size));
    }
}

/// Maybe add a cloud just past the right edge of the view. Called once per
/// tick; returns the new cloud's id.
pub fn maybe_spawn_cloud(state: &mut GameState, tuning: &Tuning) -> Option<u32> {
    let w = &tuning.world;
    let l = &tuning.level;

    if !state.rng.random_bool(l.cloud_spawn_chance) {
        return None;
    }
    let cap = state.rng.random_range(l.cloud_cap.0..=l.cloud_cap.1);
    if state.clouds_spawned >= cap {
        return None;
    }

    let lead = state.rng.random_range(0..=(w.screen_width * 0.2) as i32) as f32;
    let x = state.camera_x + w.screen_width + lead;
    let y = state.rng.random_range(0..=(w.screen_height / 3.0) as i32) as f32;
    state.clouds_spawned += 1;
    Some(state.push_cloud(Rect::new(x, y, w.block_size, w.block_size)))
}
