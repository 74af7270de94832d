//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod effects;
pub mod level;
pub mod physics;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Resolution, resolve_collisions};
pub use effects::{apply_effect, collect_items, update_timer};
pub use level::{generate_level, maybe_spawn_cloud};
pub use physics::{Horizontal, step_character, step_enemy};
pub use rect::Rect;
pub use state::{
    Block, BlockHit, BlockKind, Character, Cloud, Enemy, EnemyKind, GameEvent, GamePhase,
    GameState, Goal, Item, ItemKind, StatusEffects,
};
pub use tick::{TickInput, set_paused, tick, update_camera};
