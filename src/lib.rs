//! Mighty Action - a side-scrolling platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, effects, game state)
//! - `session`: The interface a presentation layer drives once per frame
//! - `tuning`: Data-driven game balance

pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{RenderableEntity, RenderableKind, RenderableState, Session};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Edge length of one level grid cell, in pixels
    pub const BLOCK_SIZE: f32 = 64.0;

    /// Default playable viewport
    pub const SCREEN_WIDTH: f32 = 1920.0;
    pub const SCREEN_HEIGHT: f32 = 1080.0;

    /// Downward acceleration, pixels/tick²
    pub const GRAVITY: f32 = 0.5;
    /// Jump impulse (negative = upward), pixels/tick
    pub const JUMP_STRENGTH: f32 = -15.0;
    /// Jumps allowed between two ground contacts
    pub const MAX_JUMPS: u8 = 2;

    /// Timed buff duration (5 seconds at 60 ticks/sec)
    pub const BUFF_DURATION_TICKS: u32 = 5 * TICKS_PER_SECOND;

    /// How long the presentation holds the terminal banners
    pub const GAME_OVER_HOLD_TICKS: u32 = 3 * TICKS_PER_SECOND;
    pub const VICTORY_HOLD_TICKS: u32 = 4 * TICKS_PER_SECOND;
}

/// Convert a grid cell (column, row-from-bottom) to the pixel position of its
/// top-left corner
#[inline]
pub fn grid_to_world(col: i32, rows_from_bottom: i32, block_size: f32, world_height: f32) -> Vec2 {
    Vec2::new(
        col as f32 * block_size,
        world_height - rows_from_bottom as f32 * block_size,
    )
}

/// Remaining buff time in tenths of a second, the way the HUD shows it
#[inline]
pub fn ticks_to_display_seconds(ticks: u32) -> f32 {
    (ticks / (consts::TICKS_PER_SECOND / 10)) as f32 / 10.0
}
