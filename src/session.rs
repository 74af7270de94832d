//! A play session: the surface a presentation layer drives
//!
//! The presentation samples input, calls [`Session::tick`] once per frame,
//! maps the returned events to sounds/effects and draws
//! [`Session::renderable_state`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::{
    BlockKind, EnemyKind, GameEvent, GamePhase, GameState, ItemKind, TickInput, set_paused, tick,
};
use crate::tuning::{Tuning, TuningError};

/// What to draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderableKind {
    Character,
    Ground { surface: bool },
    Brick,
    QuestionBlock,
    Enemy(EnemyKind),
    Item(ItemKind),
    Goal,
    Cloud,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableEntity {
    pub id: u32,
    /// World position of the top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: RenderableKind,
}

/// Snapshot of everything the presentation needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableState {
    pub phase: GamePhase,
    /// Subtract from world x to get screen x
    pub camera_x: f32,
    /// Draw order: clouds, blocks, items, enemies, goal, character
    pub entities: Vec<RenderableEntity>,
    pub health: i32,
    pub max_health: i32,
    pub buff: Option<ItemKind>,
    pub buff_remaining_ticks: u32,
    /// Remaining buff time as the HUD shows it (tenths of a second)
    pub buff_seconds: f32,
}

/// One run of the game, from spawn to GameOver/Victory
#[derive(Debug, Clone)]
pub struct Session {
    tuning: Tuning,
    state: GameState,
}

impl Session {
    /// Start a run. The tuning is validated first: level generation and
    /// the per-tick cloud roll assume its ranges and probabilities hold.
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        log::info!("Starting session with seed {}", seed);
        let state = GameState::new(seed, &tuning);
        Ok(Self { tuning, state })
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input, &self.tuning)
    }

    /// Returns true if the phase changed
    pub fn set_paused(&mut self, paused: bool) -> bool {
        set_paused(&mut self.state, paused)
    }

    /// Throw the current run away and start a new level
    pub fn reset(&mut self) {
        let seed = self.state.rng.random();
        self.reset_with_seed(seed);
    }

    pub fn reset_with_seed(&mut self, seed: u64) {
        log::info!("Starting session with seed {}", seed);
        self.state = GameState::new(seed, &self.tuning);
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.state.phase.is_terminal()
    }

    pub fn seed(&self) -> u64 {
        self.state.seed
    }

    /// Read-only view of the simulation, for tests and tools
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderable_state(&self) -> RenderableState {
        let s = &self.state;
        let mut entities = Vec::with_capacity(
            s.clouds.len() + s.blocks.len() + s.items.len() + s.enemies.len() + 2,
        );

        let mut push = |id: u32, rect: &crate::sim::Rect, kind: RenderableKind| {
            entities.push(RenderableEntity {
                id,
                pos: rect.pos,
                size: rect.size,
                kind,
            });
        };

        for cloud in &s.clouds {
            push(cloud.id, &cloud.rect, RenderableKind::Cloud);
        }
        for block in &s.blocks {
            let kind = match block.kind {
                BlockKind::Ground { surface } => RenderableKind::Ground { surface },
                BlockKind::Brick => RenderableKind::Brick,
                BlockKind::Question { .. } => RenderableKind::QuestionBlock,
            };
            push(block.id, &block.rect, kind);
        }
        for item in &s.items {
            push(item.id, &item.rect, RenderableKind::Item(item.kind));
        }
        for enemy in &s.enemies {
            push(enemy.id, &enemy.rect, RenderableKind::Enemy(enemy.kind));
        }
        push(s.goal.id, &s.goal.rect, RenderableKind::Goal);
        // The character is not a level entity; id 0 is reserved for it
        push(0, &s.character.rect, RenderableKind::Character);

        RenderableState {
            phase: s.phase,
            camera_x: s.camera_x,
            entities,
            health: s.character.health,
            max_health: s.character.max_health,
            buff: s.effects.kind,
            buff_remaining_ticks: s.effects.remaining_ticks,
            buff_seconds: crate::ticks_to_display_seconds(s.effects.remaining_ticks),
        }
    }
}
