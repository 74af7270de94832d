//! Game state and core simulation types
//!
//! `GameState` is the world aggregate: it owns the character, every level
//! entity and the seeded RNG. Nothing outside the session holds references
//! into it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::{CharacterTuning, Tuning};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Suspended by the player; nothing advances
    Paused,
    /// Character died or fell off the world
    GameOver,
    /// Character reached the goal
    Victory,
}

impl GamePhase {
    /// GameOver and Victory never transition again
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }

    /// How long the presentation should hold the end banner
    pub fn end_sequence_ticks(self) -> Option<u32> {
        use crate::consts::{GAME_OVER_HOLD_TICKS, VICTORY_HOLD_TICKS};
        match self {
            GamePhase::GameOver => Some(GAME_OVER_HOLD_TICKS),
            GamePhase::Victory => Some(VICTORY_HOLD_TICKS),
            _ => None,
        }
    }
}

/// Something that happened during a tick, in the order it happened
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Character jumped or bounced off an enemy
    Jumped,
    /// A question block released an item
    ItemSpawned { kind: ItemKind, pos: Vec2 },
    /// Recovery or Confusion was consumed
    ItemPickedUp { kind: ItemKind },
    /// Character landed on an enemy
    EnemyStomped { id: u32, remaining_health: i32 },
    EnemyKilled { id: u32 },
    CharacterDamaged { amount: i32 },
    BuffApplied { kind: ItemKind },
    BuffExpired,
    GameOver,
    Victory,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub rect: Rect,
    /// Pixels per tick
    pub vel: Vec2,
    pub on_ground: bool,
    /// Jumps since the last ground contact
    pub jump_count: u8,
    /// Jump key state last tick (jumps trigger on the rising edge)
    pub jump_held: bool,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    /// Negative = upward
    pub jump_strength: f32,
    pub jump_damage: i32,
    pub immune_to_damage: bool,
    pub is_game_over: bool,
}

impl Character {
    pub fn new(tuning: &Tuning) -> Self {
        let c = &tuning.character;
        let size = c.size_blocks * tuning.world.block_size;
        let spawn_y =
            tuning.world.screen_height - c.spawn_rows_from_bottom as f32 * tuning.world.block_size;
        Self {
            rect: Rect::new(c.spawn_x, spawn_y, size, size),
            vel: Vec2::ZERO,
            on_ground: false,
            jump_count: 0,
            jump_held: false,
            health: c.max_health,
            max_health: c.max_health,
            speed: c.speed,
            jump_strength: c.jump_strength,
            jump_damage: c.jump_damage,
            immune_to_damage: false,
            is_game_over: false,
        }
    }

    /// Restore every stat a buff can modify
    pub fn reset_effects(&mut self, baseline: &CharacterTuning) {
        self.speed = baseline.speed;
        self.jump_strength = baseline.jump_strength;
        self.immune_to_damage = false;
        self.jump_damage = baseline.jump_damage;
    }

    /// Apply a heal (positive) or damage (negative), clamped to
    /// `[0, max_health]`. Returns the change actually applied.
    pub fn update_health(&mut self, delta: i32) -> i32 {
        let before = self.health;
        self.health = self.health.saturating_add(delta).clamp(0, self.max_health);
        if self.health == 0 {
            self.is_game_over = true;
        }
        self.health - before
    }

    /// Launch upward with the current jump strength
    pub fn launch(&mut self) {
        self.vel.y = self.jump_strength;
        self.on_ground = false;
    }
}

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// Ground stratum; `surface` marks the top (grass) layer
    Ground { surface: bool },
    Brick,
    /// Releases one item when landed on, then disappears
    Question { is_hit: bool },
}

/// Result of a question block's one-shot hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHit {
    pub item: ItemKind,
    pub pos: Vec2,
}

/// A static block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub kind: BlockKind,
    pub rect: Rect,
}

impl Block {
    /// Consumed question blocks stop colliding immediately
    pub fn is_solid(&self) -> bool {
        !matches!(self.kind, BlockKind::Question { is_hit: true })
    }

    /// Trigger a question block. Only the first call on an unhit question
    /// block does anything.
    pub fn hit<R: Rng>(&mut self, rng: &mut R) -> Option<BlockHit> {
        match self.kind {
            BlockKind::Question { is_hit: false } => {
                self.kind = BlockKind::Question { is_hit: true };
                let item = ItemKind::ALL[rng.random_range(0..ItemKind::ALL.len())];
                Some(BlockHit {
                    item,
                    pos: self.rect.pos,
                })
            }
            _ => None,
        }
    }
}

/// Enemy archetypes; the tier scales health, patrol range, speed and
/// contact damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Mushroom,
    Robot,
    Orc,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Mushroom, EnemyKind::Robot, EnemyKind::Orc];

    pub fn tier(self) -> i32 {
        match self {
            EnemyKind::Mushroom => 1,
            EnemyKind::Robot => 2,
            EnemyKind::Orc => 3,
        }
    }
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub rect: Rect,
    /// Right end of the patrol
    pub initial_x: f32,
    pub movement_range: f32,
    /// Pixels per tick
    pub speed: f32,
    pub max_health: i32,
    pub current_health: i32,
    /// -1 = left, +1 = right
    pub direction: i8,
    /// Set after this enemy's first contact hit and never cleared
    pub has_hit_character: bool,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, block_size: f32) -> Self {
        let tier = kind.tier();
        Self {
            id,
            kind,
            rect: Rect::from_pos_size(pos, Vec2::splat(block_size)),
            initial_x: pos.x,
            movement_range: 100.0 * tier as f32,
            speed: tier as f32 * 0.75 * 2.0,
            max_health: tier,
            current_health: tier,
            direction: 1,
            has_hit_character: false,
        }
    }

    /// Returns true if this hit killed the enemy
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.current_health = self.current_health.saturating_sub(damage);
        !self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Contact damage scales with what's left of the enemy
    pub fn contact_damage(&self) -> i32 {
        self.current_health.max(0)
    }
}

/// Item effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    HighJump,
    SpeedUp,
    MuscleUp,
    IronBody,
    Recovery,
    Confusion,
}

impl ItemKind {
    pub const ALL: [ItemKind; 6] = [
        ItemKind::HighJump,
        ItemKind::SpeedUp,
        ItemKind::MuscleUp,
        ItemKind::IronBody,
        ItemKind::Confusion,
        ItemKind::Recovery,
    ];

    /// Timed buffs are exclusive; instant items are not
    pub fn is_buff(self) -> bool {
        matches!(
            self,
            ItemKind::HighJump | ItemKind::SpeedUp | ItemKind::MuscleUp | ItemKind::IronBody
        )
    }
}

/// A pickup released by a question block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub rect: Rect,
    /// Compacted away at the end of the tick
    pub consumed: bool,
}

/// The level exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: u32,
    pub rect: Rect,
}

/// Background decoration, never collides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub id: u32,
    pub rect: Rect,
}

/// The single timed buff slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub active: bool,
    pub remaining_ticks: u32,
    /// Which buff is running, for the HUD
    pub kind: Option<ItemKind>,
}

/// Complete session state (deterministic given seed, tuning and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Every random draw in the session comes from here
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub character: Character,
    /// Static blocks (sorted by id)
    pub blocks: Vec<Block>,
    /// Live enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Spawned items (sorted by id)
    pub items: Vec<Item>,
    pub clouds: Vec<Cloud>,
    pub goal: Goal,
    pub effects: StatusEffects,
    /// Horizontal scroll offset in world pixels
    pub camera_x: f32,
    /// Clouds spawned after level generation
    pub clouds_spawned: u32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// A world holding only the character and the goal. The level generator
    /// fills in the rest.
    pub fn empty(seed: u64, tuning: &Tuning) -> Self {
        let world = &tuning.world;
        let goal_size = tuning.level.goal_size_blocks * world.block_size;
        let goal_pos = crate::grid_to_world(
            tuning.level.goal_col,
            tuning.level.goal_rows_from_bottom,
            world.block_size,
            world.screen_height,
        );

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            character: Character::new(tuning),
            blocks: Vec::new(),
            enemies: Vec::new(),
            items: Vec::new(),
            clouds: Vec::new(),
            goal: Goal {
                id: 0,
                rect: Rect::from_pos_size(goal_pos, Vec2::splat(goal_size)),
            },
            effects: StatusEffects::default(),
            camera_x: 0.0,
            clouds_spawned: 0,
            next_id: 1,
        };
        state.goal.id = state.next_entity_id();
        state
    }

    /// Create a new session with a generated level
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut state = Self::empty(seed, tuning);
        super::level::generate_level(&mut state, tuning);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_block(&mut self, kind: BlockKind, rect: Rect) -> u32 {
        let id = self.next_entity_id();
        self.blocks.push(Block { id, kind, rect });
        id
    }

    pub fn push_enemy(&mut self, kind: EnemyKind, pos: Vec2, block_size: f32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, kind, pos, block_size));
        id
    }

    pub fn push_item(&mut self, kind: ItemKind, rect: Rect) -> u32 {
        let id = self.next_entity_id();
        self.items.push(Item {
            id,
            kind,
            rect,
            consumed: false,
        });
        id
    }

    pub fn push_cloud(&mut self, rect: Rect) -> u32 {
        let id = self.next_entity_id();
        self.clouds.push(Cloud { id, rect });
        id
    }

    /// Drop everything marked for removal this tick
    pub fn compact(&mut self) {
        self.blocks.retain(Block::is_solid);
        self.enemies.retain(Enemy::is_alive);
        self.items.retain(|item| !item.consumed);
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.blocks.sort_by_key(|b| b.id);
        self.enemies.sort_by_key(|e| e.id);
        self.items.sort_by_key(|i| i.id);
        self.clouds.sort_by_key(|c| c.id);
    }
}
