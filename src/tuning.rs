//! Data-driven game balance
//!
//! Every gameplay constant lives here with defaults matching the shipped
//! game. A tuning file only needs the fields it overrides.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Why a tuning document was rejected
#[derive(Debug)]
pub enum TuningError {
    /// The document is not valid JSON for this schema
    Parse(serde_json::Error),
    /// The values parse but cannot produce a playable level
    Invalid(&'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "failed to parse tuning: {err}"),
            TuningError::Invalid(reason) => write!(f, "invalid tuning: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}

/// Viewport and grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub screen_width: f32,
    pub screen_height: f32,
    pub block_size: f32,
    /// Camera starts following once the character's right edge passes this
    /// fraction of the screen width
    pub camera_right_ratio: f32,
    /// ...or its left edge drops below this fraction
    pub camera_left_ratio: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            block_size: BLOCK_SIZE,
            camera_right_ratio: 0.7,
            camera_left_ratio: 0.3,
        }
    }
}

/// Player character baseline stats. Buffs are always reset back to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterTuning {
    /// Spawn x in pixels
    pub spawn_x: f32,
    /// Spawn row, counted in blocks up from the bottom of the screen
    pub spawn_rows_from_bottom: i32,
    /// Width and height in blocks
    pub size_blocks: f32,
    pub speed: f32,
    pub gravity: f32,
    pub jump_strength: f32,
    pub max_jumps: u8,
    pub max_health: i32,
    pub jump_damage: i32,
    /// Vertical velocity applied when an enemy lands a contact hit
    pub knockback: f32,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            spawn_x: 100.0,
            spawn_rows_from_bottom: 7,
            size_blocks: 2.0,
            speed: 5.0,
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            max_jumps: MAX_JUMPS,
            max_health: 1000,
            jump_damage: 1,
            knockback: -2.0,
        }
    }
}

/// Item effect magnitudes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub buff_duration_ticks: u32,
    pub high_jump_strength: f32,
    pub speed_up_speed: f32,
    pub muscle_up_jump_damage: i32,
    pub recovery_amount: i32,
    pub confusion_damage: i32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            buff_duration_ticks: BUFF_DURATION_TICKS,
            high_jump_strength: -20.0,
            speed_up_speed: 7.5,
            muscle_up_jump_damage: 10,
            recovery_amount: 100,
            confusion_damage: 200,
        }
    }
}

/// Level layout parameters. Columns are in blocks from the world origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub ground_first_col: i32,
    pub ground_last_col: i32,
    /// A gap opens at every multiple of the stride...
    pub ground_stride_cols: i32,
    /// ...and is this many columns wide
    pub ground_gap_cols: i32,
    pub ground_gap_count: i32,
    pub ground_strata: i32,

    /// Inclusive range for the first obstacle column
    pub obstacle_first_col: (i32, i32),
    /// Inclusive range for the step between obstacles
    pub obstacle_spacing_cols: (i32, i32),
    pub obstacle_last_col: i32,
    /// Probability an obstacle is a question block rather than a brick
    pub question_block_chance: f64,

    pub enemy_first_col: i32,
    pub enemy_last_col: i32,
    pub enemy_stride_cols: i32,
    pub enemy_rows_from_bottom: i32,

    pub initial_clouds: u32,
    /// Per-tick probability of a cloud spawn attempt
    pub cloud_spawn_chance: f64,
    /// Inclusive range the incremental cloud cap is rolled from
    pub cloud_cap: (u32, u32),

    pub goal_col: i32,
    pub goal_rows_from_bottom: i32,
    pub goal_size_blocks: f32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            ground_first_col: -6,
            ground_last_col: 400,
            ground_stride_cols: 50,
            ground_gap_cols: 5,
            ground_gap_count: 5,
            ground_strata: 3,

            obstacle_first_col: (5, 15),
            obstacle_spacing_cols: (5, 15),
            obstacle_last_col: 290,
            question_block_chance: 0.5,

            enemy_first_col: 9,
            enemy_last_col: 275,
            enemy_stride_cols: 17,
            enemy_rows_from_bottom: 4,

            initial_clouds: 7,
            cloud_spawn_chance: 0.02,
            cloud_cap: (10, 15),

            goal_col: 300,
            goal_rows_from_bottom: 9,
            goal_size_blocks: 6.0,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub character: CharacterTuning,
    pub effects: EffectTuning,
    pub level: LevelTuning,
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse a tuning document, falling back to defaults if it is rejected
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(err) => {
                log::warn!("{err}; using default tuning");
                Self::default()
            }
        }
    }

    /// Top edge (y) of the obstacle band
    pub fn obstacle_min_y(&self) -> f32 {
        (self.world.screen_height / 2.0).floor()
    }

    /// Lowest top edge (y) an obstacle may have
    pub fn obstacle_max_y(&self) -> f32 {
        self.world.screen_height - 5.0 * self.world.block_size
    }

    /// Top edge of the highest ground stratum
    pub fn ground_top_y(&self) -> f32 {
        self.world.screen_height - self.level.ground_strata as f32 * self.world.block_size
    }

    /// Reject values the generator or simulation cannot honour
    pub fn validate(&self) -> Result<(), TuningError> {
        let w = &self.world;
        let c = &self.character;
        let l = &self.level;

        if w.screen_width <= 0.0 || w.screen_height <= 0.0 || w.block_size <= 0.0 {
            return Err(TuningError::Invalid("world dimensions must be positive"));
        }
        if c.size_blocks <= 0.0 || c.max_health <= 0 || c.max_jumps == 0 {
            return Err(TuningError::Invalid("character size, health and jumps must be positive"));
        }
        if c.gravity <= 0.0 || c.jump_strength >= 0.0 {
            return Err(TuningError::Invalid("gravity must pull down and jumps must push up"));
        }
        if self.effects.buff_duration_ticks == 0 {
            return Err(TuningError::Invalid("buff duration must be at least one tick"));
        }
        if l.ground_strata <= 0
            || l.ground_stride_cols <= 0
            || l.ground_gap_cols >= l.ground_stride_cols
        {
            return Err(TuningError::Invalid("ground gaps must be narrower than the stride"));
        }
        if l.obstacle_first_col.0 > l.obstacle_first_col.1
            || l.obstacle_spacing_cols.0 > l.obstacle_spacing_cols.1
            || l.cloud_cap.0 > l.cloud_cap.1
        {
            return Err(TuningError::Invalid("random ranges must not be empty"));
        }
        // One block of spacing keeps neighbouring obstacles from overlapping
        if l.obstacle_spacing_cols.0 < 1 {
            return Err(TuningError::Invalid("obstacle spacing must be at least one column"));
        }
        if l.enemy_stride_cols <= 0 {
            return Err(TuningError::Invalid("enemy stride must be positive"));
        }
        if !(0.0..=1.0).contains(&l.question_block_chance)
            || !(0.0..=1.0).contains(&l.cloud_spawn_chance)
        {
            return Err(TuningError::Invalid("probabilities must be within 0..=1"));
        }
        if self.obstacle_min_y() > self.obstacle_max_y() {
            return Err(TuningError::Invalid("screen too short for the obstacle band"));
        }
        if self.obstacle_max_y() + w.block_size > self.ground_top_y() {
            return Err(TuningError::Invalid("obstacle band overlaps the ground"));
        }
        if l.obstacle_last_col >= l.goal_col {
            return Err(TuningError::Invalid("obstacles must end before the goal"));
        }
        Ok(())
    }
}
