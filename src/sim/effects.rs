//! Item effects and the timed buff slot
//!
//! Instant items (Recovery, Confusion) always apply. Buffs share a single
//! timer: while one runs, other buff items stay in the world untouched.

use super::state::{Character, GameEvent, GameState, ItemKind, StatusEffects};
use crate::tuning::{CharacterTuning, EffectTuning};

/// Apply an item's effect to the character
pub fn apply_effect(kind: ItemKind, character: &mut Character, effects: &EffectTuning) {
    match kind {
        ItemKind::HighJump => character.jump_strength = effects.high_jump_strength,
        ItemKind::SpeedUp => character.speed = effects.speed_up_speed,
        ItemKind::MuscleUp => character.jump_damage = effects.muscle_up_jump_damage,
        ItemKind::IronBody => character.immune_to_damage = true,
        ItemKind::Recovery => {
            character.update_health(effects.recovery_amount);
        }
        ItemKind::Confusion => {
            character.update_health(-effects.confusion_damage);
        }
    }
}

impl StatusEffects {
    /// Start the buff timer
    pub fn start(&mut self, kind: ItemKind, duration_ticks: u32) {
        self.active = true;
        self.remaining_ticks = duration_ticks;
        self.kind = Some(kind);
    }

    /// Count down one tick. Returns true on the tick the buff runs out.
    pub fn advance(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks == 0 {
            *self = StatusEffects::default();
            return true;
        }
        false
    }
}

/// Consume every item the character is touching
pub fn collect_items(state: &mut GameState, effects: &EffectTuning, events: &mut Vec<GameEvent>) {
    let character = &mut state.character;
    let status = &mut state.effects;

    for item in state.items.iter_mut().filter(|i| !i.consumed) {
        if !character.rect.overlaps(&item.rect) {
            continue;
        }

        if item.kind.is_buff() {
            if status.active {
                continue;
            }
            apply_effect(item.kind, character, effects);
            status.start(item.kind, effects.buff_duration_ticks);
            log::debug!("Buff {:?} applied for {} ticks", item.kind, effects.buff_duration_ticks);
            events.push(GameEvent::BuffApplied { kind: item.kind });
        } else {
            apply_effect(item.kind, character, effects);
            events.push(GameEvent::ItemPickedUp { kind: item.kind });
        }
        item.consumed = true;
    }
}

/// Advance the buff timer; on expiry restore the baseline stats
pub fn update_timer(
    state: &mut GameState,
    baseline: &CharacterTuning,
    events: &mut Vec<GameEvent>,
) {
    if state.effects.advance() {
        state.character.reset_effects(baseline);
        log::debug!("Buff expired");
        events.push(GameEvent::BuffExpired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::tuning::Tuning;

    fn world_with_items(kinds: &[ItemKind]) -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::empty(3, &tuning);
        state.character.rect = Rect::new(0.0, 0.0, 128.0, 128.0);
        for &kind in kinds {
            state.push_item(kind, Rect::new(32.0, 32.0, 64.0, 64.0));
        }
        (state, tuning)
    }

    #[test]
    fn test_buff_applies_and_expires() {
        let (mut state, tuning) = world_with_items(&[ItemKind::SpeedUp]);
        let mut events = Vec::new();
        collect_items(&mut state, &tuning.effects, &mut events);
        assert_eq!(state.character.speed, 7.5);
        assert_eq!(state.effects.remaining_ticks, 300);
        assert_eq!(events, vec![GameEvent::BuffApplied { kind: ItemKind::SpeedUp }]);

        let mut events = Vec::new();
        for _ in 0..299 {
            update_timer(&mut state, &tuning.character, &mut events);
        }
        assert!(events.is_empty());
        assert_eq!(state.character.speed, 7.5);

        update_timer(&mut state, &tuning.character, &mut events);
        assert_eq!(events, vec![GameEvent::BuffExpired]);
        assert_eq!(state.character.speed, tuning.character.speed);
        assert!(!state.effects.active);

        update_timer(&mut state, &tuning.character, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_second_buff_waits_for_first() {
        let (mut state, tuning) = world_with_items(&[ItemKind::HighJump, ItemKind::IronBody]);
        let mut events = Vec::new();
        collect_items(&mut state, &tuning.effects, &mut events);
        for _ in 0..10 {
            update_timer(&mut state, &tuning.character, &mut events);
        }

        collect_items(&mut state, &tuning.effects, &mut events);
        assert!(!state.character.immune_to_damage);
        assert_eq!(state.effects.remaining_ticks, 290);
        assert!(!state.items[1].consumed);

        for _ in 0..290 {
            update_timer(&mut state, &tuning.character, &mut events);
        }
        collect_items(&mut state, &tuning.effects, &mut events);
        assert!(state.character.immune_to_damage);
        assert_eq!(state.character.jump_strength, tuning.character.jump_strength);
        assert!(state.items[1].consumed);
    }

    #[test]
    fn test_instant_items_ignore_timer() {
        let (mut state, tuning) =
            world_with_items(&[ItemKind::MuscleUp, ItemKind::Confusion, ItemKind::Recovery]);
        let mut events = Vec::new();
        collect_items(&mut state, &tuning.effects, &mut events);

        assert_eq!(state.character.jump_damage, 10);
        assert_eq!(state.character.health, 900);
        assert!(state.items.iter().all(|i| i.consumed));
        assert_eq!(
            events,
            vec![
                GameEvent::BuffApplied { kind: ItemKind::MuscleUp },
                GameEvent::ItemPickedUp { kind: ItemKind::Confusion },
                GameEvent::ItemPickedUp { kind: ItemKind::Recovery },
            ]
        );
    }

    #[test]
    fn test_confusion_can_kill() {
        let (mut state, tuning) = world_with_items(&[ItemKind::Confusion]);
        state.character.health = 150;
        collect_items(&mut state, &tuning.effects, &mut Vec::new());
        assert_eq!(state.character.health, 0);
        assert!(state.character.is_game_over);
    }
}
