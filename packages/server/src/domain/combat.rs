//! Combat rules.
//!
//! Pure functions only: stat derivation from a chosen combatant, attack
//! cadence from speed, and the per-hit damage formula. Scheduling lives in
//! `usecase::combat`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{entity::Combatant, error::CombatError};

/// Speed at which a combatant attacks exactly once per baseline interval.
pub const BASELINE_SPEED: i32 = 150;
/// Attack interval at baseline speed.
pub const BASELINE_CADENCE_MS: u64 = 2000;
/// Every hit deals at least this much damage.
pub const MIN_DAMAGE: i32 = 5;

pub const STAT_HP: &str = "hp";
pub const STAT_ATTACK: &str = "attack";
pub const STAT_DEFENSE: &str = "defense";
pub const STAT_SPECIAL_ATTACK: &str = "special-attack";
pub const STAT_SPECIAL_DEFENSE: &str = "special-defense";
pub const STAT_SPEED: &str = "speed";

/// Runtime snapshot of a participant's six combat statistics.
///
/// Only `hp` changes after derivation, and it never goes up while a battle
/// is running. It may dip below zero on the lethal hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub special_attack: i32,
    pub special_defense: i32,
    pub speed: i32,
}

impl StatBlock {
    /// Extract the six base stats of `combatant`.
    ///
    /// A missing stat or a non-positive speed aborts the derivation; nothing
    /// is defaulted.
    pub fn derive(combatant: &Combatant) -> Result<Self, CombatError> {
        let stat = |name: &'static str| {
            combatant
                .base_stat(name)
                .ok_or_else(|| CombatError::MissingStat {
                    combatant: combatant.name.clone(),
                    stat: name,
                })
        };

        let block = Self {
            hp: stat(STAT_HP)?,
            attack: stat(STAT_ATTACK)?,
            defense: stat(STAT_DEFENSE)?,
            special_attack: stat(STAT_SPECIAL_ATTACK)?,
            special_defense: stat(STAT_SPECIAL_DEFENSE)?,
            speed: stat(STAT_SPEED)?,
        };

        if block.speed <= 0 {
            return Err(CombatError::InvalidSpeed {
                combatant: combatant.name.clone(),
                speed: block.speed,
            });
        }

        Ok(block)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }
}

/// Interval between two automatic attacks of a combatant with `speed`.
///
/// Baseline is one attack per 2000 ms at speed 150; the interval scales with
/// the inverse of speed and is not clamped. Returns `None` for a
/// non-positive speed.
pub fn cadence_for(speed: i32) -> Option<Duration> {
    if speed <= 0 {
        return None;
    }
    let millis = (BASELINE_CADENCE_MS as f64) * f64::from(BASELINE_SPEED) / f64::from(speed);
    // sub-millisecond cadences would spin the timer
    Some(Duration::from_millis((millis.round() as u64).max(1)))
}

/// Damage `attacker` deals to `defender` in one hit.
///
/// The larger of the physical and special differences is used, floored at
/// [`MIN_DAMAGE`]. Stats arrive from clients unchecked, so the differences
/// saturate at the `i32` bounds.
pub fn damage_between(attacker: &StatBlock, defender: &StatBlock) -> i32 {
    let physical = attacker.attack.saturating_sub(defender.defense);
    let special = attacker
        .special_attack
        .saturating_sub(defender.special_defense);
    physical.max(special).max(MIN_DAMAGE)
}
