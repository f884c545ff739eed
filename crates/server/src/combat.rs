//! Combat state machine: damage, death, and deferred respawn.
//!
//! Players are `Alive` or `Dead`. All transitions mutate the session
//! registry in place; every invalid request (unknown ids, dead parties,
//! out-of-range attacks, cooldown hits, redundant heals) is a silent no-op
//! rather than an error.

use std::time::Duration;

use rand::Rng;
use uuid::Uuid;

use crate::registry::{Player, SessionRegistry, SPAWN_Y};

/// Maximum attacker-to-target Euclidean distance, in world units.
pub const ATTACK_RANGE: f64 = 5.0;

/// Minimum interval between two damage applications to the same target.
pub const DAMAGE_COOLDOWN_MS: u64 = 1000;

/// Delay between death and the automatic respawn.
pub const RESPAWN_DELAY: Duration = Duration::from_millis(3000);

/// Damage applied when the attack payload omits it.
pub const DEFAULT_DAMAGE: i32 = 20;

/// Healing applied when the heal payload omits it.
pub const DEFAULT_HEAL: i32 = 25;

/// Respawn positions are drawn from `[-RESPAWN_SPREAD, RESPAWN_SPREAD)` on
/// both horizontal axes.
const RESPAWN_SPREAD: f64 = 10.0;

/// What an accepted attack did to its target.
#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    Damaged {
        damage: i32,
        new_health: i32,
        attacker_name: String,
    },
    /// Health reached zero: the target is now `Dead`, counters are bumped,
    /// and the caller must schedule the respawn.
    Killed {
        target_name: String,
        attacker_name: String,
    },
}

/// Apply an attack at time `now_ms` (epoch milliseconds).
///
/// Returns `None` when the attack is dropped: unknown or dead attacker,
/// unknown or dead target, distance beyond [`ATTACK_RANGE`], target still in
/// its damage cooldown, or a non-positive damage value (rejected at the
/// boundary so health stays within `0..=max_health`).
pub fn attack(
    registry: &mut SessionRegistry,
    attacker_id: Uuid,
    target_id: Uuid,
    damage: i32,
    now_ms: u64,
) -> Option<AttackOutcome> {
    if damage <= 0 {
        return None;
    }

    let attacker = registry.get(attacker_id)?;
    if attacker.is_dead {
        return None;
    }
    let attacker_name = attacker.username.clone();

    let target = registry.get(target_id)?;
    if target.is_dead {
        return None;
    }
    if registry.get(attacker_id)?.distance_to(target) > ATTACK_RANGE {
        return None;
    }
    if now_ms.saturating_sub(target.last_damage_time) < DAMAGE_COOLDOWN_MS {
        return None;
    }

    let target = registry.get_mut(target_id)?;
    target.health = (target.health - damage).max(0);
    target.last_damage_time = now_ms;

    if target.health == 0 {
        target.is_dead = true;
        target.deaths += 1;
        let target_name = target.username.clone();
        if let Some(attacker) = registry.get_mut(attacker_id) {
            attacker.kills += 1;
        }
        Some(AttackOutcome::Killed {
            target_name,
            attacker_name,
        })
    } else {
        Some(AttackOutcome::Damaged {
            damage,
            new_health: target.health,
            attacker_name,
        })
    }
}

/// Raise a player's health by `amount`, clamped to `max_health`.
///
/// Returns the applied amount and the new health, or `None` when nothing
/// happened: unknown or dead player, non-positive amount, or already at full
/// health (redundant heals are silent).
pub fn heal(registry: &mut SessionRegistry, id: Uuid, amount: i32) -> Option<(i32, i32)> {
    if amount <= 0 {
        return None;
    }
    let player = registry.get_mut(id)?;
    if player.is_dead {
        return None;
    }

    let before = player.health;
    // Saturate before clamping: a huge client-supplied amount must not
    // overflow past max_health.
    player.health = player.max_health.min(player.health.saturating_add(amount));
    let applied = player.health - before;
    if applied > 0 {
        Some((applied, player.health))
    } else {
        None
    }
}

/// The deferred `Dead -> Alive` transition.
///
/// Fires unconditionally after its delay, so it must be a safe no-op when
/// the player has disconnected in the meantime (or is somehow no longer
/// dead). Restores full health and assigns a fresh randomized position.
pub fn respawn(registry: &mut SessionRegistry, id: Uuid) -> Option<&Player> {
    let player = registry.get_mut(id)?;
    if !player.is_dead {
        return None;
    }

    let mut rng = rand::thread_rng();
    player.health = player.max_health;
    player.is_dead = false;
    player.x = rng.gen_range(-RESPAWN_SPREAD..RESPAWN_SPREAD);
    player.y = SPAWN_Y;
    player.z = rng.gen_range(-RESPAWN_SPREAD..RESPAWN_SPREAD);
    Some(&*player)
}
