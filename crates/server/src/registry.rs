//! Session registry: the authoritative record of every connected player.
//!
//! One entry per live connection, created on connect and removed on
//! disconnect. The combat state machine mutates health and life-cycle fields
//! through this registry -- nothing else holds a player copy.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full health for every player; constant for the process lifetime.
pub const MAX_HEALTH: i32 = 100;

/// Players spawn (and respawn) at this height, above the grass cap.
pub const SPAWN_Y: f64 = 35.0;

/// Authoritative per-connection player record.
///
/// Serialized camelCase on the wire (`rotX`, `maxHealth`, `isDead`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rot_x: f64,
    pub rot_y: f64,
    pub username: String,
    pub health: i32,
    pub max_health: i32,
    pub is_dead: bool,
    /// Epoch milliseconds of the last damage applied to this player.
    pub last_damage_time: u64,
    pub kills: u32,
    pub deaths: u32,
}

impl Player {
    /// Fresh record at the default spawn with a randomized display name.
    fn spawn(id: Uuid) -> Self {
        let tag: u32 = rand::thread_rng().gen_range(0..1000);
        Self {
            id,
            x: 0.0,
            y: SPAWN_Y,
            z: 0.0,
            rot_x: 0.0,
            rot_y: 0.0,
            username: format!("Player{tag}"),
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            is_dead: false,
            last_damage_time: 0,
            kills: 0,
            deaths: 0,
        }
    }

    /// Euclidean distance to another player.
    pub fn distance_to(&self, other: &Player) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Mapping from connection id to player record.
///
/// Owned exclusively by the game service task, so plain `HashMap` access is
/// safe -- every handler runs to completion before the next starts.
pub struct SessionRegistry {
    players: HashMap<Uuid, Player>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
        }
    }

    /// Create the record for a newly connected client and return it.
    ///
    /// The id is assigned by the connection layer, stable for the
    /// connection's lifetime and never reused.
    pub fn connect(&mut self, id: Uuid) -> &Player {
        self.players.entry(id).or_insert_with(|| Player::spawn(id))
    }

    /// Overwrite position and rotation in place; last write wins.
    /// A stale id (already disconnected) silently no-ops.
    pub fn apply_move(
        &mut self,
        id: Uuid,
        x: f64,
        y: f64,
        z: f64,
        rot_x: f64,
        rot_y: f64,
    ) -> Option<&Player> {
        let player = self.players.get_mut(&id)?;
        player.x = x;
        player.y = y;
        player.z = z;
        player.rot_x = rot_x;
        player.rot_y = rot_y;
        Some(player)
    }

    /// Remove the record. Idempotent: a repeat call for the same id is a
    /// no-op returning `None`.
    pub fn disconnect(&mut self, id: Uuid) -> Option<Player> {
        self.players.remove(&id)
    }

    pub fn get(&self, id: Uuid) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// All live players, keyed by id (snapshotted into `gameState`).
    pub fn players(&self) -> &HashMap<Uuid, Player> {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_spawns_alive_at_origin() {
        let mut registry = SessionRegistry::new();
        let id = Uuid::new_v4();
        let player = registry.connect(id);

        assert_eq!(player.id, id);
        assert_eq!((player.x, player.y, player.z), (0.0, SPAWN_Y, 0.0));
        assert_eq!(player.health, MAX_HEALTH);
        assert!(!player.is_dead);
        assert!(player.username.starts_with("Player"));
        assert_eq!((player.kills, player.deaths), (0, 0));
    }

    #[test]
    fn move_updates_in_place_and_ignores_stale_ids() {
        let mut registry = SessionRegistry::new();
        let id = Uuid::new_v4();
        registry.connect(id);

        let moved = registry.apply_move(id, 1.0, 36.0, -2.0, 0.5, 1.5);
        let moved = moved.expect("live id");
        assert_eq!((moved.x, moved.y, moved.z), (1.0, 36.0, -2.0));
        assert_eq!((moved.rot_x, moved.rot_y), (0.5, 1.5));

        assert!(registry
            .apply_move(Uuid::new_v4(), 9.0, 9.0, 9.0, 0.0, 0.0)
            .is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn disconnect_is_idempotent() {
        let mut registry = SessionRegistry::new();
        let id = Uuid::new_v4();
        registry.connect(id);

        assert!(registry.disconnect(id).is_some());
        assert!(registry.disconnect(id).is_none());
        assert!(registry.is_empty());
    }
}
