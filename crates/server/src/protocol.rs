//! Wire protocol: named, schema-less JSON messages.
//!
//! Every message is the envelope `{"type": "<name>", "data": <payload>}`
//! (adjacently tagged). Field names are camelCase; block materials are
//! lowercase strings; block keys are `"x,y,z"` with plain signed integers.
//!
//! Inbound and outbound catalogues are separate enums so each side can only
//! be parsed as what it is allowed to send.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use voxfray_engine::world::block::{Block, BlockType};

use crate::registry::Player;

/// Client-to-server messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    PlayerMove {
        x: f64,
        y: f64,
        z: f64,
        rot_x: f64,
        rot_y: f64,
    },
    PlaceBlock {
        x: i64,
        y: i64,
        z: i64,
        #[serde(rename = "type")]
        kind: BlockType,
    },
    DestroyBlock {
        x: i64,
        y: i64,
        z: i64,
    },
    /// Bare message text; the server stamps username and timestamp.
    ChatMessage(String),
    #[serde(rename_all = "camelCase")]
    PlayerAttack {
        target_id: Uuid,
        #[serde(default)]
        damage: Option<i32>,
    },
    PlayerHeal {
        #[serde(default)]
        amount: Option<i32>,
    },
}

/// Server-to-client messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Initial snapshot, sent once to each new connection.
    #[serde(rename_all = "camelCase")]
    GameState {
        player_id: Uuid,
        players: HashMap<Uuid, Player>,
        blocks: HashMap<String, Block>,
    },
    PlayerJoined(Player),
    PlayerLeft(Uuid),
    PlayerMoved(Player),
    /// Incremental "world around me" stream back to the mover.
    ChunkUpdate(HashMap<String, Block>),
    BlockPlaced {
        x: i64,
        y: i64,
        z: i64,
        #[serde(rename = "type")]
        kind: BlockType,
    },
    BlockDestroyed {
        x: i64,
        y: i64,
        z: i64,
    },
    ChatMessage {
        username: String,
        message: String,
        timestamp: u64,
    },
    #[serde(rename_all = "camelCase")]
    PlayerDamaged {
        player_id: Uuid,
        damage: i32,
        new_health: i32,
        attacker_id: Uuid,
        attacker_name: String,
    },
    #[serde(rename_all = "camelCase")]
    PlayerDied {
        dead_player_id: Uuid,
        killer_player_id: Uuid,
        dead_player_name: String,
        killer_name: String,
    },
    #[serde(rename_all = "camelCase")]
    PlayerRespawned {
        player_id: Uuid,
        player: Player,
    },
    #[serde(rename_all = "camelCase")]
    PlayerHealed {
        player_id: Uuid,
        amount: i32,
        new_health: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_messages_parse_from_wire_names() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "playerMove",
            "data": { "x": 1.0, "y": 35.0, "z": -2.0, "rotX": 0.1, "rotY": 0.2 }
        }))
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::PlayerMove {
                x: 1.0,
                y: 35.0,
                z: -2.0,
                rot_x: 0.1,
                rot_y: 0.2
            }
        );

        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "placeBlock",
            "data": { "x": 3, "y": 31, "z": 4, "type": "stone" }
        }))
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::PlaceBlock {
                x: 3,
                y: 31,
                z: 4,
                kind: BlockType::Stone
            }
        );

        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "chatMessage",
            "data": "hello world"
        }))
        .unwrap();
        assert_eq!(msg, ClientMessage::ChatMessage("hello world".into()));
    }

    #[test]
    fn attack_and_heal_payload_fields_are_optional() {
        let target = Uuid::new_v4();
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "playerAttack",
            "data": { "targetId": target }
        }))
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::PlayerAttack {
                target_id: target,
                damage: None
            }
        );

        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "playerHeal",
            "data": {}
        }))
        .unwrap();
        assert_eq!(msg, ClientMessage::PlayerHeal { amount: None });
    }

    #[test]
    fn server_messages_serialize_with_wire_names() {
        let id = Uuid::new_v4();
        let value = serde_json::to_value(ServerMessage::BlockPlaced {
            x: -3,
            y: 30,
            z: 17,
            kind: BlockType::Wood,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({
                "type": "blockPlaced",
                "data": { "x": -3, "y": 30, "z": 17, "type": "wood" }
            })
        );

        let value = serde_json::to_value(ServerMessage::PlayerLeft(id)).unwrap();
        assert_eq!(value, json!({ "type": "playerLeft", "data": id }));

        let value = serde_json::to_value(ServerMessage::PlayerHealed {
            player_id: id,
            amount: 25,
            new_health: 80,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({
                "type": "playerHealed",
                "data": { "playerId": id, "amount": 25, "newHealth": 80 }
            })
        );
    }

    #[test]
    fn player_record_serializes_camel_case() {
        let mut registry = crate::registry::SessionRegistry::new();
        let id = Uuid::new_v4();
        let player = registry.connect(id).clone();

        let value = serde_json::to_value(&player).unwrap();
        let obj = value.as_object().unwrap();
        for field in [
            "id",
            "x",
            "y",
            "z",
            "rotX",
            "rotY",
            "username",
            "health",
            "maxHealth",
            "isDead",
            "lastDamageTime",
            "kills",
            "deaths",
        ] {
            assert!(obj.contains_key(field), "missing field {field}");
        }
        assert_eq!(obj.len(), 13);
    }
}
