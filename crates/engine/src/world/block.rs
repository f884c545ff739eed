use serde::{Deserialize, Serialize};

use super::position::BlockPos;

/// The placeable block materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Grass,
    Dirt,
    Stone,
    Wood,
    Leaves,
}

/// One voxel as it travels on the wire: coordinates plus material.
///
/// Chunks store bare `BlockType`s keyed by position; a `Block` is
/// materialized when blocks are exported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    #[serde(rename = "type")]
    pub kind: BlockType,
}

impl Block {
    pub const fn new(pos: BlockPos, kind: BlockType) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            kind,
        }
    }
}
