use std::collections::HashMap;

use super::block::BlockType;
use super::position::{BlockPos, ChunkPos};

/// Number of blocks along each horizontal axis of a chunk.
pub const CHUNK_SIZE: i64 = 16;

/// Height of the grass cap in generated terrain.
pub const SURFACE_Y: i64 = 30;

/// A 16x16 (x,z) column group of blocks, stored sparsely by absolute
/// position.
///
/// Terrain is synthesized once, on first access, by [`Chunk::generate`];
/// after that the chunk only changes through player edits and is never
/// regenerated.
#[derive(Clone)]
pub struct Chunk {
    blocks: HashMap<BlockPos, BlockType>,
}

impl Chunk {
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
        }
    }

    /// Deterministic flat terrain: a grass cap at y=30 over two dirt layers.
    ///
    /// Pure function of the chunk coordinates -- no randomness -- so
    /// re-derivation yields an identical block set.
    pub fn generate(pos: ChunkPos) -> Self {
        let origin = pos.block_origin(0);
        let mut blocks = HashMap::with_capacity((CHUNK_SIZE * CHUNK_SIZE * 3) as usize);

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let world_x = origin.x + x;
                let world_z = origin.z + z;
                for y in (SURFACE_Y - 2)..=SURFACE_Y {
                    let kind = if y == SURFACE_Y {
                        BlockType::Grass
                    } else {
                        BlockType::Dirt
                    };
                    blocks.insert(BlockPos::new(world_x, y, world_z), kind);
                }
            }
        }

        Self { blocks }
    }

    pub fn get(&self, pos: BlockPos) -> Option<BlockType> {
        self.blocks.get(&pos).copied()
    }

    /// Insert or overwrite the block at `pos`.
    pub fn set(&mut self, pos: BlockPos, kind: BlockType) {
        self.blocks.insert(pos, kind);
    }

    /// Remove the block at `pos`, returning its material if one was there.
    pub fn remove(&mut self, pos: BlockPos) -> Option<BlockType> {
        self.blocks.remove(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockPos, &BlockType)> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = Chunk::generate(ChunkPos::new(-2, 3));
        let b = Chunk::generate(ChunkPos::new(-2, 3));
        assert_eq!(a.len(), b.len());
        for (pos, kind) in a.iter() {
            assert_eq!(b.get(*pos), Some(*kind));
        }
    }

    #[test]
    fn generated_terrain_is_grass_over_dirt() {
        let chunk = Chunk::generate(ChunkPos::new(0, 0));
        // 16x16 columns, 3 layers each.
        assert_eq!(chunk.len(), 16 * 16 * 3);
        assert_eq!(chunk.get(BlockPos::new(0, 30, 0)), Some(BlockType::Grass));
        assert_eq!(chunk.get(BlockPos::new(0, 29, 0)), Some(BlockType::Dirt));
        assert_eq!(chunk.get(BlockPos::new(0, 28, 0)), Some(BlockType::Dirt));
        assert_eq!(chunk.get(BlockPos::new(0, 27, 0)), None);
        assert_eq!(chunk.get(BlockPos::new(0, 31, 0)), None);
    }

    #[test]
    fn negative_chunks_use_their_own_world_coordinates() {
        let chunk = Chunk::generate(ChunkPos::new(-1, -1));
        assert_eq!(chunk.get(BlockPos::new(-16, 30, -16)), Some(BlockType::Grass));
        assert_eq!(chunk.get(BlockPos::new(-1, 30, -1)), Some(BlockType::Grass));
        // Coordinates from the neighboring chunk are absent.
        assert_eq!(chunk.get(BlockPos::new(0, 30, 0)), None);
    }
}
