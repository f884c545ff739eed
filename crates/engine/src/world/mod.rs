pub mod block;
pub mod chunk;
pub mod position;

use std::collections::HashMap;

use block::{Block, BlockType};
use chunk::{Chunk, CHUNK_SIZE};
use dashmap::DashMap;
use position::{BlockPos, ChunkPos};

/// The entire block world, lock-sharded by chunk.
///
/// Chunks are generated lazily on first access and cached for the process
/// lifetime; a chunk is never regenerated, so player edits persist until the
/// process exits. The map grows monotonically -- eviction is a non-goal.
pub struct World {
    chunks: DashMap<ChunkPos, Chunk>,
}

impl World {
    pub fn new() -> Self {
        Self {
            chunks: DashMap::new(),
        }
    }

    /// Return the chunk at `pos`, generating and caching it on first access.
    /// Never fails.
    pub fn load_chunk(&self, pos: ChunkPos) -> dashmap::mapref::one::Ref<'_, ChunkPos, Chunk> {
        self.chunks
            .entry(pos)
            .or_insert_with(|| {
                tracing::debug!("Generating chunk {}", pos);
                Chunk::generate(pos)
            })
            .downgrade()
    }

    /// Union of all blocks in chunks whose bounding box intersects the
    /// square of `chunk_radius` chunks around the given world point.
    ///
    /// Loads (generating as needed) every chunk touched. Keys are the wire
    /// form `"x,y,z"`; chunks never overlap, so the union has no duplicates.
    pub fn blocks_in_range(
        &self,
        center_x: f64,
        center_z: f64,
        chunk_radius: i32,
    ) -> HashMap<String, Block> {
        let reach = (chunk_radius as i64 * CHUNK_SIZE) as f64;
        let start_x = ((center_x - reach) / CHUNK_SIZE as f64).floor() as i32;
        let end_x = ((center_x + reach) / CHUNK_SIZE as f64).floor() as i32;
        let start_z = ((center_z - reach) / CHUNK_SIZE as f64).floor() as i32;
        let end_z = ((center_z + reach) / CHUNK_SIZE as f64).floor() as i32;

        let mut blocks = HashMap::new();
        for cx in start_x..=end_x {
            for cz in start_z..=end_z {
                let chunk = self.load_chunk(ChunkPos::new(cx, cz));
                for (pos, kind) in chunk.iter() {
                    blocks.insert(pos.key(), Block::new(*pos, *kind));
                }
            }
        }
        blocks
    }

    /// Insert or overwrite the block at `pos`. No validation: any caller may
    /// place anywhere, occupied or not.
    ///
    /// Placing into a chunk nobody has walked near creates an empty chunk
    /// rather than generating terrain, and that chunk then counts as
    /// generated.
    pub fn place_block(&self, pos: BlockPos, kind: BlockType) {
        self.chunks.entry(pos.chunk()).or_default().set(pos, kind);
    }

    /// Remove the block at `pos`. Returns whether a block was actually
    /// there; destroying an absent block is an idempotent no-op.
    pub fn destroy_block(&self, pos: BlockPos) -> bool {
        match self.chunks.get_mut(&pos.chunk()) {
            Some(mut chunk) => chunk.remove(pos).is_some(),
            None => false,
        }
    }

    /// Read a single block. Does not trigger generation.
    pub fn get_block(&self, pos: BlockPos) -> Option<BlockType> {
        self.chunks.get(&pos.chunk()).and_then(|c| c.get(pos))
    }

    pub fn has_chunk(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
