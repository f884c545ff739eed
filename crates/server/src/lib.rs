//! Authoritative multiplayer session host.
//!
//! The server holds the single authoritative copy of the voxel world and of
//! every connected player's state. Inbound client events are funneled into
//! one game-service task and processed to completion, one at a time; the
//! resulting deltas fan out through the broadcast router.

pub mod combat;
pub mod game;
pub mod net;
pub mod protocol;
pub mod registry;
pub mod router;
