//! Authoritative voxel world core.
//!
//! This crate owns the spatial substrate only: block and chunk data types,
//! deterministic lazy terrain generation, and spatial range queries. Player
//! sessions, combat, and networking live in the server crate.

pub mod world;
