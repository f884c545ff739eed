//! Transport: TCP listener, per-connection plumbing, and frame codec.

pub mod codec;
pub mod connection;
pub mod listener;
