//! In-memory data layer
//!
//! The academy keeps its whole dataset in memory; repositories here are the
//! only code allowed to mutate it. Durability is handled separately by
//! [`crate::persistence`].

pub mod repository;
