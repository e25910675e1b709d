//! Core data types for the ELO swarm

pub mod variant;

pub use variant::*;
