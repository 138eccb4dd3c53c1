/// Fixed-width actions and action spaces
pub mod action;

/// Legal target enumeration
pub mod candidates;

/// The Catan environment: episodes, the step pipeline and opponent turns
pub mod catan;

/// Environment configuration and presets
pub mod config;

/// Action decoding into engine commands
pub mod decoder;

/// Game engine interface
pub mod engine;

/// Environment
pub mod env;

/// Observation encodings
pub mod observation;

/// Policies for opponents and drivers
pub mod policy;

/// Reward shaping
pub mod reward;

/// Per-turn stages
pub mod stage;

/// Turn bookkeeping
pub mod turn;
