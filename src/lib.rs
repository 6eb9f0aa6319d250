//! Autobattle - automatic space and ground battle resolution
//!
//! Deterministic given a seeded RNG: the same world, rules and seed always
//! produce the same winners, losses and statistics.

pub mod battle;
pub mod core;
pub mod rules;
pub mod world;
