// handlers/mod.rs - Two-tier handler layout
//
// Public (no credentials) → Protected (seller or store customer token).
// The tenant router runs in front of both tiers.

pub mod protected;
pub mod public;
