//! Entity models for the persisted bot state.

pub mod links;
pub mod puns;
pub mod aliases;
pub mod nicks;
pub mod check_ins;
pub mod events;
