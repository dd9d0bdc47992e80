//! Crossover Store - Persisted bot state as JSON flat files.
//!
//! This crate owns all data persistence: the flat-file JSON store, the
//! per-chat books (puns, aliases, nicknames, check-ins), the message link
//! table, and the scheduled event queue.

pub mod store;
pub mod datefmt;
pub mod models;
pub mod state;

// Re-export key types
pub use store::Store;
pub use state::BotState;
pub use models::links::MessageLinks;
pub use models::puns::{PunBook, PunPick};
pub use models::aliases::{Alias, AliasBook};
pub use models::nicks::NickBook;
pub use models::check_ins::{CheckIn, CheckInBook};
pub use models::events::{EventQueue, ReplayMessage, ScheduledEvent};
