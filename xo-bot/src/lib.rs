//! Crossover Bot - message handling and the command table.
//!
//! This crate provides:
//! - The `Bot`: incoming queue, flood guard, message handling and mirroring
//! - The command table with help text, aliases and alias variables
//! - Name and conversation resolution across linked chats
//! - Natural-language time parsing for schedules and check-ins
//! - The scheduled-event replay and the polling runtime
//! - Service lifecycle and the application event bus

pub mod bot;
pub mod commands;
pub mod context;
pub mod event_bus;
pub mod names;
pub mod relay;
pub mod runtime;
pub mod scheduler;
pub mod service;
pub mod text;
pub mod timeparse;

// Re-export key types
pub use bot::Bot;
pub use context::MessageContext;
pub use event_bus::{AppEvent, EventBus};
pub use runtime::run;
pub use service::{Service, ServiceState};
