//! Crossover Bus - the chat client surface the bot talks through.
//!
//! This crate provides:
//! - The `ChatClient` trait: account, conversation and buddy lookups plus sending
//! - `Directory`, the snapshot of accounts, conversations and chat users
//! - `MemoryClient`, an in-process client used by tests and the console
//! - `PipeClient` and `PipeListener`, a JSON-lines bridge over named pipes
//! - `ConfirmationQueue`, the handoff between the pipe listener and the bot loop

pub mod client;
pub mod confirm;
pub mod directory;
pub mod memory;
pub mod pipe;

// Re-export key types
pub use client::{AccountId, ChatClient, ConversationId, ConversationKind, IncomingMessage};
pub use confirm::{Confirmation, ConfirmationQueue};
pub use directory::{AccountInfo, BuddyInfo, ConversationInfo, Directory};
pub use memory::{MemoryClient, SentMessage};
pub use pipe::{Frame, PipeClient, PipeListener};
