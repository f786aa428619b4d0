//! Core types and sync engine for the kalsync ecosystem.
//!
//! This crate provides everything the CLI builds on:
//! - `Event` and `Group` types for grouped calendar entries
//! - the `ics` wire codec for the remote calendar document
//! - `RemoteCalendar` for the HTTP exchange
//! - `EventStore` persistence and the `SyncEngine` merge/push logic

pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod remote;
pub mod retry;
pub mod store;
pub mod sync;

pub use error::{KalsyncError, KalsyncResult};
pub use event::{Event, Group};
pub use sync::{Conflict, ConflictResolver, Resolution, SyncEngine, SyncReport};
