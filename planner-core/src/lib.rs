//! Core storage and sync logic for the planner schedule manager.
//!
//! This crate provides everything below the UI:
//! - `User`, `CourseEvent` and related types
//! - `store` for the durable local key-value store and the optional remote store
//! - `StorageService` implementing the remote-with-local-fallback policy
//! - `Session` holding the in-memory collection and enforcing load-before-save
//! - `grid` for the pure month-grid computation

pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod session;
pub mod storage;
pub mod store;
pub mod user;

pub use error::{PlannerError, PlannerResult};
pub use event::{Attachment, AttachmentKind, CourseEvent, EventColor};
pub use session::{Phase, Session};
pub use storage::{RemoteOp, StorageService, SyncReport};
pub use user::User;
