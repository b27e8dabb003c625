//! Tasktrack: persistence and attachment layer for a task-tracking backend.
//!
//! The crate stores users, projects, tasks, task history and uploaded files
//! and exposes them through repositories that validate payloads, merge
//! partial updates and ingest attachments. The routing layer in front of it
//! is out of scope.
//!
//! # Architecture
//!
//! Tasktrack follows hexagonal architecture principles:
//!
//! - **Domain**: entity schemas, validation and filter allow-lists
//! - **Ports**: record and attachment storage traits
//! - **Adapters**: `PostgreSQL`, filesystem and in-memory implementations
//!
//! # Modules
//!
//! - [`tracker`]: entities, stores and repositories
//! - [`config`]: environment-driven settings
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod logging;
pub mod tracker;
