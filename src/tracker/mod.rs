//! Task tracker persistence.
//!
//! Users, projects, tasks, history elements and uploaded files are kept in a
//! record store and reached through typed repositories. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Repository services in [`services`]
//! - Wiring for the production adapters in [`bootstrap`]

pub mod adapters;
pub mod bootstrap;
pub mod domain;
pub mod ports;
pub mod services;
