//! Step definitions for attachment ingestion scenarios.

pub mod world;
