//! ScoutSync server core.
//!
//! This crate contains the cross-tenant synchronization and merge engine for
//! a multi-tenant scouting data platform: alliance-scoped visibility,
//! replication with at-least-once outbox delivery, natural-key entity
//! resolution and deduplication, portable snapshot export/import, and the
//! background job runner that executes imports off the request path.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod job;
pub mod model;
pub mod push;
pub mod router;
pub mod service;
pub mod startup;
pub mod util;
