//! Background job runner for portable-archive imports.
//!
//! Imports run on a worker task off the request path. Job state lives in a
//! process-lifetime in-memory store behind the [`store::JobStore`]
//! interface; a restart loses job history, which is an accepted limitation
//! of this deployment model.

pub mod runner;
pub mod store;
