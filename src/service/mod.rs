pub mod alliance;
pub mod migrate;
pub mod reconcile;
pub mod replication;
pub mod resolver;
pub mod scope;
