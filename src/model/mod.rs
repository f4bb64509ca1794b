pub mod api;
pub mod app;
pub mod domain;
pub mod push;
pub mod report;
