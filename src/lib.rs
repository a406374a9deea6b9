//! metro-ops scheduling core
//!
//! Daily trip timetable for a metro line: generation with round-robin pilot
//! and train rostering, conflict-checked trip edits, and greedy train
//! assignment ranking. Staff and fleet data come from external catalogs.

pub mod traits;
pub mod model;
pub mod clock;
pub mod error;
pub mod overlap;
pub mod generator;
pub mod store;
pub mod ranker;
pub mod audit;
pub mod mock_catalog;
pub mod http_catalog;
pub mod service;
pub mod routes;
pub mod server;
pub mod config;
pub mod logging;
