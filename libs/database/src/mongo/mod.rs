pub mod config;
pub mod connector;

pub use config::MongoConfig;
pub use connector::{open, spawn_probe, MongoError};
